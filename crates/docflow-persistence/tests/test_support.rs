#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use docflow_persistence::config::DbConfig;
use docflow_persistence::pg::{build_pool, PgPool, PoolProvider};
use once_cell::sync::Lazy;

pub static TEST_POOL: Lazy<Option<PgPool>> = Lazy::new(|| {
    if std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    // Los tests de concurrencia necesitan al menos dos conexiones a la vez.
    let cfg = match DbConfig::from_env() {
        Ok(cfg) => DbConfig { min_connections: 1, max_connections: 4, ..cfg },
        Err(e) => {
            eprintln!("Config de test inválida: {e}");
            return None;
        }
    };
    match build_pool(&cfg) {
        Ok(p) => Some(p),
        Err(e) => {
            eprintln!("No se pudo construir pool de test: {e}");
            None
        }
    }
});

pub fn with_pool<F, R>(f: F) -> Option<R>
    where F: FnOnce(&PgPool) -> R
{
    TEST_POOL.as_ref().map(f)
}

pub fn provider(pool: &PgPool) -> PoolProvider {
    PoolProvider { pool: pool.clone() }
}

/// Namespace único por test para no compartir filas entre ejecuciones.
pub fn unique_namespace(prefix: &str) -> String {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{}-{nanos}-{seq}", std::process::id())
}
