//! Implementaciones Postgres (Diesel) de los traits del core.
//!
//! - `ledger`: `PgLedger`, una fila versionada por clave dentro de un
//!   namespace (una chaincode), y `submit`, que reenvía una operación del
//!   motor cuando otra transacción escribió lo que ésta había leído.
//! - `template`: `PgTemplateClient`, que responde `query(workflowId)` leyendo
//!   el namespace del proveedor de templates con `statement_timeout`.
//! - Este módulo: pool r2d2 y proveedor de conexiones.

mod ledger;
mod template;

pub use ledger::{submit, PgLedger};
pub use template::PgTemplateClient;

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use log::info;

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;

/// Pool r2d2 de conexiones Postgres, ya migrado al construirse.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Contrato: devuelve una conexión válida o `PersistenceError::TransientIo`.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

#[derive(Clone)]
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Construye el pool según `cfg` y ejecuta las migraciones pendientes.
///
/// Las conexiones se validan al salir del pool: una conexión cortada por el
/// servidor se descarta antes de llegar a una transacción del ledger.
pub fn build_pool(cfg: &DbConfig) -> Result<PgPool, PersistenceError> {
    let (min_idle, max_size) = cfg.pool_bounds()?;
    let manager = ConnectionManager::<PgConnection>::new(cfg.url.as_str());
    let pool = r2d2::Pool::builder().min_idle(Some(min_idle))
                                    .max_size(max_size)
                                    .connection_timeout(cfg.connect_timeout)
                                    .test_on_check_out(true)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    let mut conn = pool.get()
                       .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
    run_pending_migrations(&mut conn)?;
    info!("ledger pool ready (min_idle={min_idle}, max_size={max_size})");
    Ok(pool)
}

/// Helper de desarrollo: lee configuración (con `.env`) y construye un pool
/// ya migrado. Devuelve también el namespace configurado.
pub fn build_dev_pool_from_env() -> Result<(PgPool, String), PersistenceError> {
    let cfg = DbConfig::from_env()?;
    let pool = build_pool(&cfg)?;
    Ok((pool, cfg.namespace))
}
