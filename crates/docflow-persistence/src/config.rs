//! Configuración de conexión desde variables de entorno (`.env` opcional,
//! cargado por `docflow_core::config::init_dotenv`).
//!
//! - `DATABASE_URL` (obligatoria)
//! - `DATABASE_MIN_CONNECTIONS` / `DATABASE_MAX_CONNECTIONS` (2 / 16)
//! - `DATABASE_CONNECT_TIMEOUT_MS`: espera máxima por una conexión del pool (5000)
//! - `DOCFLOW_NAMESPACE`: namespace de la chaincode (por defecto `docflow`)

use std::env;
use std::time::Duration;

pub use docflow_core::config::init_dotenv;

use crate::error::PersistenceError;

pub const DEFAULT_NAMESPACE: &str = "docflow";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub namespace: String,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        init_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Igual que `from_env` con una fuente de variables inyectable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PersistenceError>
        where F: Fn(&str) -> Option<String>
    {
        let url = lookup("DATABASE_URL").filter(|v| !v.is_empty())
                                        .ok_or_else(|| PersistenceError::Config("DATABASE_URL not set".into()))?;
        let min_connections = parse_or("DATABASE_MIN_CONNECTIONS", lookup("DATABASE_MIN_CONNECTIONS"), 2)?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", lookup("DATABASE_MAX_CONNECTIONS"), 16)?;
        let connect_timeout_ms = parse_or("DATABASE_CONNECT_TIMEOUT_MS",
                                          lookup("DATABASE_CONNECT_TIMEOUT_MS"),
                                          DEFAULT_CONNECT_TIMEOUT_MS)?;
        let namespace = lookup("DOCFLOW_NAMESPACE").filter(|v| !v.is_empty())
                                                   .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let cfg = Self { url,
                         min_connections,
                         max_connections,
                         connect_timeout: Duration::from_millis(connect_timeout_ms),
                         namespace };
        cfg.pool_bounds()?;
        Ok(cfg)
    }

    /// `(min_idle, max_size)` del pool. Un pool sin conexiones o con mínimo
    /// mayor que el máximo es un error de configuración.
    pub fn pool_bounds(&self) -> Result<(u32, u32), PersistenceError> {
        if self.max_connections == 0 {
            return Err(PersistenceError::Config("DATABASE_MAX_CONNECTIONS must be > 0".into()));
        }
        if self.min_connections > self.max_connections {
            return Err(PersistenceError::Config(format!("DATABASE_MIN_CONNECTIONS ({}) > DATABASE_MAX_CONNECTIONS ({})",
                                                        self.min_connections, self.max_connections)));
        }
        if self.connect_timeout.is_zero() {
            return Err(PersistenceError::Config("DATABASE_CONNECT_TIMEOUT_MS must be > 0".into()));
        }
        Ok((self.min_connections, self.max_connections))
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T, PersistenceError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim()
                    .parse()
                    .map_err(|_| PersistenceError::Config(format!("{name}: invalid value '{v}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let cfg = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(cfg.pool_bounds().unwrap(), (2, 16));
        assert_eq!(cfg.connect_timeout, Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS));
        assert_eq!(cfg.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn missing_url_is_a_config_error() {
        assert!(matches!(DbConfig::from_lookup(lookup(&[])), Err(PersistenceError::Config(_))));
    }

    #[test]
    fn rejects_inconsistent_pool_sizes() {
        let zero = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), ("DATABASE_MAX_CONNECTIONS", "0")]));
        assert!(matches!(zero, Err(PersistenceError::Config(_))));
        let inverted = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"),
                                                      ("DATABASE_MIN_CONNECTIONS", "8"),
                                                      ("DATABASE_MAX_CONNECTIONS", "4")]));
        assert!(matches!(inverted, Err(PersistenceError::Config(_))));
        let garbage = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), ("DATABASE_MAX_CONNECTIONS", "many")]));
        assert!(matches!(garbage, Err(PersistenceError::Config(_))));
    }
}
