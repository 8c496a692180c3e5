//! Configuración central de la aplicación.
//! Carga `.env` con el cargador del core y arma `AppConfig`:
//! opciones del motor y, si hay `DATABASE_URL`, la configuración de Postgres.

use docflow_core::config::init_dotenv;
use docflow_core::EngineOptions;
use docflow_persistence::DbConfig;
use std::env;

use crate::errors::AppError;

/// Configuración de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: EngineOptions,
    /// `None` si no hay `DATABASE_URL`: la demo corre sólo en memoria.
    pub database: Option<DbConfig>,
    /// `DOCFLOW_RUN_PG_DEMO=1` habilita la demo contra Postgres.
    pub run_pg_demo: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        init_dotenv();
        let engine = EngineOptions::from_env()?;
        let database = if env::var("DATABASE_URL").is_ok() {
            Some(DbConfig::from_env()?)
        } else {
            None
        };
        let run_pg_demo = env::var("DOCFLOW_RUN_PG_DEMO").map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                                                         .unwrap_or(false);
        Ok(Self { engine, database, run_pg_demo })
    }
}
