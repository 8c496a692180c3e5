//! docflow-persistence
//!
//! Backend Postgres (Diesel) del ledger de docflow-core.
//!
//! Módulos:
//! - `pg`: `PgLedger` (estado clave-valor versionado por namespace), `submit`
//!   (reenvío de operaciones tras conflictos de escritura) y
//!   `PgTemplateClient` (consulta de templates en el namespace del proveedor).
//! - `retry`: políticas de reintento por tipo de acceso.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: configuración de conexión desde variables de entorno.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod retry;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, submit, ConnectionProvider, PgLedger, PgPool, PgTemplateClient,
             PoolProvider};
pub use retry::RetryPolicy;
