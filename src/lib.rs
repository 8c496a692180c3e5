//! docflow
//!
//! Librería de aplicación sobre `docflow-core`:
//! - `config`: configuración de la aplicación (motor + base de datos opcional).
//! - `errors`: error de aplicación que agrupa core y persistencia.
//! - `hashing`: hash de contenido de documentos (`docHash`).
//! - `demo`: template de comercio exterior y escenario completo
//!   (alta de contrato, emisión, firma y lectura).
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;
pub mod demo;
pub mod errors;
pub mod hashing;

pub use config::AppConfig;
pub use errors::AppError;
