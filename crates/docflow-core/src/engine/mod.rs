//! Engine de contratos: ciclo de vida, registro de eventos, consultas y
//! enrutado de operaciones.

mod core;
pub mod dispatch;
pub mod lifecycle;
pub mod query;
pub mod recorder;

pub use self::core::ContractEngine;
pub use dispatch::Operation;

use crate::errors::ChaincodeError;

pub(crate) fn require_non_empty(name: &str, value: &str) -> Result<(), ChaincodeError> {
    if value.is_empty() {
        return Err(ChaincodeError::EmptyArgument(name.to_string()));
    }
    Ok(())
}
