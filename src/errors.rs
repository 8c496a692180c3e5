use docflow_core::{ChaincodeError, LedgerError};
use docflow_persistence::PersistenceError;
use thiserror::Error;

/// Errores de la aplicación (demo / binario raíz).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("chaincode: {0}")]
    Chaincode(#[from] ChaincodeError),
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
    #[error("persistencia: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("serialización: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("escenario: {0}")]
    Scenario(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_core_errors() {
        let e: AppError = ChaincodeError::ContractNotFound("C1".into()).into();
        assert!(e.to_string().starts_with("chaincode: "));
        assert!(e.to_string().contains("C1"));
    }
}
