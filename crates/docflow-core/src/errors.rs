//! Errores de la chaincode.
//!
//! Cada operación devuelve `Result<_, ChaincodeError>`. Ningún error se
//! reintenta internamente y ninguno deja escrituras parciales: toda validación
//! ocurre antes del único `put_state` de la operación.

use std::time::Duration;
use thiserror::Error;

/// Fallo de la capa de acceso al ledger (get/put del host).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LedgerError {
    #[error("ledger read failed for key '{key}': {reason}")]
    Read { key: String, reason: String },
    #[error("ledger write failed for key '{key}': {reason}")]
    Write { key: String, reason: String },
    /// Otra transacción escribió `key` después de que esta operación la leyó.
    /// La operación completa debe reenviarse.
    #[error("ledger write conflict on key '{key}': value changed since it was read")]
    Conflict { key: String },
}

impl LedgerError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Fallo al consultar el proveedor de templates (otro componente).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TemplateError {
    #[error("unknown template provider '{0}'")]
    UnknownProvider(String),
    #[error("workflow template '{0}' not found")]
    NotFound(String),
    #[error("template query for '{workflow_id}' timed out after {timeout:?}")]
    Timeout { workflow_id: String, timeout: Duration },
    #[error("template provider unavailable: {0}")]
    Unavailable(String),
    #[error("malformed workflow template: {0}")]
    Malformed(String),
}

/// El mapeo rol → participante no cubre el template.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("{0} is missing in the mapping")]
    MissingRole(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ChaincodeError {
    #[error("config: {0}")]
    Config(String),
    #[error("contract version {expected} must match version argument: {found}")]
    VersionMismatch { expected: String, found: String },
    #[error("{operation}: incorrect number of arguments, expecting {expected} got {found}")]
    Arguments { operation: String, expected: usize, found: usize },
    #[error("{0} must not be empty")]
    EmptyArgument(String),
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
    #[error("contractId {0} already exists")]
    DuplicateContract(String),
    #[error("invalid role to instance mapping: {0}")]
    InvalidMapping(String),
    #[error("contract validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{what}: unmarshaling error: {reason}")]
    Parse { what: String, reason: String },
    #[error("docId: docIds in event ({event_doc_id}) and arguments ({doc_id}) don't match")]
    IdMismatch { doc_id: String, event_doc_id: String },
    #[error("{operation}: event type '{found}' does not match expected '{expected}'")]
    EventTypeMismatch { operation: String, expected: String, found: String },
    #[error("contractId {0}: not found on ledger")]
    ContractNotFound(String),
    #[error("docId {doc_id}: does not exist for contract {contract_id}")]
    DocumentNotFound { contract_id: String, doc_id: String },
    #[error("workflow template: {0}")]
    Template(#[from] TemplateError),
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
}

impl ChaincodeError {
    pub(crate) fn parse(what: impl Into<String>, err: serde_json::Error) -> Self {
        Self::Parse { what: what.into(), reason: err.to_string() }
    }

    /// `true` si el error refleja un rechazo de negocio (argumentos, estado)
    /// y no un fallo de infraestructura (ledger, proveedor de templates).
    pub fn is_rejection(&self) -> bool {
        !matches!(self,
                  Self::Ledger(_)
                  | Self::Template(TemplateError::Timeout { .. })
                  | Self::Template(TemplateError::Unavailable(_)))
    }

    /// Conflicto de escritura concurrente: reenviar la operación completa
    /// vuelve a leer el estado y puede tener éxito.
    pub fn is_ledger_conflict(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_conflict())
    }
}
