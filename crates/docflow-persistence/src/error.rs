//! Errores de persistencia: mapea errores de Diesel / pool a variantes
//! semánticas.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("configuration: {0}")]
    Config(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("not found")]
    NotFound,
    #[error("statement timeout: {0}")]
    Timeout(String),
    #[error("serialization conflict (retryable)")]
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::CheckViolation => Self::CheckViolation(message),
                    DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                    DatabaseErrorKind::ClosedConnection => Self::TransientIo(message),
                    // 57014 llega como Unknown; sólo el texto lo distingue.
                    _ if message.contains("statement timeout") => Self::Timeout(message),
                    other => Self::Unknown(format!("db error kind {other:?}: {message}")),
                }
            }
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

/// Errores que conviene reintentar con backoff.
pub(crate) fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict | PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("could not serialize access due to concurrent update")
            || m.contains("terminating connection due to administrator command")
            || m.contains("connection closed")
            || m.contains("connection refused")
        }
        _ => false,
    }
}

/// Sólo fallos para obtener o mantener la conexión. Las lecturas de templates
/// usan este criterio: un timeout de sentencia ya consumió el presupuesto.
pub(crate) fn is_connection_error(e: &PersistenceError) -> bool {
    matches!(e, PersistenceError::TransientIo(_))
}
