//! Acceso al ledger: trait `Ledger`, backend en memoria y helpers JSON.

pub mod codec;
mod store;

pub use store::InMemoryLedger;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{ChaincodeError, LedgerError};

/// Almacén clave-valor del host.
///
/// Contrato:
/// - `get_state` devuelve `Ok(None)` si la clave no existe; un vector vacío es
///   un valor presente.
/// - `put_state` reemplaza el valor completo (no hay updates parciales). La
///   atomicidad por clave la garantiza el host.
pub trait Ledger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for Box<L> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key)
    }
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put_state(key, value)
    }
}

/// Lee y deserializa el registro guardado en `key`. `what` nombra el registro
/// en el mensaje de error si el JSON no es válido.
pub fn load_json<T, L>(ledger: &L, key: &str, what: &str) -> Result<Option<T>, ChaincodeError>
    where T: DeserializeOwned,
          L: Ledger + ?Sized
{
    match ledger.get_state(key)? {
        Some(bytes) => codec::decode(&bytes).map(Some).map_err(|e| ChaincodeError::parse(what, e)),
        None => Ok(None),
    }
}

/// Serializa en forma canónica y escribe `record` bajo `key`.
pub fn store_json<T, L>(ledger: &mut L, key: &str, what: &str, record: &T) -> Result<(), ChaincodeError>
    where T: Serialize,
          L: Ledger + ?Sized
{
    let bytes = codec::encode(record).map_err(|e| ChaincodeError::parse(what, e))?;
    debug!("put_state key={key} bytes={}", bytes.len());
    ledger.put_state(key, &bytes)?;
    Ok(())
}
