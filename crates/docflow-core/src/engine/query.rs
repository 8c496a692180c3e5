//! Consultas de sólo lectura.

use crate::errors::ChaincodeError;
use crate::ledger::{codec, Ledger};
use crate::model::{Contract, Event};

fn stored_contract<L>(ledger: &L, contract_id: &str) -> Result<(Vec<u8>, Contract), ChaincodeError>
    where L: Ledger + ?Sized
{
    let bytes = ledger.get_state(contract_id)?
                      .ok_or_else(|| ChaincodeError::ContractNotFound(contract_id.to_string()))?;
    let contract = codec::decode(&bytes).map_err(|e| ChaincodeError::parse("contract", e))?;
    Ok((bytes, contract))
}

/// Bytes del contrato tal como están en el ledger. Un registro que no
/// decodifica como `Contract` es un error, no se devuelve tal cual.
pub fn contract_bytes<L>(ledger: &L, contract_id: &str) -> Result<Vec<u8>, ChaincodeError>
    where L: Ledger + ?Sized
{
    stored_contract(ledger, contract_id).map(|(bytes, _)| bytes)
}

pub fn get_contract<L>(ledger: &L, contract_id: &str) -> Result<Contract, ChaincodeError>
    where L: Ledger + ?Sized
{
    stored_contract(ledger, contract_id).map(|(_, contract)| contract)
}

/// Eventos de un documento en orden de llegada. Un documento sin eventos se
/// reporta igual que uno desconocido.
pub fn get_events_for_document<L>(ledger: &L, contract_id: &str, doc_id: &str) -> Result<Vec<Event>, ChaincodeError>
    where L: Ledger + ?Sized
{
    let contract = get_contract(ledger, contract_id)?;
    contract.events_for(doc_id)
            .map(|log| log.as_slice().to_vec())
            .ok_or_else(|| ChaincodeError::DocumentNotFound { contract_id: contract_id.to_string(),
                                                              doc_id: doc_id.to_string() })
}
