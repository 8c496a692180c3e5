//! Registro de eventos de documento (issue / sign / read).

use log::{debug, info};

use crate::errors::ChaincodeError;
use crate::ledger::{load_json, store_json, Ledger};
use crate::model::{Contract, Event, EventType};

use super::require_non_empty;

/// Tipo de evento exigido por la operación, cuando la verificación está
/// activa.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedEventType<'a> {
    pub operation: &'a str,
    pub event_type: &'a EventType,
}

/// Agrega un evento al log de `doc_id`.
///
/// El payload se valida completo (JSON, docId, tipo) antes de tocar el
/// ledger. Devuelve la posición del evento dentro del log del documento.
pub fn record_event<L>(ledger: &mut L,
                       contract_id: &str,
                       doc_id: &str,
                       event_json: &str,
                       expected: Option<ExpectedEventType<'_>>)
                       -> Result<usize, ChaincodeError>
    where L: Ledger + ?Sized
{
    require_non_empty("contractId", contract_id)?;
    require_non_empty("docId", doc_id)?;
    let event: Event = serde_json::from_str(event_json).map_err(|e| ChaincodeError::parse("document event", e))?;
    if event.doc_id != doc_id {
        return Err(ChaincodeError::IdMismatch { doc_id: doc_id.to_string(), event_doc_id: event.doc_id });
    }
    if let Some(expected) = expected {
        if &event.event_type != expected.event_type {
            return Err(ChaincodeError::EventTypeMismatch { operation: expected.operation.to_string(),
                                                           expected: expected.event_type.to_string(),
                                                           found: event.event_type.to_string() });
        }
    }

    let mut contract: Contract = load_json(&*ledger, contract_id, "contract")?
        .ok_or_else(|| ChaincodeError::ContractNotFound(contract_id.to_string()))?;
    let event_type = event.event_type.clone();
    let doc_type = event.doc_type.clone();
    let typed = contract.apply_event(doc_id, event);
    let position = contract.events.get(doc_id).map(|log| log.len() - 1).unwrap_or_default();
    store_json(ledger, contract_id, "contract", &contract)?;

    if typed {
        info!("contract {contract_id}: docType {doc_type} -> {doc_id}");
    }
    debug!("contract {contract_id}: recorded {event_type} for {doc_id} at #{position}");
    Ok(position)
}
