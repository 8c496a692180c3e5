//! Configuración inicial y alta de contratos.

use log::{debug, info, warn};

use crate::constants::{CONTRACT_VERSION, WORKFLOW_TEMPLATE_KEY};
use crate::errors::ChaincodeError;
use crate::ledger::{load_json, store_json, Ledger};
use crate::model::{Contract, ContractState, RoleMapping};
use crate::template::{TemplateProvider, TemplateQuery};
use crate::validator::validate;

use super::require_non_empty;
use std::time::Duration;

/// Valida y persiste la configuración pasada a `init`.
pub fn init_state<L>(ledger: &mut L, raw_config: &str) -> Result<ContractState, ChaincodeError>
    where L: Ledger + ?Sized
{
    let state: ContractState =
        serde_json::from_str(raw_config).map_err(|e| ChaincodeError::parse("init config", e))?;
    if state.version != CONTRACT_VERSION {
        return Err(ChaincodeError::VersionMismatch { expected: CONTRACT_VERSION.to_string(),
                                                     found: state.version });
    }
    if state.workflow_template_cc.is_empty() {
        return Err(ChaincodeError::Config("workflow template chaincode id is mandatory".into()));
    }
    store_json(ledger, WORKFLOW_TEMPLATE_KEY, "contract state", &state)?;
    info!("init: version={} workflowTemplateCC={}", state.version, state.workflow_template_cc);
    Ok(state)
}

/// Lee la configuración guardada por `init`.
pub fn load_state<L>(ledger: &L) -> Result<ContractState, ChaincodeError>
    where L: Ledger + ?Sized
{
    load_json(ledger, WORKFLOW_TEMPLATE_KEY, "contract state")?
        .ok_or_else(|| ChaincodeError::Config("chaincode not initialized: missing contract state".into()))
}

/// Argumentos de `addContract`, en el orden de la operación.
#[derive(Debug, Clone, Copy)]
pub struct NewContract<'a> {
    pub workflow_id: &'a str,
    pub contract_id: &'a str,
    pub contract_name: &'a str,
    pub role_mapping_json: &'a str,
}

/// Crea un contrato.
///
/// Orden: existencia (duplicado gana sobre cualquier otro error de payload),
/// parseo del mapeo, template, validación y por último la única escritura.
pub fn create_contract<L, T>(ledger: &mut L,
                             templates: &T,
                             state: &ContractState,
                             timeout: Duration,
                             new: NewContract<'_>)
                             -> Result<Contract, ChaincodeError>
    where L: Ledger,
          T: TemplateProvider + ?Sized
{
    require_non_empty("contractId", new.contract_id)?;
    if ledger.get_state(new.contract_id)?.is_some() {
        warn!("addContract: contractId {} already exists", new.contract_id);
        return Err(ChaincodeError::DuplicateContract(new.contract_id.to_string()));
    }
    let participants = RoleMapping::from_json(new.role_mapping_json)?;
    debug!("addContract: workflowId={} contractId={} contractName={} roles={}",
           new.workflow_id,
           new.contract_id,
           new.contract_name,
           participants.len());

    let query = TemplateQuery { provider_id: &state.workflow_template_cc, workflow_id: new.workflow_id, timeout };
    let template = templates.query_template(&*ledger, &query)?;
    validate(&template, &participants)?;

    let contract = Contract::new(new.contract_id, new.workflow_id, new.contract_name, participants);
    store_json(ledger, new.contract_id, "contract", &contract)?;
    info!("addContract: stored contract {} (workflow {})", contract.contract_id, contract.workflow_id);
    Ok(contract)
}
