//! `ContractEngine`: dueño del ledger y del proveedor de templates.

use log::{debug, info};

use super::lifecycle::{self, NewContract};
use super::query;
use super::recorder::{self, ExpectedEventType};
use crate::config::EngineOptions;
use crate::constants::SAMPLE_WORKFLOW_TEMPLATE_KEY;
use crate::errors::ChaincodeError;
use crate::ledger::Ledger;
use crate::model::{Contract, ContractState, Event, EventType};
use crate::template::{decode_template, TemplateProvider};

/// Motor de contratos.
///
/// La configuración de `init` se carga una vez (al ejecutar `init` o en el
/// primer uso) y se pasa explícitamente a los handlers que la necesitan.
#[derive(Debug)]
pub struct ContractEngine<L, T>
    where L: Ledger,
          T: TemplateProvider
{
    ledger: L,
    templates: T,
    options: EngineOptions,
    state: Option<ContractState>,
}

impl<L, T> ContractEngine<L, T>
    where L: Ledger,
          T: TemplateProvider
{
    /// Crea un motor con las opciones por defecto.
    pub fn new_with_stores(ledger: L, templates: T) -> Self {
        Self { ledger, templates, options: EngineOptions::default(), state: None }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn templates(&self) -> &T {
        &self.templates
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }

    /// `init(jsonConfig)`.
    pub fn init(&mut self, raw_config: &str) -> Result<(), ChaincodeError> {
        let state = lifecycle::init_state(&mut self.ledger, raw_config)?;
        self.state = Some(state);
        Ok(())
    }

    /// Configuración vigente (cacheada tras la primera lectura).
    pub fn contract_state(&mut self) -> Result<&ContractState, ChaincodeError> {
        let state = match self.state.take() {
            Some(cached) => cached,
            None => {
                let loaded = lifecycle::load_state(&self.ledger)?;
                debug!("loaded contract state: workflowTemplateCC={}", loaded.workflow_template_cc);
                loaded
            }
        };
        Ok(self.state.insert(state))
    }

    /// `addContract(workflowId, contractId, contractName, roleMappingJson)`.
    pub fn add_contract(&mut self,
                        workflow_id: &str,
                        contract_id: &str,
                        contract_name: &str,
                        role_mapping_json: &str)
                        -> Result<Contract, ChaincodeError> {
        let state = self.contract_state()?.clone();
        let timeout = self.options.template_timeout;
        lifecycle::create_contract(&mut self.ledger,
                                   &self.templates,
                                   &state,
                                   timeout,
                                   NewContract { workflow_id, contract_id, contract_name, role_mapping_json })
    }

    /// Registro sin verificación del tipo de evento (lo decide el payload).
    pub fn record_event(&mut self, contract_id: &str, doc_id: &str, event_json: &str) -> Result<usize, ChaincodeError> {
        recorder::record_event(&mut self.ledger, contract_id, doc_id, event_json, None)
    }

    pub fn issue(&mut self, contract_id: &str, doc_id: &str, event_json: &str) -> Result<usize, ChaincodeError> {
        self.record_as("issue", EventType::Issue, contract_id, doc_id, event_json)
    }

    pub fn add_signature(&mut self, contract_id: &str, doc_id: &str, event_json: &str) -> Result<usize, ChaincodeError> {
        self.record_as("addSignature", EventType::Sign, contract_id, doc_id, event_json)
    }

    pub fn read(&mut self, contract_id: &str, doc_id: &str, event_json: &str) -> Result<usize, ChaincodeError> {
        self.record_as("read", EventType::Read, contract_id, doc_id, event_json)
    }

    fn record_as(&mut self,
                 operation: &str,
                 event_type: EventType,
                 contract_id: &str,
                 doc_id: &str,
                 event_json: &str)
                 -> Result<usize, ChaincodeError> {
        let expected = self.options
                           .enforce_event_type
                           .then_some(ExpectedEventType { operation, event_type: &event_type });
        recorder::record_event(&mut self.ledger, contract_id, doc_id, event_json, expected)
    }

    /// `addCert`: el subsistema de certificados/ACL no existe todavía; se
    /// acepta la llamada sin modificar estado.
    pub fn add_cert(&mut self, args: &[&str]) -> Result<(), ChaincodeError> {
        info!("addCert: ACL subsystem not implemented, ignoring {} argument(s)", args.len());
        Ok(())
    }

    /// `addSampleWfIOJson`: guarda un template de ejemplo en el propio ledger.
    pub fn add_sample_template(&mut self, template_json: &str) -> Result<(), ChaincodeError> {
        let template = decode_template(template_json.as_bytes())?;
        self.ledger.put_state(SAMPLE_WORKFLOW_TEMPLATE_KEY, template_json.as_bytes())?;
        info!("stored sample workflow template '{}' ({} actors)", template.id, template.actor_list.len());
        Ok(())
    }

    /// `printSampleWfIOJson`: bytes del template de ejemplo (y lo registra).
    pub fn sample_template(&self) -> Result<Vec<u8>, ChaincodeError> {
        let bytes = self.ledger
                        .get_state(SAMPLE_WORKFLOW_TEMPLATE_KEY)?
                        .ok_or_else(|| ChaincodeError::Config("no sample workflow template stored".into()))?;
        info!("sample workflow template: {}", String::from_utf8_lossy(&bytes));
        Ok(bytes)
    }

    pub fn get_contract(&self, contract_id: &str) -> Result<Contract, ChaincodeError> {
        query::get_contract(&self.ledger, contract_id)
    }

    /// Lectura directa (sin transformar) del contrato guardado.
    pub fn get_contract_bytes(&self, contract_id: &str) -> Result<Vec<u8>, ChaincodeError> {
        query::contract_bytes(&self.ledger, contract_id)
    }

    pub fn get_events_for_document(&self, contract_id: &str, doc_id: &str) -> Result<Vec<Event>, ChaincodeError> {
        query::get_events_for_document(&self.ledger, contract_id, doc_id)
    }
}
