use log::{debug, warn};
use std::collections::HashMap;
use std::time::Duration;

use super::{TemplateProvider, TemplateQuery};
use crate::constants::{SAMPLE_WORKFLOW_TEMPLATE_KEY, TEMPLATE_QUERY_FUNCTION};
use crate::errors::TemplateError;
use crate::ledger::Ledger;
use crate::model::WorkflowIO;

/// Decodifica los bytes devueltos por el proveedor.
pub fn decode_template(bytes: &[u8]) -> Result<WorkflowIO, TemplateError> {
    serde_json::from_slice(bytes).map_err(|e| TemplateError::Malformed(e.to_string()))
}

/// Transporte crudo hacia otra chaincode (equivalente a `QueryChaincode`).
///
/// Contrato:
/// - Debe respetar `timeout` y devolver `TemplateError::Timeout` si se excede.
/// - `TemplateError::NotFound` si el proveedor no conoce el workflow.
pub trait TemplateClient {
    fn query_chaincode(&self,
                       chaincode_id: &str,
                       function: &str,
                       args: &[&str],
                       timeout: Duration)
                       -> Result<Vec<u8>, TemplateError>;
}

/// Proveedor que consulta la chaincode de templates a través de un
/// `TemplateClient`.
pub struct ChaincodeTemplateProvider<C: TemplateClient> {
    pub client: C,
}

impl<C: TemplateClient> ChaincodeTemplateProvider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: TemplateClient> TemplateProvider for ChaincodeTemplateProvider<C> {
    fn query_template(&self, _ledger: &dyn Ledger, query: &TemplateQuery<'_>) -> Result<WorkflowIO, TemplateError> {
        if query.provider_id.is_empty() {
            return Err(TemplateError::UnknownProvider(String::new()));
        }
        debug!("query_template provider={} workflow={} timeout={:?}",
               query.provider_id, query.workflow_id, query.timeout);
        let bytes = self.client
                        .query_chaincode(query.provider_id, TEMPLATE_QUERY_FUNCTION, &[query.workflow_id], query.timeout)
                        .inspect_err(|e| warn!("template query failed provider={} err={e}", query.provider_id))?;
        decode_template(&bytes)
    }
}

/// Proveedor en memoria con un id fijo. Rechaza consultas dirigidas a otro
/// proveedor.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTemplateProvider {
    pub provider_id: String,
    pub templates: HashMap<String, WorkflowIO>,
}

impl InMemoryTemplateProvider {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self { provider_id: provider_id.into(), templates: HashMap::new() }
    }

    /// Registra `template` bajo su propio `id`.
    pub fn with_template(mut self, template: WorkflowIO) -> Self {
        self.templates.insert(template.id.clone(), template);
        self
    }
}

impl TemplateProvider for InMemoryTemplateProvider {
    fn query_template(&self, _ledger: &dyn Ledger, query: &TemplateQuery<'_>) -> Result<WorkflowIO, TemplateError> {
        if query.provider_id != self.provider_id {
            return Err(TemplateError::UnknownProvider(query.provider_id.to_string()));
        }
        self.templates
            .get(query.workflow_id)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(query.workflow_id.to_string()))
    }
}

/// Usa el template de ejemplo guardado con `addSampleWfIOJson` en el propio
/// ledger, ignorando proveedor y workflow id. Sólo para desarrollo.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleTemplateProvider;

impl TemplateProvider for SampleTemplateProvider {
    fn query_template(&self, ledger: &dyn Ledger, query: &TemplateQuery<'_>) -> Result<WorkflowIO, TemplateError> {
        let bytes = ledger.get_state(SAMPLE_WORKFLOW_TEMPLATE_KEY)
                          .map_err(|e| TemplateError::Unavailable(e.to_string()))?
                          .ok_or_else(|| TemplateError::NotFound(query.workflow_id.to_string()))?;
        decode_template(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use crate::model::Actor;
    use std::cell::RefCell;

    fn query<'a>(provider_id: &'a str, workflow_id: &'a str) -> TemplateQuery<'a> {
        TemplateQuery { provider_id, workflow_id, timeout: Duration::from_millis(50) }
    }

    fn template(id: &str) -> WorkflowIO {
        WorkflowIO { id: id.into(),
                     actor_list: vec![Actor { id: "a1".into(), name: "Exporter".into() }],
                     ..Default::default() }
    }

    struct RecordingClient {
        reply: Result<Vec<u8>, TemplateError>,
        calls: RefCell<Vec<(String, String, Vec<String>)>>,
    }

    impl TemplateClient for RecordingClient {
        fn query_chaincode(&self, cc: &str, function: &str, args: &[&str], _t: Duration) -> Result<Vec<u8>, TemplateError> {
            self.calls
                .borrow_mut()
                .push((cc.to_string(), function.to_string(), args.iter().map(|s| s.to_string()).collect()));
            self.reply.clone()
        }
    }

    #[test]
    fn chaincode_provider_queries_with_workflow_id() {
        let bytes = serde_json::to_vec(&template("WF1")).unwrap();
        let provider = ChaincodeTemplateProvider::new(RecordingClient { reply: Ok(bytes), calls: RefCell::new(vec![]) });
        let wf = provider.query_template(&InMemoryLedger::new(), &query("wfcc1", "WF1")).unwrap();
        assert_eq!(wf.id, "WF1");
        let calls = provider.client.calls.borrow();
        assert_eq!(calls[0], ("wfcc1".to_string(), "query".to_string(), vec!["WF1".to_string()]));
    }

    #[test]
    fn chaincode_provider_surfaces_timeout_and_garbage() {
        let timeout = TemplateError::Timeout { workflow_id: "WF1".into(), timeout: Duration::from_millis(50) };
        let provider = ChaincodeTemplateProvider::new(RecordingClient { reply: Err(timeout.clone()),
                                                                        calls: RefCell::new(vec![]) });
        assert_eq!(provider.query_template(&InMemoryLedger::new(), &query("wfcc1", "WF1")), Err(timeout));

        let provider = ChaincodeTemplateProvider::new(RecordingClient { reply: Ok(b"{oops".to_vec()),
                                                                        calls: RefCell::new(vec![]) });
        assert!(matches!(provider.query_template(&InMemoryLedger::new(), &query("wfcc1", "WF1")),
                         Err(TemplateError::Malformed(_))));
    }

    #[test]
    fn in_memory_provider_checks_provider_and_workflow() {
        let provider = InMemoryTemplateProvider::new("wfcc1").with_template(template("WF1"));
        let ledger = InMemoryLedger::new();
        assert!(provider.query_template(&ledger, &query("wfcc1", "WF1")).is_ok());
        assert_eq!(provider.query_template(&ledger, &query("other", "WF1")),
                   Err(TemplateError::UnknownProvider("other".into())));
        assert_eq!(provider.query_template(&ledger, &query("wfcc1", "WF9")),
                   Err(TemplateError::NotFound("WF9".into())));
    }

    #[test]
    fn sample_provider_reads_placeholder_from_ledger() {
        let mut ledger = InMemoryLedger::new();
        assert!(matches!(SampleTemplateProvider.query_template(&ledger, &query("x", "WF1")),
                         Err(TemplateError::NotFound(_))));
        ledger.put_state(SAMPLE_WORKFLOW_TEMPLATE_KEY, &serde_json::to_vec(&template("S")).unwrap()).unwrap();
        let wf = SampleTemplateProvider.query_template(&ledger, &query("x", "WF1")).unwrap();
        assert_eq!(wf.id, "S");
    }
}
