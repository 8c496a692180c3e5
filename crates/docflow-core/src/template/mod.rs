//! Resolución de templates de workflow.
//!
//! El template vive en otro componente (la chaincode proveedora, identificada
//! por `ContractState::workflow_template_cc`). La consulta se modela como una
//! llamada remota con fallos propios (`TemplateError`) y timeout explícito.

mod provider;

pub use provider::{decode_template, ChaincodeTemplateProvider, InMemoryTemplateProvider, SampleTemplateProvider,
                   TemplateClient};

use std::time::Duration;

use crate::errors::TemplateError;
use crate::ledger::Ledger;
use crate::model::WorkflowIO;

/// Parámetros de una consulta de template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateQuery<'a> {
    pub provider_id: &'a str,
    pub workflow_id: &'a str,
    pub timeout: Duration,
}

/// Fuente de templates. Recibe el ledger de la transacción en curso porque en
/// el host la llamada cross-chaincode también sale del stub.
pub trait TemplateProvider {
    fn query_template(&self, ledger: &dyn Ledger, query: &TemplateQuery<'_>) -> Result<WorkflowIO, TemplateError>;
}

impl<T: TemplateProvider + ?Sized> TemplateProvider for Box<T> {
    fn query_template(&self, ledger: &dyn Ledger, query: &TemplateQuery<'_>) -> Result<WorkflowIO, TemplateError> {
        (**self).query_template(ledger, query)
    }
}
