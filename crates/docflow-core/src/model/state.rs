use serde::{Deserialize, Serialize};

/// Configuración de la chaincode fijada por `init` y guardada en
/// `WORKFLOW_TEMPLATE_KEY`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractState {
    #[serde(default)]
    pub version: String,
    /// Identificador de la chaincode proveedora de templates.
    #[serde(rename = "workflowTemplateCC", default)]
    pub workflow_template_cc: String,
}
