//! Descriptor de workflow (`WorkflowIO`) tal como lo devuelve el proveedor de
//! templates.
//!
//! El core sólo lo lee. Los nombres de campo se emiten en PascalCase (forma en
//! que el proveedor los publica) y se aceptan también en camelCase. Cualquier
//! lista ausente se trata como vacía.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionId {
    #[serde(alias = "Id")]
    pub id: String,
}

/// Tipo de documento admitido por el workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DocType {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "name")]
    pub name: String,
    #[serde(alias = "type")]
    pub r#type: String,
    #[serde(alias = "version")]
    pub version: String,
    #[serde(alias = "allowedActTypeList")]
    pub allowed_act_type_list: Vec<ActionId>,
}

/// Rol del workflow (Exporter, Importer, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Actor {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ActType {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "name")]
    pub name: String,
    #[serde(alias = "type")]
    pub r#type: String,
}

/// Tripleta documento × acción × actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Action {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "docTypeId")]
    pub doc_type_id: String,
    #[serde(alias = "actTypeId")]
    pub act_type_id: String,
    #[serde(alias = "actorId")]
    pub actor_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyInfo {
    #[serde(rename = "Id", alias = "id")]
    pub id: String,
    #[serde(rename = "dependencyInfo", alias = "DependencyInfo")]
    pub dependency_list: Vec<ActionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WorkflowIO {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "name")]
    pub name: String,
    #[serde(alias = "version")]
    pub version: String,
    #[serde(alias = "desc")]
    pub desc: String,
    #[serde(alias = "actTypeList")]
    pub act_type_list: Vec<ActType>,
    #[serde(alias = "docTypeList")]
    pub doc_type_list: Vec<DocType>,
    #[serde(alias = "actionList")]
    pub action_list: Vec<Action>,
    #[serde(alias = "actorList")]
    pub actor_list: Vec<Actor>,
    #[serde(alias = "aclList")]
    pub acl_list: Vec<Action>,
    #[serde(alias = "dependencyList")]
    pub dependency_list: Vec<DependencyInfo>,
}

impl WorkflowIO {
    /// Nombres de rol en el orden declarado.
    pub fn actor_names(&self) -> impl Iterator<Item = &str> {
        self.actor_list.iter().map(|a| a.name.as_str())
    }
}
