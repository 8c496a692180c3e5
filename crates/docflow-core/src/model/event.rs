//! Evento de ciclo de vida de un documento.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tipo de evento. `Issue` es el único con semántica especial en el recorder;
/// cualquier otro valor se acepta tal cual (`Other`) para no cerrar la lista.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Issue,
    Sign,
    Read,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Issue => "Issue",
            Self::Sign => "Sign",
            Self::Read => "Read",
            Self::Other(s) => s,
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Issue" => Self::Issue,
            "Sign" => Self::Sign,
            "Read" => Self::Read,
            _ => Self::Other(s),
        }
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registro inmutable de una acción sobre un documento. Los campos ausentes en
/// el payload quedan vacíos; `doc_id` vacío nunca coincide con un docId real,
/// por lo que el recorder lo rechaza.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    #[serde(alias = "User")]
    pub user: String,
    #[serde(alias = "Role")]
    pub role: String,
    #[serde(alias = "Organization")]
    pub organization: String,
    #[serde(rename = "DocId", alias = "docId")]
    pub doc_id: String,
    #[serde(rename = "DocType", alias = "docType")]
    pub doc_type: String,
    #[serde(alias = "TimeStamp")]
    pub time_stamp: String,
    #[serde(alias = "EventType")]
    pub event_type: EventType,
    #[serde(alias = "DocHash")]
    pub doc_hash: String,
    #[serde(rename = "DocUrl", alias = "docUrl")]
    pub doc_url: String,
}

impl Event {
    pub fn is_issue(&self) -> bool {
        self.event_type == EventType::Issue
    }
}
