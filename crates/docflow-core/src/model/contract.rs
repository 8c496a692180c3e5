//! Estado persistido de un contrato.
//!
//! Un `Contract` se crea una sola vez y después sólo cambia por `apply_event`.
//! No existe API de borrado ni de edición de eventos.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::event::Event;
use super::mapping::RoleMapping;

/// Log append-only de eventos de un documento, en orden de llegada.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog(Vec<Event>);

impl EventLog {
    pub fn append(&mut self, event: Event) {
        self.0.push(event);
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.0.last()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Claves JSON tal como las escribe la chaincode desplegada: `WorkflowId`,
/// `ContractId`, `Documents` y `DocTypeToDocIdMapping` en PascalCase,
/// `contractName`, `events` y `participants` en camelCase. Al leer se acepta
/// cualquiera de las dos formas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contract {
    #[serde(rename = "WorkflowId", alias = "workflowId")]
    pub workflow_id: String,
    #[serde(alias = "ContractName")]
    pub contract_name: String,
    #[serde(rename = "ContractId", alias = "contractId")]
    pub contract_id: String,
    /// docIds en orden de emisión. Un mismo docId emitido dos veces aparece
    /// dos veces.
    #[serde(rename = "Documents", alias = "documents")]
    pub documents: Vec<String>,
    #[serde(alias = "Events")]
    pub events: BTreeMap<String, EventLog>,
    #[serde(rename = "participants", alias = "ParticipantRoleToInstanceMapping")]
    pub participant_role_to_instance_mapping: RoleMapping,
    /// Primer docId emitido para cada tipo de documento (first-issue-wins).
    #[serde(rename = "DocTypeToDocIdMapping", alias = "docTypeToDocIdMapping")]
    pub doc_type_to_doc_id_mapping: BTreeMap<String, String>,
}

impl Contract {
    /// Contrato recién creado: sin documentos ni eventos.
    pub fn new(contract_id: impl Into<String>,
               workflow_id: impl Into<String>,
               contract_name: impl Into<String>,
               participants: RoleMapping)
               -> Self {
        Self { workflow_id: workflow_id.into(),
               contract_name: contract_name.into(),
               contract_id: contract_id.into(),
               documents: Vec::new(),
               events: BTreeMap::new(),
               participant_role_to_instance_mapping: participants,
               doc_type_to_doc_id_mapping: BTreeMap::new() }
    }

    /// Aplica un evento ya validado (`event.doc_id == doc_id`).
    ///
    /// Un `Issue` agrega el docId a `documents` y, si el tipo de documento aún
    /// no tenía docId asignado, lo fija. El evento siempre se agrega al log
    /// del documento. Devuelve `true` si el mapeo de tipo cambió.
    pub fn apply_event(&mut self, doc_id: &str, event: Event) -> bool {
        let mut typed = false;
        if event.is_issue() {
            self.documents.push(doc_id.to_string());
            if let Entry::Vacant(slot) = self.doc_type_to_doc_id_mapping.entry(event.doc_type.clone()) {
                slot.insert(doc_id.to_string());
                typed = true;
            }
        }
        self.events.entry(doc_id.to_string()).or_default().append(event);
        typed
    }

    /// Log de un documento; `None` si no tiene eventos.
    pub fn events_for(&self, doc_id: &str) -> Option<&EventLog> {
        self.events.get(doc_id).filter(|log| !log.is_empty())
    }

    pub fn doc_id_for_type(&self, doc_type: &str) -> Option<&str> {
        self.doc_type_to_doc_id_mapping.get(doc_type).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventType;

    fn issue(doc_id: &str, doc_type: &str) -> Event {
        Event { doc_id: doc_id.into(), doc_type: doc_type.into(), event_type: EventType::Issue, ..Default::default() }
    }

    #[test]
    fn first_issue_wins_for_doc_type() {
        let mut c = Contract::new("C1", "WF1", "Acme", RoleMapping::new());
        assert!(c.apply_event("x", issue("x", "Phyto")));
        assert!(!c.apply_event("y", issue("y", "Phyto")));
        assert_eq!(c.doc_id_for_type("Phyto"), Some("x"));
        assert_eq!(c.documents, vec!["x", "y"]);
    }

    #[test]
    fn non_issue_events_only_append() {
        let mut c = Contract::new("C1", "WF1", "Acme", RoleMapping::new());
        let sign = Event { doc_id: "x".into(), doc_type: "Phyto".into(), event_type: EventType::Sign, ..Default::default() };
        c.apply_event("x", sign);
        assert!(c.documents.is_empty());
        assert!(c.doc_type_to_doc_id_mapping.is_empty());
        assert_eq!(c.events_for("x").map(EventLog::len), Some(1));
    }

    #[test]
    fn reissuing_same_doc_duplicates_documents_entry() {
        let mut c = Contract::new("C1", "WF1", "Acme", RoleMapping::new());
        c.apply_event("x", issue("x", "Phyto"));
        c.apply_event("x", issue("x", "Phyto"));
        assert_eq!(c.documents, vec!["x", "x"]);
        assert_eq!(c.events_for("x").map(EventLog::len), Some(2));
    }

    #[test]
    fn empty_log_reads_as_absent() {
        let mut c = Contract::new("C1", "WF1", "Acme", RoleMapping::new());
        c.events.insert("ghost".into(), EventLog::default());
        assert!(c.events_for("ghost").is_none());
    }

    #[test]
    fn json_shape_round_trips_through_ledger_codec() {
        let mut c = Contract::new("C1", "WF1", "Acme", [("Exporter", "E1")].into_iter().collect());
        c.apply_event("x", issue("x", "Phyto"));
        let bytes = crate::ledger::codec::encode(&c).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("\"participants\":{\"Exporter\":\"E1\"}"));
        assert!(text.contains("\"DocTypeToDocIdMapping\":{\"Phyto\":\"x\"}"));
        let back: Contract = crate::ledger::codec::decode(&bytes).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn writes_the_deployed_chaincode_keys() {
        let mut c = Contract::new("C1", "WF1", "Acme", [("Exporter", "E1")].into_iter().collect());
        c.apply_event("x", issue("x", "Phyto"));
        let v = serde_json::to_value(&c).unwrap();
        let mut keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys,
                   vec!["ContractId", "DocTypeToDocIdMapping", "Documents", "WorkflowId", "contractName", "events",
                        "participants"]);
        assert_eq!(v["events"]["x"][0]["DocId"], "x");
        assert_eq!(v["events"]["x"][0]["DocType"], "Phyto");
    }

    #[test]
    fn reads_camel_case_records() {
        let c: Contract = serde_json::from_value(serde_json::json!({
            "workflowId": "WF1", "contractId": "C1", "documents": ["x"],
            "docTypeToDocIdMapping": { "Phyto": "x" }
        })).unwrap();
        assert_eq!(c.workflow_id, "WF1");
        assert_eq!(c.contract_id, "C1");
        assert_eq!(c.doc_id_for_type("Phyto"), Some("x"));
    }
}
