//! Escenario de demostración: exportación con orden de compra, factura y
//! conocimiento de embarque entre exportador, importador y naviera.

use std::collections::BTreeMap;

use chrono::Utc;
use docflow_core::constants::CONTRACT_VERSION;
use docflow_core::model::{Actor, DocType};
use docflow_core::{ContractEngine, Event, EventType, InMemoryLedger, InMemoryTemplateProvider, Ledger, RoleMapping,
                   TemplateProvider, WorkflowIO};
use log::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::hashing::doc_hash;

pub const DEMO_PROVIDER_ID: &str = "wfcc-trade";
pub const DEMO_WORKFLOW_ID: &str = "WF-EXPORT";

/// Template del workflow de exportación.
pub fn trade_workflow() -> WorkflowIO {
    let actors = ["Exporter", "Importer", "Carrier"];
    let doc_types = [("dt1", "PurchaseOrder"), ("dt2", "Invoice"), ("dt3", "BillOfLading")];
    WorkflowIO { id: DEMO_WORKFLOW_ID.to_string(),
                 name: "Export with documentary flow".into(),
                 version: "1".into(),
                 desc: "Exporter ships goods, importer pays against documents".into(),
                 actor_list: actors.iter()
                                   .enumerate()
                                   .map(|(i, name)| Actor { id: format!("a{}", i + 1),
                                                            name: name.to_string() })
                                   .collect(),
                 doc_type_list: doc_types.iter()
                                         .map(|(id, name)| DocType { id: id.to_string(),
                                                                     name: name.to_string(),
                                                                     r#type: name.to_string(),
                                                                     version: "1".into(),
                                                                     ..Default::default() })
                                         .collect(),
                 ..Default::default() }
}

pub fn demo_mapping() -> RoleMapping {
    [("Exporter", "acme-exports"), ("Importer", "globex-imports"), ("Carrier", "oceanic-lines")].into_iter()
                                                                                                .collect()
}

/// Payload de `init` apuntando al proveedor de templates indicado.
pub fn init_payload(provider_id: &str) -> String {
    serde_json::json!({ "version": CONTRACT_VERSION, "workflowTemplateCC": provider_id }).to_string()
}

pub fn new_contract_id() -> String {
    Uuid::new_v4().to_string()
}

/// Motor en memoria ya inicializado con el template de exportación.
pub fn in_memory_engine() -> Result<ContractEngine<InMemoryLedger, InMemoryTemplateProvider>, AppError> {
    let templates = InMemoryTemplateProvider::new(DEMO_PROVIDER_ID).with_template(trade_workflow());
    let mut engine = ContractEngine::new_with_stores(InMemoryLedger::new(), templates);
    engine.init(&init_payload(DEMO_PROVIDER_ID))?;
    Ok(engine)
}

/// Documento de la demo: el hash se calcula sobre `content`.
#[derive(Debug, Clone)]
pub struct DemoDocument {
    pub doc_id: String,
    pub doc_type: String,
    pub content: Vec<u8>,
}

impl DemoDocument {
    pub fn new(doc_id: &str, doc_type: &str, content: &str) -> Self {
        Self { doc_id: doc_id.to_string(),
               doc_type: doc_type.to_string(),
               content: content.as_bytes().to_vec() }
    }

    pub fn event(&self, user: &str, role: &str, event_type: EventType) -> Event {
        Event { user: user.to_string(),
                role: role.to_string(),
                organization: format!("{user}-org"),
                doc_id: self.doc_id.clone(),
                doc_type: self.doc_type.clone(),
                time_stamp: Utc::now().to_rfc3339(),
                event_type,
                doc_hash: doc_hash(&self.content),
                doc_url: format!("https://docs.example.org/{}", self.doc_id) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub contract_id: String,
    pub documents: Vec<String>,
    pub events_per_doc: BTreeMap<String, usize>,
    pub doc_type_to_doc_id: BTreeMap<String, String>,
}

fn submit<L, T>(engine: &mut ContractEngine<L, T>,
                contract_id: &str,
                doc: &DemoDocument,
                event: Event)
                -> Result<usize, AppError>
    where L: Ledger,
          T: TemplateProvider
{
    let payload = serde_json::to_string(&event)?;
    let position = match event.event_type {
        EventType::Issue => engine.issue(contract_id, &doc.doc_id, &payload)?,
        EventType::Sign => engine.add_signature(contract_id, &doc.doc_id, &payload)?,
        _ => engine.read(contract_id, &doc.doc_id, &payload)?,
    };
    Ok(position)
}

/// Corre el escenario completo sobre un motor ya inicializado cuyo proveedor
/// conoce `DEMO_WORKFLOW_ID`.
pub fn run_scenario<L, T>(engine: &mut ContractEngine<L, T>, contract_id: &str) -> Result<ScenarioReport, AppError>
    where L: Ledger,
          T: TemplateProvider
{
    let mapping = serde_json::to_string(&demo_mapping())?;
    engine.add_contract(DEMO_WORKFLOW_ID, contract_id, "ACME -> Globex", &mapping)?;
    info!("demo contract {} created", contract_id);

    let po = DemoDocument::new("PO-1", "PurchaseOrder", "500 units @ 12.40 USD");
    let invoice = DemoDocument::new("INV-1", "Invoice", "invoice total 6200.00 USD");
    let bl = DemoDocument::new("BL-1", "BillOfLading", "container MSKU1234567");

    submit(engine, contract_id, &po, po.event("globex-imports", "Importer", EventType::Issue))?;
    submit(engine, contract_id, &po, po.event("acme-exports", "Exporter", EventType::Sign))?;
    submit(engine, contract_id, &invoice, invoice.event("acme-exports", "Exporter", EventType::Issue))?;
    submit(engine, contract_id, &invoice, invoice.event("globex-imports", "Importer", EventType::Read))?;
    submit(engine, contract_id, &bl, bl.event("oceanic-lines", "Carrier", EventType::Issue))?;
    let last = submit(engine, contract_id, &bl, bl.event("globex-imports", "Importer", EventType::Sign))?;
    if last != 1 {
        return Err(AppError::Scenario(format!("BL-1 expected 2 events, last position {last}")));
    }

    let contract = engine.get_contract(contract_id)?;
    Ok(ScenarioReport { contract_id: contract.contract_id.clone(),
                        documents: contract.documents.clone(),
                        events_per_doc: contract.events.iter().map(|(doc, log)| (doc.clone(), log.len())).collect(),
                        doc_type_to_doc_id: contract.doc_type_to_doc_id_mapping.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_declares_every_mapped_role() {
        let wf = trade_workflow();
        let mapping = demo_mapping();
        assert!(wf.actor_names().all(|r| mapping.contains_role(r)));
        assert_eq!(wf.doc_type_list.len(), 3);
    }

    #[test]
    fn events_carry_the_content_hash() {
        let doc = DemoDocument::new("D1", "Invoice", "abc");
        let ev = doc.event("alice", "Exporter", EventType::Issue);
        assert_eq!(ev.doc_hash, doc_hash(b"abc"));
        assert_eq!(ev.doc_id, "D1");
        assert!(ev.is_issue());
    }

    #[test]
    fn contract_ids_are_unique() {
        assert_ne!(new_contract_id(), new_contract_id());
    }
}
