//! docflow-core: máquina de estados de contratos y documentos sobre un ledger
//! clave-valor.
//!
//! - `ledger`: trait `Ledger`, backend en memoria y codificación canónica.
//! - `template`: consulta de templates de workflow a otro componente.
//! - `validator`: mapeo rol → participante contra el template.
//! - `engine`: alta de contratos, registro de eventos, consultas y enrutado
//!   de operaciones por nombre.
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod model;
pub mod template;
pub mod validator;

pub use config::{init_dotenv, EngineOptions};
pub use engine::{ContractEngine, Operation};
pub use errors::{ChaincodeError, LedgerError, TemplateError, ValidationError};
pub use ledger::{InMemoryLedger, Ledger};
pub use model::{Contract, ContractState, Event, EventLog, EventType, RoleMapping, WorkflowIO};
pub use template::{ChaincodeTemplateProvider, InMemoryTemplateProvider, SampleTemplateProvider, TemplateClient,
                   TemplateProvider, TemplateQuery};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Actor;
    use serde_json::json;

    fn engine() -> ContractEngine<InMemoryLedger, InMemoryTemplateProvider> {
        let template = WorkflowIO { id: "WF1".into(),
                                    actor_list: vec![Actor { id: "1".into(), name: "Exporter".into() },
                                                     Actor { id: "2".into(), name: "Importer".into() }],
                                    ..Default::default() };
        let mut engine = ContractEngine::new_with_stores(InMemoryLedger::new(),
                                                         InMemoryTemplateProvider::new("wfcc1").with_template(template));
        engine.init(r#"{"version":"1.0.0","workflowTemplateCC":"wfcc1"}"#).expect("init");
        engine
    }

    #[test]
    fn issue_sign_read_through_invoke() {
        let mut engine = engine();
        engine.invoke("addContract", &["WF1", "C1", "Acme", r#"{"Exporter":"E1","Importer":"I1"}"#])
              .expect("addContract");
        for event_type in ["Issue", "Sign", "Read"] {
            let ev = json!({ "user": "Masai", "docId": "doc1", "docType": "Phyto", "eventType": event_type }).to_string();
            let op = match event_type {
                "Issue" => "issue",
                "Sign" => "addSignature",
                _ => "read",
            };
            assert_eq!(engine.invoke(op, &["C1", "doc1", ev.as_str()]), Ok(None));
        }
        let bytes = engine.query("getEventsForDocument", &["C1", "doc1"]).expect("events");
        let events: Vec<Event> = serde_json::from_slice(&bytes).unwrap();
        let kinds: Vec<_> = events.iter().map(|e| e.event_type.to_string()).collect();
        assert_eq!(kinds, vec!["Issue", "Sign", "Read"]);
    }

    #[test]
    fn unknown_and_misrouted_operations_fail() {
        let mut engine = engine();
        assert_eq!(engine.invoke::<&str>("transfer", &[]), Err(ChaincodeError::UnknownOperation("transfer".into())));
        assert!(matches!(engine.invoke("getContract", &["C1"]), Err(ChaincodeError::UnknownOperation(_))));
        assert!(matches!(engine.query("issue", &["C1", "d", "{}"]), Err(ChaincodeError::UnknownOperation(_))));
    }
}
