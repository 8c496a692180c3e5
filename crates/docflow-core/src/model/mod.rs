//! Tipos persistidos y de entrada de la chaincode.

mod contract;
mod event;
mod mapping;
mod state;
mod template;

pub use contract::{Contract, EventLog};
pub use event::{Event, EventType};
pub use mapping::RoleMapping;
pub use state::ContractState;
pub use template::{ActType, Action, ActionId, Actor, DependencyInfo, DocType, WorkflowIO};
