//! Enrutado de operaciones por nombre (`invoke` / `query`) hacia el engine.

use log::debug;

use super::core::ContractEngine;
use crate::errors::ChaincodeError;
use crate::ledger::Ledger;
use crate::template::TemplateProvider;

/// Operaciones expuestas por la chaincode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    AddContract,
    Issue,
    AddSignature,
    Read,
    AddCert,
    AddSampleTemplate,
    PrintSampleTemplate,
    GetEventsForDocument,
    GetContract,
}

impl Operation {
    pub const ALL: [Operation; 10] = [Self::Init,
                                      Self::AddContract,
                                      Self::Issue,
                                      Self::AddSignature,
                                      Self::Read,
                                      Self::AddCert,
                                      Self::AddSampleTemplate,
                                      Self::PrintSampleTemplate,
                                      Self::GetEventsForDocument,
                                      Self::GetContract];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::AddContract => "addContract",
            Self::Issue => "issue",
            Self::AddSignature => "addSignature",
            Self::Read => "read",
            Self::AddCert => "addCert",
            Self::AddSampleTemplate => "addSampleWfIOJson",
            Self::PrintSampleTemplate => "printSampleWfIOJson",
            Self::GetEventsForDocument => "getEventsForDocument",
            Self::GetContract => "getContract",
        }
    }

    /// Cantidad exacta de argumentos; `None` = cualquiera.
    pub fn arity(self) -> Option<usize> {
        match self {
            Self::Init | Self::AddSampleTemplate | Self::GetContract => Some(1),
            Self::GetEventsForDocument => Some(2),
            Self::Issue | Self::AddSignature | Self::Read => Some(3),
            Self::AddContract => Some(4),
            Self::PrintSampleTemplate => Some(0),
            Self::AddCert => None,
        }
    }

    /// Operaciones de sólo lectura (se atienden por `query`).
    pub fn is_query(self) -> bool {
        matches!(self, Self::GetEventsForDocument | Self::GetContract)
    }

    fn check_arity(self, found: usize) -> Result<(), ChaincodeError> {
        match self.arity() {
            Some(expected) if expected != found => {
                Err(ChaincodeError::Arguments { operation: self.name().to_string(), expected, found })
            }
            _ => Ok(()),
        }
    }
}

impl<L, T> ContractEngine<L, T>
    where L: Ledger,
          T: TemplateProvider
{
    /// Ejecuta una operación que modifica estado. Devuelve el payload de
    /// respuesta, si la operación tiene uno.
    pub fn invoke<A: AsRef<str>>(&mut self, function: &str, args: &[A]) -> Result<Option<Vec<u8>>, ChaincodeError> {
        let op = Operation::from_name(function).filter(|op| !op.is_query())
                                               .ok_or_else(|| ChaincodeError::UnknownOperation(function.to_string()))?;
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        op.check_arity(args.len())?;
        debug!("invoke: {} ({} args)", op.name(), args.len());
        match op {
            Operation::Init => self.init(args[0]).map(|_| None),
            Operation::AddContract => self.add_contract(args[0], args[1], args[2], args[3]).map(|_| None),
            Operation::Issue => self.issue(args[0], args[1], args[2]).map(|_| None),
            Operation::AddSignature => self.add_signature(args[0], args[1], args[2]).map(|_| None),
            Operation::Read => self.read(args[0], args[1], args[2]).map(|_| None),
            Operation::AddCert => self.add_cert(&args).map(|_| None),
            Operation::AddSampleTemplate => self.add_sample_template(args[0]).map(|_| None),
            Operation::PrintSampleTemplate => self.sample_template().map(Some),
            Operation::GetEventsForDocument | Operation::GetContract => {
                Err(ChaincodeError::UnknownOperation(function.to_string()))
            }
        }
    }

    /// Ejecuta una consulta de sólo lectura y devuelve su resultado en JSON.
    pub fn query<A: AsRef<str>>(&self, function: &str, args: &[A]) -> Result<Vec<u8>, ChaincodeError> {
        let op = Operation::from_name(function).filter(|op| op.is_query())
                                               .ok_or_else(|| ChaincodeError::UnknownOperation(function.to_string()))?;
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        op.check_arity(args.len())?;
        debug!("query: {} ({} args)", op.name(), args.len());
        match op {
            Operation::GetContract => self.get_contract_bytes(args[0]),
            _ => {
                let events = self.get_events_for_document(args[0], args[1])?;
                serde_json::to_vec(&events).map_err(|e| ChaincodeError::parse("events", e))
            }
        }
    }
}
