//! Cliente de templates respaldado por `ledger_state`: el namespace es el id
//! de la chaincode proveedora y la clave el `workflowId`.

use std::time::Duration;

use diesel::prelude::*;
use log::{debug, warn};

use docflow_core::constants::TEMPLATE_QUERY_FUNCTION;
use docflow_core::{TemplateClient, TemplateError};

use super::ConnectionProvider;
use crate::error::{is_connection_error, PersistenceError};
use crate::retry::RetryPolicy;
use crate::schema::ledger_state;

pub struct PgTemplateClient<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> PgTemplateClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn read_template(&self, chaincode_id: &str, workflow_id: &str, timeout_ms: u128) -> Result<Option<Vec<u8>>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        conn.build_transaction()
            .read_only()
            .run(|tx_conn| {
                diesel::sql_query(format!("SET LOCAL statement_timeout = {timeout_ms}")).execute(tx_conn)?;
                ledger_state::table.filter(ledger_state::namespace.eq(chaincode_id))
                                   .filter(ledger_state::state_key.eq(workflow_id))
                                   .select(ledger_state::state_value)
                                   .first::<Vec<u8>>(tx_conn)
                                   .optional()
            })
            .map_err(PersistenceError::from)
    }
}

impl<P: ConnectionProvider> TemplateClient for PgTemplateClient<P> {
    fn query_chaincode(&self,
                       chaincode_id: &str,
                       function: &str,
                       args: &[&str],
                       timeout: Duration)
                       -> Result<Vec<u8>, TemplateError> {
        if function != TEMPLATE_QUERY_FUNCTION {
            return Err(TemplateError::Unavailable(format!("{chaincode_id}: unsupported function '{function}'")));
        }
        let workflow_id = match args {
            [id] => *id,
            _ => {
                return Err(TemplateError::Unavailable(format!("{chaincode_id}: expected 1 argument, got {}",
                                                              args.len())))
            }
        };
        // statement_timeout = 0 significa "sin límite": mínimo 1 ms.
        let timeout_ms = timeout.as_millis().clamp(1, i32::MAX as u128);
        let result = RetryPolicy::template_read(timeout).run("template query", is_connection_error, || {
                                                            self.read_template(chaincode_id, workflow_id, timeout_ms)
                                                        });
        match result {
            Ok(Some(bytes)) => {
                debug!("template query cc={} workflow={} bytes={}", chaincode_id, workflow_id, bytes.len());
                Ok(bytes)
            }
            Ok(None) => Err(TemplateError::NotFound(workflow_id.to_string())),
            Err(PersistenceError::Timeout(_)) => Err(TemplateError::Timeout { workflow_id: workflow_id.to_string(),
                                                                              timeout }),
            Err(e) => {
                warn!("template query cc={} workflow={} failed: {}", chaincode_id, workflow_id, e);
                Err(TemplateError::Unavailable(e.to_string()))
            }
        }
    }
}
