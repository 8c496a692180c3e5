//! `PgLedger`: estado clave-valor de una chaincode sobre `ledger_state`.
//!
//! Cada fila lleva una versión. `get_state` registra la versión leída (o que
//! la clave no existía) y `put_state` escribe sólo si la fila sigue en esa
//! versión; si otra transacción escribió en el medio devuelve
//! `LedgerError::Conflict` y la operación entera se reenvía con `submit`.
//! Una escritura sin lectura previa de la clave es un upsert.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use log::{debug, error, info, warn};

use docflow_core::{ChaincodeError, ContractEngine, Ledger, LedgerError, TemplateProvider};

use super::ConnectionProvider;
use crate::error::{is_retryable, PersistenceError};
use crate::retry::RetryPolicy;
use crate::schema::ledger_state;

#[derive(Insertable)]
#[diesel(table_name = ledger_state)]
struct NewStateRow<'a> {
    namespace: &'a str,
    state_key: &'a str,
    state_value: &'a [u8],
}

/// Versión observada por la última lectura de una clave: `None` si no existía.
type ReadVersion = Option<i64>;

fn read_row(conn: &mut PgConnection, namespace: &str, key: &str) -> Result<Option<(Vec<u8>, i64)>, PersistenceError> {
    ledger_state::table.filter(ledger_state::namespace.eq(namespace))
                       .filter(ledger_state::state_key.eq(key))
                       .select((ledger_state::state_value, ledger_state::version))
                       .first::<(Vec<u8>, i64)>(conn)
                       .optional()
                       .map_err(PersistenceError::from)
}

/// Devuelve las filas afectadas; 0 significa que la versión leída ya no está.
fn write_row(conn: &mut PgConnection, row: &NewStateRow<'_>, read: Option<ReadVersion>) -> Result<usize, PersistenceError> {
    let written = match read {
        // Leída como ausente: sólo se crea si nadie la creó después.
        Some(None) => diesel::insert_into(ledger_state::table).values(row)
                                                              .on_conflict_do_nothing()
                                                              .execute(conn),
        Some(Some(version)) => {
            let target = ledger_state::table.filter(ledger_state::namespace.eq(row.namespace))
                                            .filter(ledger_state::state_key.eq(row.state_key))
                                            .filter(ledger_state::version.eq(version));
            diesel::update(target).set((ledger_state::state_value.eq(row.state_value),
                                        ledger_state::version.eq(version + 1),
                                        ledger_state::updated_at.eq(diesel::dsl::now)))
                                  .execute(conn)
        }
        None => diesel::insert_into(ledger_state::table).values(row)
                                                        .on_conflict((ledger_state::namespace, ledger_state::state_key))
                                                        .do_update()
                                                        .set((ledger_state::state_value
                                                              .eq(excluded(ledger_state::state_value)),
                                                              ledger_state::version.eq(ledger_state::version + 1_i64),
                                                              ledger_state::updated_at.eq(diesel::dsl::now)))
                                                        .execute(conn),
    };
    written.map_err(PersistenceError::from)
}

/// Ledger durable: estado de una chaincode (namespace) en `ledger_state`.
pub struct PgLedger<P: ConnectionProvider> {
    provider: P,
    namespace: String,
    reads: RefCell<HashMap<String, ReadVersion>>,
}

impl<P: ConnectionProvider> PgLedger<P> {
    pub fn new(provider: P, namespace: impl Into<String>) -> Self {
        Self { provider,
               namespace: namespace.into(),
               reads: RefCell::new(HashMap::new()) }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Olvida las versiones leídas: lo siguiente que se escriba pertenece a
    /// una operación nueva.
    pub fn begin_operation(&mut self) {
        self.reads.get_mut().clear();
    }

    /// Versión actual de `key`, si existe. Empieza en 1.
    pub fn version(&self, key: &str) -> Result<Option<i64>, PersistenceError> {
        RetryPolicy::LEDGER.run("version", is_retryable, || {
                               let mut conn = self.provider.connection()?;
                               read_row(&mut conn, &self.namespace, key).map(|row| row.map(|(_, v)| v))
                           })
    }

    /// Momento de la última escritura de `key`, si existe.
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, PersistenceError> {
        RetryPolicy::LEDGER.run("updated_at", is_retryable, || {
                               let mut conn = self.provider.connection()?;
                               ledger_state::table.filter(ledger_state::namespace.eq(&self.namespace))
                                                  .filter(ledger_state::state_key.eq(key))
                                                  .select(ledger_state::updated_at)
                                                  .first::<DateTime<Utc>>(&mut conn)
                                                  .optional()
                                                  .map_err(PersistenceError::from)
                           })
    }

    /// Claves del namespace en orden lexicográfico (inspección / CLI).
    pub fn keys(&self) -> Result<Vec<String>, PersistenceError> {
        RetryPolicy::LEDGER.run("keys", is_retryable, || {
                               let mut conn = self.provider.connection()?;
                               ledger_state::table.filter(ledger_state::namespace.eq(&self.namespace))
                                                  .select(ledger_state::state_key)
                                                  .order(ledger_state::state_key.asc())
                                                  .load::<String>(&mut conn)
                                                  .map_err(PersistenceError::from)
                           })
    }
}

impl<P: ConnectionProvider> Ledger for PgLedger<P> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let row = RetryPolicy::LEDGER.run("get_state", is_retryable, || {
                                         let mut conn = self.provider.connection()?;
                                         read_row(&mut conn, &self.namespace, key)
                                     })
                                     .map_err(|e| {
                                         error!("get_state ns={} key={} failed: {}", self.namespace, key, e);
                                         LedgerError::Read { key: key.to_string(),
                                                             reason: e.to_string() }
                                     })?;
        self.reads
            .borrow_mut()
            .insert(key.to_string(), row.as_ref().map(|(_, version)| *version));
        Ok(row.map(|(value, _)| value))
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::Write { key: String::new(),
                                            reason: "empty key".into() });
        }
        let read = self.reads.get_mut().remove(key);
        let row = NewStateRow { namespace: &self.namespace,
                                state_key: key,
                                state_value: value };
        let affected = RetryPolicy::LEDGER.run("put_state", is_retryable, || {
                                              let mut conn = self.provider.connection()?;
                                              write_row(&mut conn, &row, read)
                                          })
                                          .map_err(|e| {
                                              error!("put_state ns={} key={} failed: {}", self.namespace, key, e);
                                              LedgerError::Write { key: key.to_string(),
                                                                   reason: e.to_string() }
                                          })?;
        if affected == 0 {
            warn!("put_state ns={} key={} lost the race (read {:?})", self.namespace, key, read);
            return Err(LedgerError::Conflict { key: key.to_string() });
        }
        debug!("put_state ns={} key={} bytes={}", self.namespace, key, value.len());
        Ok(())
    }
}

/// Ejecuta `op` como una transacción del ledger. Antes de cada intento se
/// olvidan las versiones leídas; si la escritura choca con otra transacción
/// la operación se reenvía completa y vuelve a leer el estado actual.
///
/// Los rechazos del motor (contrato duplicado, validación, etc.) se devuelven
/// sin reintento.
pub fn submit<P, T, R, F>(engine: &mut ContractEngine<PgLedger<P>, T>, label: &str, mut op: F) -> Result<R, ChaincodeError>
    where P: ConnectionProvider,
          T: TemplateProvider,
          F: FnMut(&mut ContractEngine<PgLedger<P>, T>) -> Result<R, ChaincodeError>
{
    let result = RetryPolicy::SUBMIT.run(label, ChaincodeError::is_ledger_conflict, || {
                                        engine.ledger_mut().begin_operation();
                                        op(engine)
                                    });
    if let Err(e) = &result {
        if e.is_ledger_conflict() {
            info!("{label}: giving up after repeated write conflicts");
        }
    }
    result
}
