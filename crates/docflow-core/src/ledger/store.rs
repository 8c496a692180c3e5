use std::collections::BTreeMap;

use super::Ledger;
use crate::errors::LedgerError;

/// Ledger en memoria (tests, demo). Orden de claves estable.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedger {
    pub inner: BTreeMap<String, Vec<u8>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Ledger for InMemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.inner.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::Write { key: String::new(), reason: "empty key".into() });
        }
        self.inner.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_are_distinguishable() {
        let mut ledger = InMemoryLedger::new();
        assert_eq!(ledger.get_state("k").unwrap(), None);
        ledger.put_state("k", b"").unwrap();
        assert_eq!(ledger.get_state("k").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn put_replaces_whole_value() {
        let mut ledger = InMemoryLedger::new();
        ledger.put_state("k", b"first").unwrap();
        ledger.put_state("k", b"2").unwrap();
        assert_eq!(ledger.get_state("k").unwrap().as_deref(), Some(&b"2"[..]));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut ledger = InMemoryLedger::new();
        assert!(matches!(ledger.put_state("", b"x"), Err(LedgerError::Write { .. })));
        assert!(ledger.is_empty());
    }
}
