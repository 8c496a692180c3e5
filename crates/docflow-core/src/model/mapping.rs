//! Mapeo rol → participante de un contrato.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::ChaincodeError;

/// Mapeo plano `rol → id de participante`.
///
/// La deserialización es estricta: cualquier valor que no sea string aborta el
/// parseo completo y el error nombra la clave culpable. Nunca se descartan
/// entradas en silencio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleMapping(BTreeMap<String, String>);

impl RoleMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsea el argumento JSON de `addContract`.
    pub fn from_json(raw: &str) -> Result<Self, ChaincodeError> {
        serde_json::from_str(raw).map_err(|e| ChaincodeError::InvalidMapping(e.to_string()))
    }

    pub fn insert(&mut self, role: impl Into<String>, participant: impl Into<String>) -> Option<String> {
        self.0.insert(role.into(), participant.into())
    }

    pub fn participant(&self, role: &str) -> Option<&str> {
        self.0.get(role).map(String::as_str)
    }

    pub fn contains_role(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RoleMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

struct RoleMappingVisitor;

impl<'de> Visitor<'de> for RoleMappingVisitor {
    type Value = RoleMapping;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a flat object of role name to participant id")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut roles = BTreeMap::new();
        while let Some(role) = access.next_key::<String>()? {
            let participant = access.next_value::<String>()
                                    .map_err(|e| de::Error::custom(format!("role '{role}': {e}")))?;
            if roles.insert(role.clone(), participant).is_some() {
                return Err(de::Error::custom(format!("role '{role}' is mapped twice")));
            }
        }
        Ok(RoleMapping(roles))
    }
}

impl<'de> Deserialize<'de> for RoleMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RoleMappingVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_string_mapping() {
        let m = RoleMapping::from_json(r#"{"Exporter":"E1","Importer":"I1"}"#).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.participant("Importer"), Some("I1"));
    }

    #[test]
    fn non_string_value_names_offending_key() {
        let err = RoleMapping::from_json(r#"{"Exporter":"E1","Importer":7}"#).unwrap_err();
        match err {
            ChaincodeError::InvalidMapping(msg) => assert!(msg.contains("Importer"), "msg={msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nested_value_is_rejected() {
        let err = RoleMapping::from_json(r#"{"Exporter":{"id":"E1"}}"#).unwrap_err();
        assert!(matches!(err, ChaincodeError::InvalidMapping(ref m) if m.contains("Exporter")));
    }

    #[test]
    fn non_object_and_garbage_are_rejected() {
        assert!(matches!(RoleMapping::from_json(r#"["Exporter"]"#), Err(ChaincodeError::InvalidMapping(_))));
        assert!(matches!(RoleMapping::from_json("not json"), Err(ChaincodeError::InvalidMapping(_))));
    }

    #[test]
    fn duplicate_role_is_rejected() {
        let err = RoleMapping::from_json(r#"{"Exporter":"E1","Exporter":"E2"}"#).unwrap_err();
        assert!(matches!(err, ChaincodeError::InvalidMapping(ref m) if m.contains("mapped twice")));
    }

    #[test]
    fn serializes_as_plain_object() {
        let m: RoleMapping = [("Importer", "I1"), ("Exporter", "E1")].into_iter().collect();
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"Exporter":"E1","Importer":"I1"}"#);
    }
}
