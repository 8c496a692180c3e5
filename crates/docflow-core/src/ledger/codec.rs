//! Codificación de valores del ledger.
//!
//! Todo lo que se escribe en el ledger pasa por `to_canonical_json`: claves de
//! objetos ordenadas y sin espacios. Dos peers que ejecutan la misma
//! transacción deben producir exactamente los mismos bytes para el mismo
//! valor lógico, si no el endorsement diverge.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Serializa un `Value` en forma canónica.
pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            out.push('{');
            for (i, (k, v)) in sorted.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Un `Value::String` nunca falla al serializar.
                out.push_str(&Value::String(k.clone()).to_string());
                out.push(':');
                write_canonical(v, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Serializa un registro a bytes canónicos listos para `put_state`.
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(record)?;
    Ok(to_canonical_json(&value).into_bytes())
}

/// Deserializa bytes leídos del ledger.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(bytes)
}
