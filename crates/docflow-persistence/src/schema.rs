//! Esquema Diesel (escrito a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    ledger_state (namespace, state_key) {
        namespace -> Text,
        state_key -> Text,
        state_value -> Bytea,
        updated_at -> Timestamptz,
        version -> Int8,
    }
}
