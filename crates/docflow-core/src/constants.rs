//! Constantes de la chaincode.
//!
//! Las claves "bien conocidas" del ledger viven aquí para que el engine, la
//! persistencia y los tests usen exactamente los mismos valores.

/// Versión lógica de esta build. `init` exige que el argumento coincida.
pub const CONTRACT_VERSION: &str = "1.0.0";

/// Clave donde `init` persiste el `ContractState` (versión + proveedor de
/// templates).
pub const WORKFLOW_TEMPLATE_KEY: &str = "WORKFLOW_TEMPLATE_KEY";

/// Clave del template de ejemplo (sólo tests / entornos de desarrollo).
pub const SAMPLE_WORKFLOW_TEMPLATE_KEY: &str = "SAMPLE_WORKFLOW_TEMPLATE_KEY";

/// Función que se invoca en la chaincode proveedora de templates.
pub const TEMPLATE_QUERY_FUNCTION: &str = "query";

/// Timeout por defecto de la consulta cross-chaincode (ms).
pub const DEFAULT_TEMPLATE_TIMEOUT_MS: u64 = 3_000;
