//! Opciones de ejecución del engine, cargadas desde variables de entorno.
//! Usa `.env` si existe. `init_dotenv` es el único cargador del workspace:
//! persistencia, CLI y demo lo llaman antes de leer variables.
//!
//! Variables:
//! - `DOCFLOW_ENFORCE_EVENT_TYPE`: `1`/`true` para exigir que `issue`,
//!   `addSignature` y `read` reciban eventos `Issue`, `Sign` y `Read`.
//! - `DOCFLOW_TEMPLATE_TIMEOUT_MS`: timeout de la consulta de templates.

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::constants::DEFAULT_TEMPLATE_TIMEOUT_MS;
use crate::errors::ChaincodeError;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // sin .env no es un error
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub enforce_event_type: bool,
    pub template_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { enforce_event_type: false, template_timeout: Duration::from_millis(DEFAULT_TEMPLATE_TIMEOUT_MS) }
    }
}

impl EngineOptions {
    pub fn from_env() -> Result<Self, ChaincodeError> {
        init_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChaincodeError>
        where F: Fn(&str) -> Option<String>
    {
        let mut opts = Self::default();
        if let Some(raw) = lookup("DOCFLOW_ENFORCE_EVENT_TYPE") {
            opts.enforce_event_type = parse_flag("DOCFLOW_ENFORCE_EVENT_TYPE", &raw)?;
        }
        if let Some(raw) = lookup("DOCFLOW_TEMPLATE_TIMEOUT_MS") {
            let ms: u64 = raw.trim()
                             .parse()
                             .map_err(|_| ChaincodeError::Config(format!("DOCFLOW_TEMPLATE_TIMEOUT_MS: invalid value '{raw}'")))?;
            if ms == 0 {
                return Err(ChaincodeError::Config("DOCFLOW_TEMPLATE_TIMEOUT_MS must be > 0".into()));
            }
            opts.template_timeout = Duration::from_millis(ms);
        }
        Ok(opts)
    }
}

/// Carga `.env` una sola vez por proceso; llamadas siguientes no hacen nada.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ChaincodeError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ChaincodeError::Config(format!("{name}: invalid flag '{raw}'"))),
    }
}
