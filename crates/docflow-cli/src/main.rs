//! CLI mínima sobre el backend Postgres:
//!
//! - `docflow init '<json>'`
//! - `docflow invoke <function> [args...]`
//! - `docflow query <function> [args...]`
//!
//! `DOCFLOW_TEMPLATE_SOURCE=chaincode|sample` elige de dónde salen los
//! templates. Códigos de salida: 0 ok, 2 uso, 4 rechazado por la chaincode,
//! 5 fallo de infraestructura.

use std::process::ExitCode;

use docflow_core::{ChaincodeError, ChaincodeTemplateProvider, ContractEngine, EngineOptions, SampleTemplateProvider,
                   TemplateProvider};
use docflow_persistence::{submit, PgLedger, PgTemplateClient, PoolProvider};
use log::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Uso: docflow init '<json>' | docflow invoke <function> [args...] | docflow query <function> [args...]";

const EXIT_USAGE: u8 = 2;
const EXIT_REJECTED: u8 = 4;
const EXIT_INFRA: u8 = 5;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Invoke { function: String, args: Vec<String> },
    Query { function: String, args: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateSource {
    Chaincode,
    Sample,
}

fn parse_args(args: &[String]) -> Option<Command> {
    let (cmd, rest) = args.split_first()?;
    match cmd.as_str() {
        // `init` es un invoke con un único argumento.
        "init" if rest.len() == 1 => Some(Command::Invoke { function: "init".into(),
                                                            args: rest.to_vec() }),
        "invoke" | "query" => {
            let (function, fargs) = rest.split_first()?;
            let function = function.clone();
            let args = fargs.to_vec();
            if cmd == "invoke" {
                Some(Command::Invoke { function, args })
            } else {
                Some(Command::Query { function, args })
            }
        }
        _ => None,
    }
}

fn template_source(raw: Option<&str>) -> Result<TemplateSource, String> {
    match raw.map(str::trim) {
        None | Some("") | Some("chaincode") => Ok(TemplateSource::Chaincode),
        Some("sample") => Ok(TemplateSource::Sample),
        Some(other) => Err(format!("DOCFLOW_TEMPLATE_SOURCE inválido: '{other}' (chaincode|sample)")),
    }
}

fn exit_code_for(err: &ChaincodeError) -> u8 {
    if err.is_rejection() {
        EXIT_REJECTED
    } else {
        EXIT_INFRA
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter)
                                     .with_writer(std::io::stderr)
                                     .try_init();
}

fn print_payload(bytes: &[u8]) {
    if !bytes.is_empty() {
        println!("{}", String::from_utf8_lossy(bytes));
    }
}

fn main() -> ExitCode {
    docflow_persistence::init_dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::from(EXIT_USAGE);
    };
    let source = match template_source(std::env::var("DOCFLOW_TEMPLATE_SOURCE").ok().as_deref()) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("[docflow] {msg}");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    let options = match EngineOptions::from_env() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("[docflow] {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    let (pool, namespace) = match docflow_persistence::build_dev_pool_from_env() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[docflow] pool error: {e}");
            return ExitCode::from(EXIT_INFRA);
        }
    };
    let provider = PoolProvider { pool };
    let templates: Box<dyn TemplateProvider> = match source {
        TemplateSource::Chaincode => Box::new(ChaincodeTemplateProvider::new(PgTemplateClient::new(provider.clone()))),
        TemplateSource::Sample => Box::new(SampleTemplateProvider),
    };
    info!("docflow namespace={} templates={:?}", namespace, source);
    let ledger = PgLedger::new(provider, namespace);
    let mut engine = ContractEngine::new_with_stores(ledger, templates).with_options(options);

    let result = match &command {
        // Un invoke que choca con otra escritura se reenvía completo.
        Command::Invoke { function, args } => {
            submit(&mut engine, function, |e| e.invoke(function, args)).map(|out| out.unwrap_or_default())
        }
        Command::Query { function, args } => engine.query(function, args),
    };
    match result {
        Ok(bytes) => {
            print_payload(&bytes);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}
