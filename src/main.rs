use docflow::config::AppConfig;
use docflow::demo::{self, DEMO_PROVIDER_ID};
use docflow::AppError;
use docflow_core::constants::SAMPLE_WORKFLOW_TEMPLATE_KEY;
use docflow_core::{ChaincodeTemplateProvider, ContractEngine, InMemoryLedger, Ledger, SampleTemplateProvider};
use docflow_persistence::{build_pool, PgLedger, PgTemplateClient, PoolProvider};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Escenario completo en memoria: contrato, emisiones, firmas y consultas.
fn run_in_memory_demo() -> Result<(), AppError> {
    let mut engine = demo::in_memory_engine()?;
    let contract_id = demo::new_contract_id();
    let report = demo::run_scenario(&mut engine, &contract_id)?;
    println!("[demo] contrato {} documentos={:?}", report.contract_id, report.documents);
    for (doc, n) in &report.events_per_doc {
        println!("[demo]   {doc}: {n} evento(s)");
    }
    println!("[demo] docType -> docId: {:?}", report.doc_type_to_doc_id);

    let events = engine.query("getEventsForDocument", &[contract_id.as_str(), "INV-1"])?;
    println!("[demo] eventos INV-1: {}", String::from_utf8_lossy(&events));

    // Un segundo alta con el mismo id debe rechazarse sin tocar el estado.
    let before = engine.ledger().get_state(&contract_id)?;
    match engine.add_contract(demo::DEMO_WORKFLOW_ID, &contract_id, "dup", r#"{"Exporter":"x"}"#) {
        Err(e) => println!("[demo] alta duplicada rechazada: {e}"),
        Ok(_) => return Err(AppError::Scenario("duplicate contract accepted".into())),
    }
    if engine.ledger().get_state(&contract_id)? != before {
        return Err(AppError::Scenario("duplicate contract mutated state".into()));
    }
    Ok(())
}

/// Validación contra el template de prueba guardado en el propio ledger.
fn run_sample_template_demo() -> Result<(), AppError> {
    let mut engine = ContractEngine::new_with_stores(InMemoryLedger::new(), SampleTemplateProvider);
    engine.init(&demo::init_payload(DEMO_PROVIDER_ID))?;
    let template = serde_json::to_string(&demo::trade_workflow())?;
    engine.invoke("addSampleWfIOJson", &[template.as_str()])?;
    println!("[sample] template de prueba en {SAMPLE_WORKFLOW_TEMPLATE_KEY}: {} bytes",
             engine.sample_template()?.len());
    match engine.add_contract("any", "S1", "sample", r#"{"Exporter":"acme-exports"}"#) {
        Err(e) => println!("[sample] mapeo incompleto rechazado: {e}"),
        Ok(_) => return Err(AppError::Scenario("incomplete mapping accepted".into())),
    }
    let report = demo::run_scenario(&mut engine, "S2")?;
    println!("[sample] contrato S2 con {} documentos", report.documents.len());
    Ok(())
}

/// Mismo escenario con estado y templates en Postgres.
fn run_pg_demo(cfg: &AppConfig) -> Result<(), AppError> {
    let Some(db) = &cfg.database else {
        println!("[pg] DATABASE_URL no definido; se omite");
        return Ok(());
    };
    let pool = build_pool(db)?;
    let provider = PoolProvider { pool };

    let mut templates_ns = PgLedger::new(provider.clone(), DEMO_PROVIDER_ID);
    let template = serde_json::to_vec(&demo::trade_workflow())?;
    templates_ns.put_state(demo::DEMO_WORKFLOW_ID, &template)?;

    let ledger = PgLedger::new(provider.clone(), db.namespace.clone());
    let templates = ChaincodeTemplateProvider::new(PgTemplateClient::new(provider));
    let mut engine = ContractEngine::new_with_stores(ledger, templates).with_options(cfg.engine.clone());
    engine.init(&demo::init_payload(DEMO_PROVIDER_ID))?;
    let report = demo::run_scenario(&mut engine, &demo::new_contract_id())?;
    println!("[pg] contrato {} persistido en namespace {} ({} documentos)",
             report.contract_id,
             db.namespace,
             report.documents.len());
    Ok(())
}

fn main() {
    init_tracing();
    let cfg = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuración inválida: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run_in_memory_demo() {
        eprintln!("[demo] error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = run_sample_template_demo() {
        eprintln!("[sample] error: {e}");
        std::process::exit(1);
    }
    if cfg.run_pg_demo {
        if let Err(e) = run_pg_demo(&cfg) {
            eprintln!("[pg] error: {e}");
            std::process::exit(5);
        }
    }
}
