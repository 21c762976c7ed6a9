//! Billing Engine - batch runner
//!
//! Bills every visit in a scenario file, adjudicates each bill against the
//! patient's insurance profile and walks the resulting claim through review.
//! Bills and claim snapshots are appended to the output file.
//!
//! # Usage
//!
//! ```bash
//! BILLING_SCENARIO_PATH=scenario.json cargo run --bin billing-engine
//!
//! # With an explicit config file
//! cargo run --bin billing-engine -- billing.toml
//! ```
//!
//! # Environment Variables
//!
//! * `BILLING_CURRENCY` - ISO currency code (default: SGD)
//! * `BILLING_LOG_LEVEL` - Log level or filter directive (default: info)
//! * `BILLING_LOG_JSON` - Emit JSON logs (default: false)
//! * `BILLING_ADJUDICATOR` - Actor recorded on claim audit entries
//! * `BILLING_SCENARIO_PATH` - Scenario file to run (required)
//! * `BILLING_OUTPUT_PATH` - Output file (default: billing-output.jsonl)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use billing_service::adapters::{JsonLinesSink, ScenarioFile};
use billing_service::{telemetry, BillingEngine, EngineConfig, EnginePorts};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config_file = std::env::args().nth(1).map(PathBuf::from);
    let config = EngineConfig::load(config_file.as_deref()).context("loading configuration")?;
    config.validate()?;

    telemetry::init_tracing(&config.log_level, config.log_json)?;

    let currency = config.currency()?;
    let scenario_path = config
        .scenario_path
        .clone()
        .context("no scenario configured; set BILLING_SCENARIO_PATH")?;
    let output_path = config
        .output_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("billing-output.jsonl"));

    tracing::info!(
        scenario = %scenario_path.display(),
        output = %output_path.display(),
        %currency,
        "Starting billing engine"
    );

    let scenario = Arc::new(
        ScenarioFile::load(&scenario_path, currency)
            .await
            .with_context(|| format!("loading scenario {}", scenario_path.display()))?,
    );
    let sink = Arc::new(JsonLinesSink::new(output_path));
    let ports = EnginePorts {
        visits: scenario.clone(),
        patients: scenario.clone(),
        bill_sink: sink.clone(),
        claim_sink: sink,
    };
    let engine = BillingEngine::bootstrap(&config, scenario.as_ref(), ports).await?;

    let mut failed = 0usize;
    for &visit_id in scenario.visit_ids() {
        match run_visit(&engine, visit_id).await {
            Ok(()) => {}
            Err(err) => {
                failed += 1;
                tracing::error!(%visit_id, error = %err, "visit not processed");
            }
        }
    }

    tracing::info!(
        visits = scenario.visit_ids().len(),
        failed,
        "Billing run complete"
    );
    Ok(())
}

async fn run_visit(
    engine: &BillingEngine,
    visit_id: core_kernel::VisitId,
) -> Result<(), billing_service::ServiceError> {
    let claim = engine.process_visit(visit_id).await?;
    engine.start_review(claim.id()).await?;
    let claim = engine.complete_review(claim.id()).await?;

    tracing::info!(
        %visit_id,
        claim_number = %claim.claim_number(),
        status = %claim.status(),
        covered = %claim.adjudication().covered,
        payable = %claim.adjudication().payable,
        "claim decided"
    );
    Ok(())
}
