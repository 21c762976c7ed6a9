//! Runs the bundled demo scenario through the file adapters

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_decimal_macros::dec;

use billing_service::adapters::{JsonLinesSink, ScenarioFile};
use billing_service::{BillingEngine, EngineConfig, EnginePorts, ServiceError};
use core_kernel::{Currency, Money};
use domain_claims::ClaimStatus;

fn demo_scenario() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/scenario.json")
}

fn sgd(amount: rust_decimal::Decimal) -> Money {
    Money::new(amount, Currency::SGD)
}

async fn engine(output: &Path) -> (BillingEngine, Arc<ScenarioFile>) {
    let scenario = Arc::new(ScenarioFile::load(demo_scenario(), Currency::SGD).await.unwrap());
    let sink = Arc::new(JsonLinesSink::new(output));
    let ports = EnginePorts {
        visits: scenario.clone(),
        patients: scenario.clone(),
        bill_sink: sink.clone(),
        claim_sink: sink,
    };
    let engine = BillingEngine::bootstrap(&EngineConfig::default(), scenario.as_ref(), ports)
        .await
        .unwrap();
    (engine, scenario)
}

#[tokio::test]
async fn test_demo_scenario_outcomes() {
    let output = std::env::temp_dir().join(format!("demo-{}.jsonl", uuid::Uuid::new_v4()));
    let (engine, scenario) = engine(&output).await;
    let visits = scenario.visit_ids().to_vec();
    assert_eq!(visits.len(), 3);

    // Government, bracket B2: 1000.00 bill, cap of 300.00 binds
    let claim = engine.process_visit(visits[0]).await.unwrap();
    assert_eq!(claim.adjudication().covered, sgd(dec!(300.00)));
    assert_eq!(claim.adjudication().payable, sgd(dec!(700.00)));

    // Private: dental excluded, 20% co-pay on 500.10
    let claim = engine.process_visit(visits[1]).await.unwrap();
    assert_eq!(claim.adjudication().grand_total, sgd(dec!(620.10)));
    assert_eq!(claim.adjudication().covered, sgd(dec!(400.08)));
    assert_eq!(claim.adjudication().payable, sgd(dec!(220.02)));
    engine.start_review(claim.id()).await.unwrap();
    let decided = engine.complete_review(claim.id()).await.unwrap();
    assert_eq!(decided.status(), ClaimStatus::PartiallyApproved);

    // Uninsured
    let err = engine.process_visit(visits[2]).await.unwrap_err();
    assert!(matches!(err, ServiceError::NoInsuranceProfile(_)));

    let written = tokio::fs::read_to_string(&output).await.unwrap();
    tokio::fs::remove_file(&output).await.ok();

    let records: Vec<serde_json::Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let bills = records.iter().filter(|r| r["record"] == "bill").count();
    let claims = records.iter().filter(|r| r["record"] == "claim").count();
    assert_eq!(bills, 3);
    // two claims created and submitted, one of them reviewed and decided
    assert_eq!(claims, 6);
    assert!(records.iter().all(|r| r["initiated_by"] == "auto-adjudicator"));
}
