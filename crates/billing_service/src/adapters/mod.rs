//! File-backed adapters
//!
//! - **ScenarioFile**: a JSON document holding the price catalog, patients
//!   and visits; serves as catalog, patient and visit source
//! - **JsonLinesSink**: appends bills and claim snapshots to a JSON lines file
//!
//! ```rust,ignore
//! let scenario = Arc::new(ScenarioFile::load("scenario.json", Currency::SGD).await?);
//! let sink = Arc::new(JsonLinesSink::new("billing-output.jsonl"));
//! let ports = EnginePorts {
//!     visits: scenario.clone(),
//!     patients: scenario.clone(),
//!     bill_sink: sink.clone(),
//!     claim_sink: sink,
//! };
//! ```

pub mod scenario;
pub mod jsonl;

pub use scenario::{Scenario, ScenarioFile};
pub use jsonl::JsonLinesSink;
