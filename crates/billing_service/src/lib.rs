//! Billing Engine Service
//!
//! Wires the billing core to its collaborators and carries the ambient
//! stack: configuration, tracing, and error reporting.
//!
//! ```text
//!   VisitPort ----> Encounter ----> BillBuilder ----> Bill ----> BillSinkPort
//!                      ^                               |
//!   CodeCatalogPort -> CodeRegistry                    v
//!   PatientPort ----> InsuranceProfile ----------> Adjudicator
//!                                                      |
//!                                                      v
//!                              ClaimBook <---------- Claim ----> ClaimSinkPort
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use billing_service::{BillingEngine, EnginePorts, config::EngineConfig};
//!
//! let config = EngineConfig::load(None)?;
//! let engine = BillingEngine::bootstrap(&config, catalog.as_ref(), ports).await?;
//! let claim = engine.process_visit(visit_id).await?;
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;
pub mod adapters;

pub use config::EngineConfig;
pub use error::ServiceError;
pub use service::{BillingEngine, EnginePorts};
