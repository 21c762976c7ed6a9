//! Core Kernel - Foundational types shared by the hospital billing domains
//!
//! This crate provides the building blocks used by every other crate:
//! - Money and rates with precise decimal arithmetic and half-up rounding
//! - Strongly-typed identifiers for patients, visits, bills and claims
//! - Port infrastructure for the external collaborators (catalog, patient
//!   and visit lookup, persistence sinks)

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate};
pub use identifiers::{PatientId, VisitId, BillId, ClaimId, AuditEventId};
pub use ports::{PortError, DomainPort, OperationMetadata};
