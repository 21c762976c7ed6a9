//! Claims Management Domain
//!
//! Wraps an adjudication result into a [`Claim`] with a status lifecycle
//! and an append-only audit trail.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Draft -> Submitted -> UnderReview -> Approved | PartiallyApproved | Rejected
//! ```
//!
//! Transitions only move forward and the three outcomes are terminal. The
//! adjudication result stored on a claim never changes; a changed insurance
//! profile means a new claim against the same bill.

pub mod claim;
pub mod book;
pub mod ports;
pub mod error;

pub use claim::{Claim, ClaimStatus, ClaimType, ClaimAuditEntry, AuditEvent, SupportingDocument};
pub use book::ClaimBook;
pub use ports::ClaimSinkPort;
pub use error::ClaimError;
