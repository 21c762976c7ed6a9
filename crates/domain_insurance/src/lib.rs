//! Insurance Domain - Adjudication
//!
//! Decides how much of a finalised bill a provider pays. Providers form a
//! closed set, selected by the tag on [`InsuranceProfile`]:
//!
//! - **Government subsidy**: the patient's income bracket selects a tier
//!   (exact match only); covered = min(total x tier rate, tier cap).
//! - **Private policy**: excluded categories are split off and left to the
//!   patient, co-pay is taken from the eligible sum, then the insurer share
//!   is capped at the coverage limit with any overflow shifted back to the
//!   patient.
//!
//! Every result satisfies `covered + payable == grand total`. A result that
//! does not is reported as [`AdjudicationError::InvariantViolation`] and
//! never corrected.

pub mod profile;
pub mod adjudication;
pub mod patient;
pub mod ports;
pub mod error;

mod government;
mod private;

pub use profile::{
    InsuranceProfile, GovernmentSubsidy, PrivatePolicy, SubsidyTier, IncomeBracket, ProviderKind,
};
pub use adjudication::{Adjudicator, AdjudicationResult, RuleApplication, Rule};
pub use patient::Patient;
pub use ports::PatientPort;
pub use error::AdjudicationError;
