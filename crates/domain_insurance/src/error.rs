//! Adjudication errors

use core_kernel::MoneyError;
use thiserror::Error;

/// Errors that abort an adjudication
///
/// No partial result is produced for any of them.
#[derive(Debug, Error)]
pub enum AdjudicationError {
    /// The patient's income bracket has no entry in the subsidy table
    #[error("No subsidy tier for income bracket {bracket}")]
    TierNotFound { bracket: String },

    /// The computed split does not add up; this is an internal defect
    #[error("Adjudication invariant violated: {reason} (covered={covered}, payable={payable}, total={total})")]
    InvariantViolation {
        reason: String,
        covered: String,
        payable: String,
        total: String,
    },

    /// Rates outside 0-100%, negative caps and the like
    #[error("Invalid insurance profile: {0}")]
    InvalidProfile(String),

    #[error("Calculation error: {0}")]
    Money(#[from] MoneyError),
}

impl AdjudicationError {
    pub fn is_tier_not_found(&self) -> bool {
        matches!(self, AdjudicationError::TierNotFound { .. })
    }
}
