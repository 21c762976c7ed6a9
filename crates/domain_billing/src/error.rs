//! Billing domain errors

use core_kernel::{MoneyError, VisitId};
use thiserror::Error;

/// Errors that can occur while building a bill
#[derive(Debug, Error)]
pub enum BillingError {
    /// Bills are only computed for finalised visits
    #[error("Encounter for visit {0} is still open")]
    EncounterOpen(VisitId),

    /// A line is priced in a different currency from the bill
    #[error("Calculation error: {0}")]
    Money(#[from] MoneyError),
}
