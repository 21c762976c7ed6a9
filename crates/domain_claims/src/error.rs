//! Claims domain errors

use core_kernel::{BillId, ClaimId, PortError};
use thiserror::Error;

use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: ClaimStatus, to: ClaimStatus },

    /// The stored status moved on before a compare-and-swap applied
    #[error("Claim {id} is {actual}, expected {expected}")]
    StatusConflict {
        id: ClaimId,
        expected: ClaimStatus,
        actual: ClaimStatus,
    },

    #[error("Adjudication is for bill {adjudicated}, claim is for bill {bill}")]
    BillMismatch { bill: BillId, adjudicated: BillId },

    #[error("Claim {0} is already tracked")]
    DuplicateClaim(ClaimId),

    #[error("Claim already closed")]
    ClaimClosed,

    /// The snapshot could not be saved; the tracked claim is unchanged
    #[error("Claim snapshot not saved: {0}")]
    Sink(#[from] PortError),
}
