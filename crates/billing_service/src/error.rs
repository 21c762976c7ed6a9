//! Service errors

use core_kernel::{BillId, PatientId, PortError};
use domain_billing::BillingError;
use domain_catalog::CatalogError;
use domain_claims::ClaimError;
use domain_encounter::EncounterError;
use domain_insurance::AdjudicationError;
use thiserror::Error;

/// Errors surfaced by the billing engine
///
/// Domain errors pass through unchanged so callers can still match on the
/// specific kind.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Encounter(#[from] EncounterError),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Adjudication(#[from] AdjudicationError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// Self-paying patients have nothing to adjudicate against
    #[error("Patient {0} has no insurance profile")]
    NoInsuranceProfile(PatientId),

    #[error("Bill not found: {0}")]
    BillNotFound(BillId),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to initialise tracing: {0}")]
    Telemetry(String),
}

impl ServiceError {
    /// True for errors caused by the input rather than the engine
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Encounter(_)
                | ServiceError::Billing(BillingError::EncounterOpen(_))
                | ServiceError::Adjudication(AdjudicationError::TierNotFound { .. })
                | ServiceError::Adjudication(AdjudicationError::InvalidProfile(_))
                | ServiceError::Claim(ClaimError::InvalidTransition { .. })
                | ServiceError::NoInsuranceProfile(_)
                | ServiceError::BillNotFound(_)
        ) || matches!(self, ServiceError::Port(err) if err.is_not_found())
    }
}
