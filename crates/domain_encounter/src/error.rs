//! Encounter domain errors

use core_kernel::VisitId;
use domain_catalog::CatalogError;
use thiserror::Error;

/// Errors raised while collecting occurrences
#[derive(Debug, Error)]
pub enum EncounterError {
    #[error("Unknown code: {0}")]
    UnknownCode(String),

    #[error("Invalid quantity {quantity} for code {code}: must be greater than zero")]
    InvalidQuantity { code: String, quantity: String },

    #[error("Invalid ward stay for {code}: discharged {discharged_at} before admission {admitted_at}")]
    InvalidStay {
        code: String,
        admitted_at: String,
        discharged_at: String,
    },

    #[error("Encounter for visit {0} is closed")]
    EncounterClosed(VisitId),

    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
}

impl From<CatalogError> for EncounterError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownCode(code) => EncounterError::UnknownCode(code),
            other => EncounterError::Catalog(other),
        }
    }
}
