//! Catalog domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors raised while loading or querying the code registry
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown code: {0}")]
    UnknownCode(String),

    #[error("Duplicate code in catalog: {0}")]
    DuplicateCode(String),

    #[error("Code identifier must not be blank")]
    EmptyIdentifier,

    #[error("Negative unit price {price} for code {code}")]
    NegativePrice { code: String, price: String },

    #[error("Code {code} is priced in {actual}, registry currency is {expected}")]
    CurrencyMismatch {
        code: String,
        expected: String,
        actual: String,
    },

    #[error("Catalog source failed: {0}")]
    Source(#[from] PortError),
}

impl CatalogError {
    /// True if the error is an unresolvable code reference
    pub fn is_unknown_code(&self) -> bool {
        matches!(self, CatalogError::UnknownCode(_))
    }
}
