//! In-memory code registry

use std::collections::HashMap;
use std::sync::Arc;

use core_kernel::{Currency, OperationMetadata};
use tracing::{debug, info, warn};

use crate::code::Code;
use crate::error::CatalogError;
use crate::ports::CodeCatalogPort;

/// Read-only code lookup table
///
/// Built once from a catalog source and then passed by reference to
/// whatever needs lookups. All codes share the registry currency.
#[derive(Debug, Clone)]
pub struct CodeRegistry {
    currency: Currency,
    codes: HashMap<String, Arc<Code>>,
}

impl CodeRegistry {
    /// Builds a registry from already validated codes
    ///
    /// Fails on a repeated identifier or a code priced in another currency.
    pub fn from_codes(
        currency: Currency,
        codes: impl IntoIterator<Item = Code>,
    ) -> Result<Self, CatalogError> {
        let mut table = HashMap::new();

        for code in codes {
            let actual = code.unit_price().currency();
            if actual != currency {
                return Err(CatalogError::CurrencyMismatch {
                    code: code.id().to_string(),
                    expected: currency.to_string(),
                    actual: actual.to_string(),
                });
            }
            let id = code.id().to_string();
            if table.contains_key(&id) {
                return Err(CatalogError::DuplicateCode(id));
            }
            debug!(code = %id, category = %code.category(), "registered code");
            table.insert(id, Arc::new(code));
        }

        Ok(Self { currency, codes: table })
    }

    /// Populates the registry from a catalog source
    pub async fn load(
        port: &dyn CodeCatalogPort,
        currency: Currency,
    ) -> Result<Self, CatalogError> {
        let metadata = OperationMetadata::default().with_context("currency", currency.code());
        let codes = port.load_codes(Some(metadata)).await?;
        let registry = Self::from_codes(currency, codes)?;
        info!(codes = registry.len(), currency = %currency, "code registry loaded");
        Ok(registry)
    }

    /// Resolves a code identifier
    pub fn lookup(&self, code_id: &str) -> Result<Arc<Code>, CatalogError> {
        match self.codes.get(code_id.trim()) {
            Some(code) => Ok(Arc::clone(code)),
            None => {
                warn!(code = %code_id, "unknown code");
                Err(CatalogError::UnknownCode(code_id.to_string()))
            }
        }
    }

    pub fn contains(&self, code_id: &str) -> bool {
        self.codes.contains_key(code_id.trim())
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All codes, ordered by identifier
    pub fn codes(&self) -> Vec<Arc<Code>> {
        let mut codes: Vec<_> = self.codes.values().cloned().collect();
        codes.sort_by(|a, b| a.id().cmp(b.id()));
        codes
    }
}
