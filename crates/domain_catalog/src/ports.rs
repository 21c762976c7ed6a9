//! Catalog source port
//!
//! The registry is filled from whatever holds the hospital price list: a
//! scenario file, a pricing service, or the in-memory mock used in tests.

use async_trait::async_trait;

use core_kernel::{DomainPort, OperationMetadata, PortError};

use crate::code::Code;

/// Source of chargeable code definitions
#[async_trait]
pub trait CodeCatalogPort: DomainPort {
    /// Loads every code in the catalog
    ///
    /// Identifiers are expected to be unique; the registry rejects the load
    /// otherwise.
    async fn load_codes(&self, metadata: Option<OperationMetadata>) -> Result<Vec<Code>, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory catalog
    #[derive(Debug, Default)]
    pub struct MockCodeCatalogPort {
        codes: Arc<RwLock<Vec<Code>>>,
        unavailable: bool,
    }

    impl MockCodeCatalogPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the catalog
        pub fn with_codes(codes: Vec<Code>) -> Self {
            Self {
                codes: Arc::new(RwLock::new(codes)),
                unavailable: false,
            }
        }

        /// A catalog whose every load fails
        pub fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        pub async fn add_code(&self, code: Code) {
            self.codes.write().await.push(code);
        }
    }

    impl DomainPort for MockCodeCatalogPort {}

    #[async_trait]
    impl CodeCatalogPort for MockCodeCatalogPort {
        async fn load_codes(
            &self,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Code>, PortError> {
            if self.unavailable {
                return Err(PortError::internal("catalog source unavailable"));
            }
            Ok(self.codes.read().await.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockCodeCatalogPort;
    use crate::code::CodeKind;
    use crate::{CatalogError, Code, CodeRegistry};
    use core_kernel::{Currency, Money};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_registry_loads_from_port() {
        let port = MockCodeCatalogPort::new();
        port.add_code(
            Code::new("I10", CodeKind::Diagnostic, "Hypertension", Money::new(dec!(80), Currency::SGD))
                .unwrap(),
        )
        .await;

        let registry = CodeRegistry::load(&port, Currency::SGD).await.unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("I10").is_ok());
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let port = MockCodeCatalogPort::unavailable();
        let result = CodeRegistry::load(&port, Currency::SGD).await;
        assert!(matches!(result, Err(CatalogError::Source(_))));
    }
}
