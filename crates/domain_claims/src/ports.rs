//! Claim persistence port

use async_trait::async_trait;

use core_kernel::{DomainPort, OperationMetadata, PortError};

use crate::claim::Claim;

/// Append-only sink for claim snapshots
///
/// Each status change is saved as a new record; the sink never updates or
/// deletes earlier ones.
#[async_trait]
pub trait ClaimSinkPort: DomainPort {
    async fn save_claim(&self, claim: &Claim, metadata: Option<OperationMetadata>) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::ClaimId;

    /// Records every saved snapshot in memory
    #[derive(Debug, Default)]
    pub struct MockClaimSink {
        records: Arc<RwLock<Vec<Claim>>>,
        capacity: Option<usize>,
    }

    impl MockClaimSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Accepts the first `accepted` saves and fails every later one
        pub fn failing_after(accepted: usize) -> Self {
            Self {
                records: Arc::default(),
                capacity: Some(accepted),
            }
        }

        /// All snapshots in save order
        pub async fn saved(&self) -> Vec<Claim> {
            self.records.read().await.clone()
        }

        /// Snapshots of one claim in save order
        pub async fn history(&self, id: ClaimId) -> Vec<Claim> {
            self.records
                .read()
                .await
                .iter()
                .filter(|c| c.id() == id)
                .cloned()
                .collect()
        }
    }

    impl DomainPort for MockClaimSink {}

    #[async_trait]
    impl ClaimSinkPort for MockClaimSink {
        async fn save_claim(&self, claim: &Claim, _metadata: Option<OperationMetadata>) -> Result<(), PortError> {
            let mut records = self.records.write().await;
            if self.capacity.is_some_and(|capacity| records.len() >= capacity) {
                return Err(PortError::internal("disk full"));
            }
            records.push(claim.clone());
            Ok(())
        }
    }
}
