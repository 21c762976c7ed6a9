//! Visit management port

use async_trait::async_trait;

use core_kernel::{DomainPort, OperationMetadata, PortError, VisitId};

use crate::visit::Visit;

/// Read access to visit records owned by visit management
#[async_trait]
pub trait VisitPort: DomainPort {
    /// Fetches a visit with its recorded charges and closed flag
    async fn get_visit(
        &self,
        id: VisitId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Visit, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory visit store
    #[derive(Debug, Default)]
    pub struct MockVisitPort {
        visits: Arc<RwLock<HashMap<VisitId, Visit>>>,
    }

    impl MockVisitPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with visits for testing
        pub async fn with_visits(visits: Vec<Visit>) -> Self {
            let port = Self::new();
            for visit in visits {
                port.insert(visit).await;
            }
            port
        }

        pub async fn insert(&self, visit: Visit) {
            self.visits.write().await.insert(visit.id, visit);
        }

        /// Flags a stored visit as closed, as visit management would
        pub async fn close(&self, id: VisitId) -> Result<(), PortError> {
            let mut visits = self.visits.write().await;
            let visit = visits
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Visit", id))?;
            visit.closed = true;
            Ok(())
        }
    }

    impl DomainPort for MockVisitPort {}

    #[async_trait]
    impl VisitPort for MockVisitPort {
        async fn get_visit(
            &self,
            id: VisitId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Visit, PortError> {
            self.visits
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Visit", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockVisitPort;
    use super::*;
    use core_kernel::PatientId;

    #[tokio::test]
    async fn test_missing_visit_is_not_found() {
        let port = MockVisitPort::new();
        let err = port.get_visit(VisitId::new(), None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_close_updates_stored_visit() {
        let visit = Visit::new(VisitId::new(), PatientId::new());
        let id = visit.id;
        let port = MockVisitPort::with_visits(vec![visit]).await;

        port.close(id).await.unwrap();
        assert!(port.get_visit(id, None).await.unwrap().closed);
    }
}
