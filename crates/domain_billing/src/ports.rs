//! Bill persistence port

use async_trait::async_trait;

use core_kernel::{DomainPort, OperationMetadata, PortError};

use crate::bill::Bill;

/// Append-only sink for finalised bills
#[async_trait]
pub trait BillSinkPort: DomainPort {
    /// Stores a bill; a bill id may only be saved once
    async fn save_bill(&self, bill: &Bill, metadata: Option<OperationMetadata>) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Records saved bills in memory
    #[derive(Debug, Default)]
    pub struct MockBillSink {
        bills: Arc<RwLock<Vec<Bill>>>,
    }

    impl MockBillSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Bills in the order they were saved
        pub async fn saved(&self) -> Vec<Bill> {
            self.bills.read().await.clone()
        }
    }

    impl DomainPort for MockBillSink {}

    #[async_trait]
    impl BillSinkPort for MockBillSink {
        async fn save_bill(&self, bill: &Bill, _metadata: Option<OperationMetadata>) -> Result<(), PortError> {
            let mut bills = self.bills.write().await;
            if bills.iter().any(|b| b.id() == bill.id()) {
                return Err(PortError::conflict(format!("bill {} already saved", bill.id())));
            }
            bills.push(bill.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockBillSink;
    use super::*;
    use crate::BillBuilder;
    use core_kernel::{Currency, PatientId, VisitId};
    use domain_encounter::Encounter;

    #[tokio::test]
    async fn test_sink_is_append_only() {
        let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
        encounter.close();
        let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();
        let sink = MockBillSink::new();

        sink.save_bill(&bill, None).await.unwrap();
        let again = sink.save_bill(&bill, None).await;

        assert!(matches!(again, Err(PortError::Conflict { .. })));
        assert_eq!(sink.saved().await.len(), 1);
    }
}
