//! JSON lines sink

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use core_kernel::{BillId, DomainPort, OperationMetadata, PortError};
use domain_billing::{Bill, BillSinkPort};
use domain_claims::{Claim, ClaimSinkPort};

#[derive(Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Record<'a> {
    Bill { bill: &'a Bill },
    Claim { claim: &'a Claim },
}

#[derive(Serialize)]
struct Line<'a> {
    saved_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    initiated_by: Option<&'a str>,
    #[serde(flatten)]
    record: Record<'a>,
}

/// Appends one JSON document per saved bill or claim snapshot
///
/// Writes are serialised through a single lock so lines never interleave.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    /// Bill ids already written by this sink
    written: Mutex<HashSet<BillId>>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: Mutex::new(HashSet::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, record: Record<'_>, metadata: Option<&OperationMetadata>) -> Result<(), PortError> {
        let line = Line {
            saved_at: Utc::now(),
            initiated_by: metadata.and_then(|m| m.initiated_by.as_deref()),
            record,
        };
        let mut bytes = serde_json::to_vec(&line)
            .map_err(|e| PortError::transformation(format!("cannot serialise record: {}", e)))?;
        bytes.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| PortError::io(format!("cannot open {}", self.path.display()), e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| PortError::io(format!("cannot write {}", self.path.display()), e))?;
        file.flush()
            .await
            .map_err(|e| PortError::io(format!("cannot flush {}", self.path.display()), e))?;
        Ok(())
    }
}

impl DomainPort for JsonLinesSink {}

#[async_trait]
impl BillSinkPort for JsonLinesSink {
    async fn save_bill(&self, bill: &Bill, metadata: Option<OperationMetadata>) -> Result<(), PortError> {
        let mut written = self.written.lock().await;
        if written.contains(&bill.id()) {
            return Err(PortError::conflict(format!("bill {} already saved", bill.id())));
        }
        self.append(Record::Bill { bill }, metadata.as_ref()).await?;
        written.insert(bill.id());
        debug!(bill_id = %bill.id(), path = %self.path.display(), "bill appended");
        Ok(())
    }
}

#[async_trait]
impl ClaimSinkPort for JsonLinesSink {
    async fn save_claim(&self, claim: &Claim, metadata: Option<OperationMetadata>) -> Result<(), PortError> {
        let _guard = self.written.lock().await;
        self.append(Record::Claim { claim }, metadata.as_ref()).await?;
        debug!(claim_id = %claim.id(), status = %claim.status(), "claim snapshot appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, PatientId, Rate, VisitId};
    use domain_billing::BillBuilder;
    use domain_encounter::Encounter;
    use domain_insurance::{Adjudicator, InsuranceProfile, PrivatePolicy};
    use rust_decimal_macros::dec;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("billing-sink-{}.jsonl", uuid::Uuid::new_v4()))
    }

    fn bill() -> Bill {
        let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
        encounter.close();
        BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap()
    }

    async fn lines(path: &Path) -> Vec<serde_json::Value> {
        tokio::fs::read_to_string(path)
            .await
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_bill_written_once() {
        let path = temp_path();
        let sink = JsonLinesSink::new(&path);
        let bill = bill();

        sink.save_bill(&bill, Some(OperationMetadata::default().initiated_by("desk-1")))
            .await
            .unwrap();
        let again = sink.save_bill(&bill, None).await;

        let records = lines(&path).await;
        tokio::fs::remove_file(&path).await.ok();

        assert!(matches!(again, Err(PortError::Conflict { .. })));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["record"], "bill");
        assert_eq!(records[0]["initiated_by"], "desk-1");
    }

    #[tokio::test]
    async fn test_claim_snapshots_append() {
        let path = temp_path();
        let sink = JsonLinesSink::new(&path);
        let bill = bill();
        let profile: InsuranceProfile = PrivatePolicy::new(
            "AIA",
            "AIA-1",
            core_kernel::Money::new(dec!(1000), Currency::SGD),
            Rate::from_percentage(dec!(10)),
        )
        .into();
        let result = Adjudicator::new().adjudicate(&bill, &profile).unwrap();
        let mut claim = Claim::new(&bill, result, "test").unwrap();

        sink.save_claim(&claim, None).await.unwrap();
        claim.submit("test").unwrap();
        sink.save_claim(&claim, None).await.unwrap();

        let records = lines(&path).await;
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["record"], "claim");
        assert_eq!(records[0]["claim"]["status"], "Draft");
        assert_eq!(records[1]["claim"]["status"], "Submitted");
        assert!(records[1].get("initiated_by").is_none());
    }

    #[tokio::test]
    async fn test_unwritable_path_is_io_error() {
        let sink = JsonLinesSink::new("/nonexistent-dir/out.jsonl");
        let err = sink.save_bill(&bill(), None).await.unwrap_err();
        assert!(matches!(err, PortError::Io { .. }));
    }
}
