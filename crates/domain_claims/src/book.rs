//! In-process claim store with atomic status transitions

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use core_kernel::{BillId, ClaimId, OperationMetadata};

use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::ports::ClaimSinkPort;

/// Claims keyed by id
///
/// [`ClaimBook::transition`] checks the stored status and applies the
/// change under one write lock, so two workers racing on the same claim
/// cannot both succeed. With a sink attached, the new snapshot is saved
/// while that lock is held and the book only changes once the save went
/// through.
#[derive(Clone, Default)]
pub struct ClaimBook {
    claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
    sink: Option<Arc<dyn ClaimSinkPort>>,
}

impl fmt::Debug for ClaimBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimBook")
            .field("claims", &self.claims)
            .field("persisted", &self.sink.is_some())
            .finish()
    }
}

impl ClaimBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A book that saves every snapshot to `sink` before keeping it
    pub fn with_sink(sink: Arc<dyn ClaimSinkPort>) -> Self {
        Self {
            claims: Arc::default(),
            sink: Some(sink),
        }
    }

    /// Starts tracking a claim
    ///
    /// # Errors
    ///
    /// * `DuplicateClaim` if the id is already tracked
    /// * `Sink` if the snapshot could not be saved; nothing is tracked then
    pub async fn insert(&self, claim: Claim) -> Result<(), ClaimError> {
        let mut claims = self.claims.write().await;
        if claims.contains_key(&claim.id()) {
            return Err(ClaimError::DuplicateClaim(claim.id()));
        }
        self.persist(&claim).await?;
        debug!(claim_id = %claim.id(), bill_id = %claim.bill_id(), "claim tracked");
        claims.insert(claim.id(), claim);
        Ok(())
    }

    pub async fn get(&self, id: ClaimId) -> Result<Claim, ClaimError> {
        self.claims
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ClaimError::ClaimNotFound(id))
    }

    /// Applies `action` if the claim is still in `expected`
    ///
    /// The action runs on a copy that replaces the stored claim only when
    /// it succeeds, so a failed action leaves the claim as it was.
    ///
    /// # Errors
    ///
    /// * `ClaimNotFound` for an unknown id
    /// * `StatusConflict` if the stored status is not `expected`
    /// * whatever `action` returns
    /// * `Sink` if the updated snapshot could not be saved
    pub async fn transition<F, R>(
        &self,
        id: ClaimId,
        expected: ClaimStatus,
        action: F,
    ) -> Result<(Claim, R), ClaimError>
    where
        F: FnOnce(&mut Claim) -> Result<R, ClaimError>,
    {
        let mut claims = self.claims.write().await;
        let stored = claims.get_mut(&id).ok_or(ClaimError::ClaimNotFound(id))?;

        if stored.status() != expected {
            warn!(claim_id = %id, %expected, actual = %stored.status(), "claim status conflict");
            return Err(ClaimError::StatusConflict {
                id,
                expected,
                actual: stored.status(),
            });
        }

        let mut updated = stored.clone();
        let output = action(&mut updated)?;
        self.persist(&updated).await?;
        *stored = updated.clone();
        Ok((updated, output))
    }

    async fn persist(&self, claim: &Claim) -> Result<(), ClaimError> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        let mut metadata = OperationMetadata::with_correlation_id(claim.id().to_string());
        if let Some(entry) = claim.audit_trail().last() {
            metadata = metadata.initiated_by(entry.actor.as_str());
        }
        sink.save_claim(claim, Some(metadata)).await.map_err(|e| {
            warn!(claim_id = %claim.id(), status = %claim.status(), error = %e, "claim snapshot not saved");
            ClaimError::Sink(e)
        })
    }

    /// Every claim raised against a bill, oldest first
    pub async fn claims_for_bill(&self, bill_id: BillId) -> Vec<Claim> {
        let mut claims: Vec<Claim> = self
            .claims
            .read()
            .await
            .values()
            .filter(|c| c.bill_id() == bill_id)
            .cloned()
            .collect();
        claims.sort_by_key(|c| (c.created_at(), *c.id().as_uuid()));
        claims
    }

    pub async fn len(&self) -> usize {
        self.claims.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.claims.read().await.is_empty()
    }
}
