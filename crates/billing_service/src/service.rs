//! Billing engine orchestration
//!
//! [`BillingEngine`] owns the code registry and the claim book and talks to
//! the outside world only through ports. Every bill it builds and every
//! claim status change it makes is handed to the sinks before the call
//! returns.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use core_kernel::{BillId, ClaimId, Currency, OperationMetadata, VisitId};
use domain_billing::{Bill, BillBuilder, BillSinkPort};
use domain_catalog::{CodeCatalogPort, CodeRegistry};
use domain_claims::{Claim, ClaimBook, ClaimSinkPort, ClaimStatus, SupportingDocument};
use domain_encounter::{Encounter, VisitPort};
use domain_insurance::{AdjudicationResult, Adjudicator, InsuranceProfile, PatientPort};

use crate::config::EngineConfig;
use crate::error::ServiceError;

/// External collaborators of the engine
#[derive(Clone)]
pub struct EnginePorts {
    pub visits: Arc<dyn VisitPort>,
    pub patients: Arc<dyn PatientPort>,
    pub bill_sink: Arc<dyn BillSinkPort>,
    pub claim_sink: Arc<dyn ClaimSinkPort>,
}

/// Hospital billing and claim engine
pub struct BillingEngine {
    registry: Arc<CodeRegistry>,
    ports: EnginePorts,
    adjudicator: Adjudicator,
    claims: ClaimBook,
    /// Bills by visit; a visit is billed at most once
    bills: RwLock<HashMap<VisitId, Bill>>,
    currency: Currency,
    actor: String,
}

impl BillingEngine {
    /// Creates an engine over an already loaded registry
    pub fn new(registry: CodeRegistry, ports: EnginePorts, actor: impl Into<String>) -> Self {
        Self {
            currency: registry.currency(),
            registry: Arc::new(registry),
            claims: ClaimBook::with_sink(ports.claim_sink.clone()),
            ports,
            adjudicator: Adjudicator::new(),
            bills: RwLock::new(HashMap::new()),
            actor: actor.into(),
        }
    }

    /// Loads the registry from `catalog` and creates the engine
    pub async fn bootstrap(
        config: &EngineConfig,
        catalog: &dyn CodeCatalogPort,
        ports: EnginePorts,
    ) -> Result<Self, ServiceError> {
        config.validate()?;
        let registry = CodeRegistry::load(catalog, config.currency()?).await?;
        Ok(Self::new(registry, ports, config.adjudicator.clone()))
    }

    pub fn registry(&self) -> &CodeRegistry {
        &self.registry
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Builds the bill for a closed visit
    ///
    /// Billing the same visit again returns the bill produced the first
    /// time without saving it twice.
    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn build_bill(&self, visit_id: VisitId) -> Result<Bill, ServiceError> {
        if let Some(bill) = self.bills.read().await.get(&visit_id) {
            return Ok(bill.clone());
        }

        let visit = self.ports.visits.get_visit(visit_id, Some(self.metadata())).await?;
        let encounter = Encounter::from_visit(&visit, &self.registry)?;
        let bill = BillBuilder::new(&encounter, self.currency)?.build()?;

        let mut bills = self.bills.write().await;
        if let Some(existing) = bills.get(&visit_id) {
            return Ok(existing.clone());
        }
        self.ports.bill_sink.save_bill(&bill, Some(self.metadata())).await?;
        bills.insert(visit_id, bill.clone());

        info!(
            bill_id = %bill.id(),
            lines = bill.line_count(),
            grand_total = %bill.grand_total(),
            "bill built"
        );
        Ok(bill)
    }

    /// Looks up a bill this engine has built
    pub async fn bill(&self, bill_id: BillId) -> Result<Bill, ServiceError> {
        self.bills
            .read()
            .await
            .values()
            .find(|b| b.id() == bill_id)
            .cloned()
            .ok_or(ServiceError::BillNotFound(bill_id))
    }

    /// Adjudicates a bill against an explicit profile
    #[instrument(skip(self, bill, profile), fields(bill_id = %bill.id(), provider = %profile.provider_kind()))]
    pub fn adjudicate(
        &self,
        bill: &Bill,
        profile: &InsuranceProfile,
    ) -> Result<AdjudicationResult, ServiceError> {
        Ok(self.adjudicator.adjudicate(bill, profile)?)
    }

    /// Adjudicates a bill against the profile the patient currently holds
    #[instrument(skip(self, bill), fields(bill_id = %bill.id(), patient_id = %bill.patient_id()))]
    pub async fn adjudicate_for_patient(&self, bill: &Bill) -> Result<AdjudicationResult, ServiceError> {
        let profile = self.current_profile(bill).await?;
        self.adjudicate(bill, &profile)
    }

    /// Opens a draft claim for an adjudicated bill
    #[instrument(skip(self, bill, adjudication), fields(bill_id = %bill.id()))]
    pub async fn create_claim(
        &self,
        bill: &Bill,
        adjudication: AdjudicationResult,
    ) -> Result<Claim, ServiceError> {
        let claim = Claim::new(bill, adjudication, self.actor.as_str())?;
        self.track(claim).await
    }

    pub async fn claim(&self, claim_id: ClaimId) -> Result<Claim, ServiceError> {
        Ok(self.claims.get(claim_id).await?)
    }

    /// Claims raised against a bill, oldest first
    pub async fn claims_for_bill(&self, bill_id: BillId) -> Vec<Claim> {
        self.claims.claims_for_bill(bill_id).await
    }

    /// Draft -> Submitted
    #[instrument(skip(self))]
    pub async fn submit_claim(&self, claim_id: ClaimId) -> Result<Claim, ServiceError> {
        let actor = self.actor.clone();
        self.apply(claim_id, move |claim| claim.submit(actor)).await
    }

    /// Submitted -> UnderReview
    #[instrument(skip(self))]
    pub async fn start_review(&self, claim_id: ClaimId) -> Result<Claim, ServiceError> {
        let actor = self.actor.clone();
        self.apply(claim_id, move |claim| claim.start_review(actor)).await
    }

    /// UnderReview -> Approved, PartiallyApproved or Rejected per the adjudication
    #[instrument(skip(self))]
    pub async fn complete_review(&self, claim_id: ClaimId) -> Result<Claim, ServiceError> {
        let actor = self.actor.clone();
        self.apply(claim_id, move |claim| claim.complete_review(actor).map(|_| ()))
            .await
    }

    /// UnderReview -> Rejected with a reason on the audit trail
    #[instrument(skip(self, reason))]
    pub async fn reject_claim(
        &self,
        claim_id: ClaimId,
        reason: impl Into<String>,
    ) -> Result<Claim, ServiceError> {
        let actor = self.actor.clone();
        let reason = reason.into();
        self.apply(claim_id, move |claim| claim.reject(actor, reason)).await
    }

    #[instrument(skip(self, document), fields(document = %document.name))]
    pub async fn attach_document(
        &self,
        claim_id: ClaimId,
        document: SupportingDocument,
    ) -> Result<Claim, ServiceError> {
        let actor = self.actor.clone();
        self.apply(claim_id, move |claim| claim.add_document(document, actor))
            .await
    }

    #[instrument(skip(self, note))]
    pub async fn add_note(
        &self,
        claim_id: ClaimId,
        note: impl Into<String>,
    ) -> Result<Claim, ServiceError> {
        let actor = self.actor.clone();
        let note = note.into();
        self.apply(claim_id, move |claim| {
            claim.add_note(note, actor);
            Ok(())
        })
        .await
    }

    /// Raises a new claim for a bill under a changed profile
    ///
    /// Earlier claims keep their stored adjudication; the new draft records
    /// which claim it supersedes.
    #[instrument(skip(self, profile), fields(provider = %profile.provider_kind()))]
    pub async fn readjudicate(
        &self,
        bill_id: BillId,
        profile: &InsuranceProfile,
    ) -> Result<Claim, ServiceError> {
        let bill = self.bill(bill_id).await?;
        let adjudication = self.adjudicate(&bill, profile)?;

        let mut claim = Claim::new(&bill, adjudication, self.actor.as_str())?;
        if let Some(previous) = self.claims.claims_for_bill(bill_id).await.last() {
            claim = claim.superseding(previous.id());
        }
        self.track(claim).await
    }

    /// Bills a visit, adjudicates it against the patient's profile and
    /// submits the resulting claim
    #[instrument(skip(self))]
    pub async fn process_visit(&self, visit_id: VisitId) -> Result<Claim, ServiceError> {
        let bill = self.build_bill(visit_id).await?;
        let adjudication = self.adjudicate_for_patient(&bill).await?;
        let claim = self.create_claim(&bill, adjudication).await?;
        self.submit_claim(claim.id()).await
    }

    async fn current_profile(&self, bill: &Bill) -> Result<InsuranceProfile, ServiceError> {
        let patient = self
            .ports
            .patients
            .get_patient(bill.patient_id(), Some(self.metadata()))
            .await?;
        patient.insurance_profile.ok_or_else(|| {
            warn!(patient_id = %patient.id, "patient has no insurance profile");
            ServiceError::NoInsuranceProfile(patient.id)
        })
    }

    /// Saves the Draft snapshot, then tracks the claim
    async fn track(&self, claim: Claim) -> Result<Claim, ServiceError> {
        self.claims.insert(claim.clone()).await?;
        info!(
            claim_id = %claim.id(),
            claim_number = %claim.claim_number(),
            covered = %claim.adjudication().covered,
            payable = %claim.adjudication().payable,
            "claim created"
        );
        Ok(claim)
    }

    /// Applies a claim action against the status it was read in
    ///
    /// A concurrent change between the read and the write surfaces as
    /// `StatusConflict`; an action the state machine refuses surfaces as
    /// `InvalidTransition` with the stored claim untouched. The snapshot is
    /// saved before the book changes, so a sink failure also leaves the
    /// claim where it was.
    async fn apply<F>(&self, claim_id: ClaimId, action: F) -> Result<Claim, ServiceError>
    where
        F: FnOnce(&mut Claim) -> Result<(), domain_claims::ClaimError>,
    {
        let observed: ClaimStatus = self.claims.get(claim_id).await?.status();
        let (claim, ()) = self.claims.transition(claim_id, observed, action).await?;
        Ok(claim)
    }

    fn metadata(&self) -> OperationMetadata {
        OperationMetadata::default().initiated_by(self.actor.as_str())
    }
}
