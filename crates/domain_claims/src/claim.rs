//! Claim aggregate

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use core_kernel::{AuditEventId, BillId, ClaimId, PatientId};
use domain_billing::Bill;
use domain_catalog::BenefitCategory;
use domain_insurance::AdjudicationResult;

use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Created from an adjudication, not yet sent
    Draft,
    /// Sent to the provider
    Submitted,
    /// Being reviewed by the provider
    UnderReview,
    /// Provider pays the whole bill
    Approved,
    /// Provider pays part of the bill
    PartiallyApproved,
    /// Provider pays nothing
    Rejected,
}

impl ClaimStatus {
    /// Checks the transition table
    pub fn can_transition_to(self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, target),
            (Draft, Submitted) |
            (Submitted, UnderReview) |
            (UnderReview, Approved) |
            (UnderReview, PartiallyApproved) |
            (UnderReview, Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ClaimStatus::Approved | ClaimStatus::PartiallyApproved | ClaimStatus::Rejected
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            ClaimStatus::Draft => "Claim has been drafted",
            ClaimStatus::Submitted => "Claim has been submitted",
            ClaimStatus::UnderReview => "Claim is under review",
            ClaimStatus::Approved => "Claim has been approved",
            ClaimStatus::PartiallyApproved => "Claim approved with adjustments",
            ClaimStatus::Rejected => "Claim has been rejected",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Inpatient if the bill includes a ward stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimType {
    Inpatient,
    Outpatient,
}

/// A document supporting a claim, such as a discharge summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportingDocument {
    pub name: String,
    /// Where the document is stored
    pub location: String,
}

impl SupportingDocument {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

/// What happened to a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    Created,
    StatusChanged { from: ClaimStatus, to: ClaimStatus },
    DocumentAttached { name: String },
    NoteAdded { note: String },
}

/// One entry in a claim's audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAuditEntry {
    pub id: AuditEventId,
    pub event: AuditEvent,
    pub actor: String,
    pub recorded_at: DateTime<Utc>,
}

/// An insurance claim for one bill
///
/// Status changes and appends to the audit trail are the only mutations.
/// The adjudication result is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    id: ClaimId,
    claim_number: String,
    patient_id: PatientId,
    bill_id: BillId,
    claim_type: ClaimType,
    adjudication: AdjudicationResult,
    status: ClaimStatus,
    /// Earlier claim for the same bill that this one replaces
    supersedes: Option<ClaimId>,
    documents: Vec<SupportingDocument>,
    audit_trail: Vec<ClaimAuditEntry>,
    submitted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a draft claim for a bill and its adjudication
    ///
    /// # Errors
    ///
    /// `BillMismatch` if the result was computed for a different bill.
    pub fn new(
        bill: &Bill,
        adjudication: AdjudicationResult,
        actor: impl Into<String>,
    ) -> Result<Self, ClaimError> {
        if adjudication.bill_id != bill.id() {
            return Err(ClaimError::BillMismatch {
                bill: bill.id(),
                adjudicated: adjudication.bill_id,
            });
        }

        let now = Utc::now();
        let claim_type = if bill
            .lines()
            .iter()
            .any(|line| line.category == BenefitCategory::Hospitalization)
        {
            ClaimType::Inpatient
        } else {
            ClaimType::Outpatient
        };

        let id = ClaimId::new_v7();
        let mut claim = Self {
            id,
            claim_number: claim_number(id),
            patient_id: bill.patient_id(),
            bill_id: bill.id(),
            claim_type,
            adjudication,
            status: ClaimStatus::Draft,
            supersedes: None,
            documents: Vec::new(),
            audit_trail: Vec::new(),
            submitted_at: None,
            created_at: now,
            updated_at: now,
        };
        claim.record(AuditEvent::Created, actor.into());
        Ok(claim)
    }

    /// Marks this claim as replacing an earlier one for the same bill
    pub fn superseding(mut self, previous: ClaimId) -> Self {
        self.supersedes = Some(previous);
        self
    }

    pub fn id(&self) -> ClaimId {
        self.id
    }

    pub fn claim_number(&self) -> &str {
        &self.claim_number
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn bill_id(&self) -> BillId {
        self.bill_id
    }

    pub fn claim_type(&self) -> ClaimType {
        self.claim_type
    }

    pub fn status(&self) -> ClaimStatus {
        self.status
    }

    /// The stored result; never recomputed
    pub fn adjudication(&self) -> &AdjudicationResult {
        &self.adjudication
    }

    pub fn supersedes(&self) -> Option<ClaimId> {
        self.supersedes
    }

    pub fn documents(&self) -> &[SupportingDocument] {
        &self.documents
    }

    pub fn audit_trail(&self) -> &[ClaimAuditEntry] {
        &self.audit_trail
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Draft -> Submitted
    pub fn submit(&mut self, actor: impl Into<String>) -> Result<(), ClaimError> {
        self.transition(ClaimStatus::Submitted, actor.into())?;
        self.submitted_at = Some(self.updated_at);
        Ok(())
    }

    /// Submitted -> UnderReview
    pub fn start_review(&mut self, actor: impl Into<String>) -> Result<(), ClaimError> {
        self.transition(ClaimStatus::UnderReview, actor.into())
    }

    /// UnderReview -> the outcome implied by the adjudication
    ///
    /// Fully covered (including a zero bill) is Approved, nothing covered is
    /// Rejected, anything in between is PartiallyApproved.
    pub fn complete_review(&mut self, actor: impl Into<String>) -> Result<ClaimStatus, ClaimError> {
        let outcome = self.decided_status();
        self.transition(outcome, actor.into())?;
        Ok(outcome)
    }

    /// UnderReview -> Rejected regardless of the adjudication
    pub fn reject(
        &mut self,
        actor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<(), ClaimError> {
        let actor = actor.into();
        self.transition(ClaimStatus::Rejected, actor.clone())?;
        self.record(AuditEvent::NoteAdded { note: reason.into() }, actor);
        Ok(())
    }

    /// Attaches a supporting document while the claim is still open
    pub fn add_document(
        &mut self,
        document: SupportingDocument,
        actor: impl Into<String>,
    ) -> Result<(), ClaimError> {
        if self.is_terminal() {
            return Err(ClaimError::ClaimClosed);
        }
        let name = document.name.clone();
        self.documents.push(document);
        self.record(AuditEvent::DocumentAttached { name }, actor.into());
        Ok(())
    }

    /// Appends a note to the audit trail; allowed in every state
    pub fn add_note(&mut self, note: impl Into<String>, actor: impl Into<String>) {
        self.record(AuditEvent::NoteAdded { note: note.into() }, actor.into());
    }

    fn decided_status(&self) -> ClaimStatus {
        let result = &self.adjudication;
        if result.is_fully_covered() {
            ClaimStatus::Approved
        } else if result.is_partially_covered() {
            ClaimStatus::PartiallyApproved
        } else {
            ClaimStatus::Rejected
        }
    }

    fn transition(&mut self, to: ClaimStatus, actor: String) -> Result<(), ClaimError> {
        let from = self.status;
        if !from.can_transition_to(to) {
            warn!(claim_id = %self.id, %from, %to, "invalid claim transition");
            return Err(ClaimError::InvalidTransition { from, to });
        }
        self.status = to;
        self.record(AuditEvent::StatusChanged { from, to }, actor);
        info!(claim_id = %self.id, claim_number = %self.claim_number, %from, %to, "claim status changed");
        Ok(())
    }

    fn record(&mut self, event: AuditEvent, actor: String) {
        let now = Utc::now();
        self.audit_trail.push(ClaimAuditEntry {
            id: AuditEventId::new_v7(),
            event,
            actor,
            recorded_at: now,
        });
        self.updated_at = now;
    }
}

/// Human-readable number derived from the time-ordered id
fn claim_number(id: ClaimId) -> String {
    format!("CLM-{}", id.as_uuid().simple()).to_uppercase()
}
