//! Adjudication results and the provider dispatch

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use core_kernel::{BillId, Money};
use domain_billing::Bill;

use crate::error::AdjudicationError;
use crate::profile::{InsuranceProfile, ProviderKind};
use crate::{government, private};

/// Rules, in the order providers evaluate them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Bracket lookup; amount is the tier share before any cap
    SubsidyTier,
    /// Tier cap; amount is what the cap removed
    SubsidyCap,
    /// Excluded categories; amount is the excluded sum
    ExclusionPartition,
    /// Co-pay on eligible charges; amount is the patient share
    CoPay,
    /// Coverage limit; amount is what shifted back to the patient
    CoverageLimit,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::SubsidyTier => "subsidy tier",
            Rule::SubsidyCap => "subsidy cap",
            Rule::ExclusionPartition => "exclusion partition",
            Rule::CoPay => "co-pay",
            Rule::CoverageLimit => "coverage limit",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of the decision trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleApplication {
    pub rule: Rule,
    pub amount: Money,
    pub detail: String,
}

impl RuleApplication {
    pub fn new(rule: Rule, amount: Money, detail: impl Into<String>) -> Self {
        Self {
            rule,
            amount,
            detail: detail.into(),
        }
    }
}

/// Outcome of adjudicating one bill against one profile
///
/// `covered + payable == grand_total` holds for every value produced by
/// [`Adjudicator::adjudicate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicationResult {
    pub bill_id: BillId,
    pub provider_kind: ProviderKind,
    pub provider_name: String,
    /// Scheme name or policy number the result was computed under
    #[serde(default)]
    pub policy_reference: Option<String>,
    pub grand_total: Money,
    pub covered: Money,
    pub payable: Money,
    pub rules: Vec<RuleApplication>,
}

impl AdjudicationResult {
    /// Nothing left for the patient
    pub fn is_fully_covered(&self) -> bool {
        self.covered == self.grand_total
    }

    /// Provider pays some but not all
    pub fn is_partially_covered(&self) -> bool {
        self.covered.is_positive() && self.covered.amount() < self.grand_total.amount()
    }

    /// Amount recorded for a rule, if the rule was evaluated
    pub fn rule_amount(&self, rule: Rule) -> Option<Money> {
        self.rules.iter().find(|r| r.rule == rule).map(|r| r.amount)
    }
}

/// What a provider variant computes before the shared checks
#[derive(Debug)]
pub(crate) struct Split {
    pub covered: Money,
    pub payable: Money,
    /// Ceiling the covered amount must respect, if the provider has one
    pub ceiling: Option<Money>,
    pub rules: Vec<RuleApplication>,
}

/// Adjudicates finalised bills
///
/// Stateless: every call is a pure function of the bill and the profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adjudicator;

impl Adjudicator {
    pub fn new() -> Self {
        Self
    }

    /// Computes the covered and patient-payable amounts
    ///
    /// # Errors
    ///
    /// * `TierNotFound` when a government profile has no tier for the bracket
    /// * `InvalidProfile` for rates outside 0-100%, negative limits or blank
    ///   code prefixes
    /// * `InvariantViolation` if the split fails its own checks
    pub fn adjudicate(
        &self,
        bill: &Bill,
        profile: &InsuranceProfile,
    ) -> Result<AdjudicationResult, AdjudicationError> {
        let split = match profile {
            InsuranceProfile::Government(subsidy) => government::evaluate(bill, subsidy)?,
            InsuranceProfile::Private(policy) => private::evaluate(bill, policy)?,
        };

        verify(bill, &split)?;

        info!(
            bill_id = %bill.id(),
            provider = %profile.provider_name(),
            covered = %split.covered,
            payable = %split.payable,
            "bill adjudicated"
        );

        Ok(AdjudicationResult {
            bill_id: bill.id(),
            provider_kind: profile.provider_kind(),
            provider_name: profile.provider_name().to_string(),
            policy_reference: Some(profile.policy_reference().to_string()),
            grand_total: bill.grand_total(),
            covered: split.covered,
            payable: split.payable,
            rules: split.rules,
        })
    }
}

fn verify(bill: &Bill, split: &Split) -> Result<(), AdjudicationError> {
    let total = bill.grand_total();
    let violation = |reason: &str| {
        error!(
            bill_id = %bill.id(),
            covered = %split.covered,
            payable = %split.payable,
            total = %total,
            reason,
            "adjudication invariant violated"
        );
        AdjudicationError::InvariantViolation {
            reason: reason.to_string(),
            covered: split.covered.to_string(),
            payable: split.payable.to_string(),
            total: total.to_string(),
        }
    };

    if split.covered.checked_add(&split.payable)? != total {
        return Err(violation("covered plus payable differs from grand total"));
    }
    if split.covered.is_negative() || split.payable.is_negative() {
        return Err(violation("negative share"));
    }
    if split.covered.amount() > total.amount() {
        return Err(violation("covered exceeds grand total"));
    }
    if let Some(ceiling) = split.ceiling {
        if split.covered.checked_min(&ceiling)? != split.covered {
            return Err(violation("covered exceeds provider cap"));
        }
    }
    Ok(())
}
