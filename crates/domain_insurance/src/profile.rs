//! Insurance profiles
//!
//! A profile is owned by the patient and only borrowed during adjudication.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use core_kernel::{Money, Rate};
use domain_catalog::BenefitCategory;

/// Which family of provider a profile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    Government,
    Private,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Government => f.write_str("government"),
            ProviderKind::Private => f.write_str("private"),
        }
    }
}

/// Key into a subsidy tier table
///
/// Matched exactly: `"B1"` and `"b1"` are different brackets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncomeBracket(String);

impl IncomeBracket {
    pub fn new(bracket: impl Into<String>) -> Self {
        Self(bracket.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coverage for one income bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidyTier {
    /// Share of the bill the scheme pays
    pub coverage_rate: Rate,
    /// Absolute ceiling on the covered amount, if any
    #[serde(default)]
    pub cap: Option<Money>,
}

impl SubsidyTier {
    pub fn new(coverage_rate: Rate) -> Self {
        Self {
            coverage_rate,
            cap: None,
        }
    }

    pub fn capped_at(mut self, cap: Money) -> Self {
        self.cap = Some(cap);
        self
    }
}

/// Means-tested government scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernmentSubsidy {
    /// Scheme name, e.g. "MediShield Life"
    pub scheme: String,
    /// The patient's bracket
    pub income_bracket: IncomeBracket,
    /// Bracket to tier table
    pub tiers: BTreeMap<IncomeBracket, SubsidyTier>,
}

impl GovernmentSubsidy {
    pub fn new(scheme: impl Into<String>, income_bracket: IncomeBracket) -> Self {
        Self {
            scheme: scheme.into(),
            income_bracket,
            tiers: BTreeMap::new(),
        }
    }

    pub fn with_tier(mut self, bracket: IncomeBracket, tier: SubsidyTier) -> Self {
        self.tiers.insert(bracket, tier);
        self
    }

    /// The tier for the patient's bracket, if the table has one
    pub fn applicable_tier(&self) -> Option<&SubsidyTier> {
        self.tiers.get(&self.income_bracket)
    }
}

/// Private insurer policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivatePolicy {
    pub insurer: String,
    pub policy_number: String,
    /// Most the insurer pays for one bill
    pub coverage_limit: Money,
    /// Share of eligible charges the patient bears
    pub co_pay: Rate,
    /// Categories the policy never covers
    #[serde(default)]
    pub excluded_categories: BTreeSet<BenefitCategory>,
    /// Diagnosis or procedure code prefixes the policy never covers,
    /// matched without regard to case
    #[serde(default)]
    pub excluded_code_prefixes: BTreeSet<String>,
}

impl PrivatePolicy {
    pub fn new(
        insurer: impl Into<String>,
        policy_number: impl Into<String>,
        coverage_limit: Money,
        co_pay: Rate,
    ) -> Self {
        Self {
            insurer: insurer.into(),
            policy_number: policy_number.into(),
            coverage_limit,
            co_pay,
            excluded_categories: BTreeSet::new(),
            excluded_code_prefixes: BTreeSet::new(),
        }
    }

    pub fn excluding(mut self, category: BenefitCategory) -> Self {
        self.excluded_categories.insert(category);
        self
    }

    /// Excludes every code starting with `prefix`, e.g. `"Z41.1"` or `"0BH"`
    pub fn excluding_codes(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_code_prefixes.insert(prefix.into().to_uppercase());
        self
    }

    pub fn excludes(&self, category: BenefitCategory) -> bool {
        self.excluded_categories.contains(&category)
    }

    pub fn excludes_code(&self, code: &str) -> bool {
        let code = code.to_uppercase();
        self.excluded_code_prefixes
            .iter()
            .any(|prefix| code.starts_with(&prefix.to_uppercase()))
    }
}

/// A patient's insurance arrangement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum InsuranceProfile {
    Government(GovernmentSubsidy),
    Private(PrivatePolicy),
}

impl InsuranceProfile {
    pub fn provider_kind(&self) -> ProviderKind {
        match self {
            InsuranceProfile::Government(_) => ProviderKind::Government,
            InsuranceProfile::Private(_) => ProviderKind::Private,
        }
    }

    /// Scheme name for government profiles, insurer name for private ones
    pub fn provider_name(&self) -> &str {
        match self {
            InsuranceProfile::Government(subsidy) => &subsidy.scheme,
            InsuranceProfile::Private(policy) => &policy.insurer,
        }
    }

    /// Scheme name for government profiles, policy number for private ones
    pub fn policy_reference(&self) -> &str {
        match self {
            InsuranceProfile::Government(subsidy) => &subsidy.scheme,
            InsuranceProfile::Private(policy) => &policy.policy_number,
        }
    }
}

impl From<GovernmentSubsidy> for InsuranceProfile {
    fn from(subsidy: GovernmentSubsidy) -> Self {
        InsuranceProfile::Government(subsidy)
    }
}

impl From<PrivatePolicy> for InsuranceProfile {
    fn from(policy: PrivatePolicy) -> Self {
        InsuranceProfile::Private(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bracket_match_is_exact() {
        let subsidy = GovernmentSubsidy::new("MediShield Life", IncomeBracket::new("b1"))
            .with_tier(IncomeBracket::new("B1"), SubsidyTier::new(Rate::from_percentage(dec!(50))));
        assert!(subsidy.applicable_tier().is_none());
    }

    #[test]
    fn test_provider_metadata() {
        let profile: InsuranceProfile = PrivatePolicy::new(
            "Great Eastern",
            "GE-0001",
            Money::new(dec!(5000), Currency::SGD),
            Rate::from_percentage(dec!(10)),
        )
        .into();

        assert_eq!(profile.provider_kind(), ProviderKind::Private);
        assert_eq!(profile.provider_name(), "Great Eastern");
    }

    #[test]
    fn test_profile_json_is_tagged() {
        let json = r#"{
            "provider": "government",
            "scheme": "MediShield Life",
            "income_bracket": "B2",
            "tiers": {
                "B2": {"coverage_rate": {"value": "0.5"}, "cap": {"amount": "300.00", "currency": "SGD"}}
            }
        }"#;

        let profile: InsuranceProfile = serde_json::from_str(json).unwrap();
        let InsuranceProfile::Government(subsidy) = profile else {
            panic!("expected government profile");
        };
        let tier = subsidy.applicable_tier().unwrap();
        assert_eq!(tier.coverage_rate.as_decimal(), dec!(0.5));
        assert_eq!(tier.cap, Some(Money::new(dec!(300.00), Currency::SGD)));
    }
}
