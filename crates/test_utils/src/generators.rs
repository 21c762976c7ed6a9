//! Property-Based Test Generators
//!
//! Proptest strategies that only produce inputs the domain accepts: charges
//! against the standard registry and profiles with rates inside 0-100%.

use core_kernel::{Currency, Money, Rate};
use domain_catalog::BenefitCategory;
use domain_insurance::{GovernmentSubsidy, IncomeBracket, InsuranceProfile, PrivatePolicy, SubsidyTier};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::CatalogFixtures;

/// Strategy for SGD amounts from 0.00 up to 100,000.00
pub fn sgd_money_strategy() -> impl Strategy<Value = Money> {
    (0i64..10_000_000i64).prop_map(|minor| Money::from_minor(minor, Currency::SGD))
}

/// Strategy for rates in whole percent, 0% to 100%
pub fn rate_strategy() -> impl Strategy<Value = Rate> {
    (0i64..=100).prop_map(|pct| Rate::from_percentage(Decimal::from(pct)))
}

/// Strategy for quantities from 0.01 to 1000.00
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|q| Decimal::new(q, 2))
}

/// Strategy for a list of charges against the standard registry
///
/// Ward codes are excluded; stays go through the day-count path instead.
pub fn charges_strategy(max_len: usize) -> impl Strategy<Value = Vec<(&'static str, Decimal)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec![
                CatalogFixtures::CONSULT,
                CatalogFixtures::LAB,
                CatalogFixtures::MED,
                CatalogFixtures::DENTAL,
                CatalogFixtures::SURGERY,
            ]),
            quantity_strategy(),
        ),
        0..max_len,
    )
}

/// Strategy for government profiles whose bracket always has a tier
pub fn government_profile_strategy() -> impl Strategy<Value = InsuranceProfile> {
    (rate_strategy(), prop::option::of(sgd_money_strategy())).prop_map(|(rate, cap)| {
        let mut tier = SubsidyTier::new(rate);
        if let Some(cap) = cap {
            tier = tier.capped_at(cap);
        }
        GovernmentSubsidy::new("MediShield Life", IncomeBracket::new("B1"))
            .with_tier(IncomeBracket::new("B1"), tier)
            .into()
    })
}

/// Strategy for private profiles with an arbitrary exclusion set
pub fn private_profile_strategy() -> impl Strategy<Value = InsuranceProfile> {
    (
        sgd_money_strategy(),
        rate_strategy(),
        prop::collection::vec(
            prop::sample::select(vec![
                BenefitCategory::Dental,
                BenefitCategory::MajorSurgery,
                BenefitCategory::Medication,
                BenefitCategory::Laboratory,
            ]),
            0..3,
        ),
    )
        .prop_map(|(limit, co_pay, excluded)| {
            let policy = excluded.into_iter().fold(
                PrivatePolicy::new("Great Eastern", "GE-PROP", limit, co_pay),
                |policy, category| policy.excluding(category),
            );
            policy.into()
        })
}

/// Strategy for any valid profile
pub fn profile_strategy() -> impl Strategy<Value = InsuranceProfile> {
    prop_oneof![government_profile_strategy(), private_profile_strategy()]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_rates_are_fractions(rate in rate_strategy()) {
            prop_assert!(rate.is_fraction());
        }

        #[test]
        fn generated_money_is_precise(money in sgd_money_strategy()) {
            prop_assert!(money.is_currency_precise());
            prop_assert!(!money.is_negative());
        }
    }
}
