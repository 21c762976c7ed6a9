//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for unit and integration tests. Prices are
//! in SGD and chosen so the common scenarios produce round totals.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{Currency, Money, Rate};
use domain_catalog::{BenefitCategory, Code, CodeKind, CodeRegistry};
use domain_insurance::{GovernmentSubsidy, IncomeBracket, InsuranceProfile, PrivatePolicy, SubsidyTier};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn sgd(amount: Decimal) -> Money {
        Money::new(amount, Currency::SGD)
    }

    pub fn sgd_zero() -> Money {
        Money::zero(Currency::SGD)
    }

    /// For currency mismatch tests
    pub fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }
}

/// Fixture for visit timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard admission time (1 Mar 2024, 09:00 UTC)
    pub fn admission() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    /// `days` calendar days after admission
    pub fn day(days: i64) -> DateTime<Utc> {
        Self::admission() + Duration::days(days)
    }

    /// `minutes` after admission
    pub fn minute(minutes: i64) -> DateTime<Utc> {
        Self::admission() + Duration::minutes(minutes)
    }
}

/// Fixture for the standard price list
pub struct CatalogFixtures;

impl CatalogFixtures {
    /// Ward B1, 250.00 per day
    pub const WARD: &'static str = "WARD-B1";
    /// Specialist consultation, 500.00
    pub const CONSULT: &'static str = "CONSULT-SPEC";
    /// Full blood count, 30.00
    pub const LAB: &'static str = "LAB-FBC";
    /// Paracetamol, 0.005 per tablet
    pub const MED: &'static str = "MED-PCM";
    /// Dental caries, 120.00
    pub const DENTAL: &'static str = "K02.9";
    /// Appendectomy, 3000.00
    pub const SURGERY: &'static str = "0DTJ4ZZ";

    pub fn codes() -> Vec<Code> {
        let code = |id: &str, kind, description: &str, price| {
            Code::new(id, kind, description, MoneyFixtures::sgd(price)).unwrap()
        };
        vec![
            code(Self::WARD, CodeKind::Service, "Ward B1 (per day)", dec!(250.00)),
            code(Self::CONSULT, CodeKind::Service, "Specialist consultation", dec!(500.00)),
            code(Self::LAB, CodeKind::Service, "Full blood count", dec!(30.00)),
            code(Self::MED, CodeKind::Service, "Paracetamol 500mg tablet", dec!(0.005)),
            code(Self::DENTAL, CodeKind::Diagnostic, "Dental caries", dec!(120.00)),
            code(Self::SURGERY, CodeKind::Procedure, "Laparoscopic appendectomy", dec!(3000.00))
                .with_category(BenefitCategory::MajorSurgery),
        ]
    }

    pub fn registry() -> CodeRegistry {
        CodeRegistry::from_codes(Currency::SGD, Self::codes()).unwrap()
    }
}

/// Fixture for insurance profiles
pub struct ProfileFixtures;

impl ProfileFixtures {
    /// The standard subsidy table: B1 70%, B2 50% capped at 300.00, B3 20%
    pub fn subsidy(bracket: &str) -> GovernmentSubsidy {
        GovernmentSubsidy::new("MediShield Life", IncomeBracket::new(bracket))
            .with_tier(IncomeBracket::new("B1"), SubsidyTier::new(Rate::from_percentage(dec!(70))))
            .with_tier(
                IncomeBracket::new("B2"),
                SubsidyTier::new(Rate::from_percentage(dec!(50)))
                    .capped_at(MoneyFixtures::sgd(dec!(300.00))),
            )
            .with_tier(IncomeBracket::new("B3"), SubsidyTier::new(Rate::from_percentage(dec!(20))))
    }

    pub fn government(bracket: &str) -> InsuranceProfile {
        Self::subsidy(bracket).into()
    }

    /// Private policy with a 20% co-pay, 5000.00 limit and dental excluded
    pub fn private() -> InsuranceProfile {
        Self::private_with(dec!(5000.00), dec!(20)).into()
    }

    pub fn private_with(limit: Decimal, co_pay_percent: Decimal) -> PrivatePolicy {
        PrivatePolicy::new(
            "Great Eastern",
            "GE-SHIELD-0001",
            MoneyFixtures::sgd(limit),
            Rate::from_percentage(co_pay_percent),
        )
        .excluding(BenefitCategory::Dental)
    }
}
