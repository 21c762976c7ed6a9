//! Tests for domain_billing

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{BillId, Currency, Money, PatientId, VisitId};
use domain_catalog::{BenefitCategory, Code, CodeKind, CodeRegistry};
use domain_encounter::Encounter;

use domain_billing::{BillBuilder, BillingError};

fn code(id: &str, kind: CodeKind, price: Decimal) -> Code {
    Code::new(id, kind, format!("{id} charge"), Money::new(price, Currency::SGD)).unwrap()
}

fn registry() -> CodeRegistry {
    CodeRegistry::from_codes(
        Currency::SGD,
        vec![
            code("WARD-B2", CodeKind::Service, dec!(180.00)),
            code("CONSULT-GP", CodeKind::Service, dec!(38.50)),
            code("MED-AMOX", CodeKind::Service, dec!(0.335)),
            code("SUNDRY", CodeKind::Service, dec!(0.005)),
            code("0HB6XZZ", CodeKind::Procedure, dec!(850.00)),
        ],
    )
    .unwrap()
}

fn t(hour: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap() + Duration::hours(hour)
}

fn closed_encounter(charges: &[(&str, Decimal, i64)]) -> Encounter {
    let registry = registry();
    let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
    for (code, quantity, hour) in charges {
        encounter.add_occurrence(&registry, code, *quantity, t(*hour)).unwrap();
    }
    encounter.close();
    encounter
}

// ============================================================================
// Rounding sequence
// ============================================================================

mod rounding_tests {
    use super::*;

    #[test]
    fn test_half_cent_lines_round_individually() {
        let encounter = closed_encounter(&[
            ("SUNDRY", dec!(1), 1),
            ("SUNDRY", dec!(1), 2),
            ("SUNDRY", dec!(1), 3),
        ]);

        let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();

        for line in bill.lines() {
            assert_eq!(line.line_total.amount(), dec!(0.01));
        }
        // 0.01 + 0.01 + 0.01, not round(0.015) = 0.02
        assert_eq!(bill.grand_total().amount(), dec!(0.03));
    }

    #[test]
    fn test_line_total_rounds_half_up() {
        // 0.335 x 3 = 1.005 -> 1.01
        let encounter = closed_encounter(&[("MED-AMOX", dec!(3), 1)]);
        let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();

        let line = &bill.lines()[0];
        assert_eq!(line.unit_price.amount(), dec!(0.335));
        assert_eq!(line.line_total.amount(), dec!(1.01));
    }

    #[test]
    fn test_grand_total_matches_running_sum() {
        let encounter = closed_encounter(&[
            ("WARD-B2", dec!(3), 0),
            ("CONSULT-GP", dec!(2), 5),
            ("MED-AMOX", dec!(7), 6),
            ("0HB6XZZ", dec!(1), 30),
        ]);
        let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();

        // 540.00 + 77.00 + 2.35 (2.345) + 850.00
        assert_eq!(bill.grand_total().amount(), dec!(1469.35));
        assert_eq!(bill.running_total(bill.lines()), bill.grand_total());
    }
}

// ============================================================================
// Bill structure
// ============================================================================

mod structure_tests {
    use super::*;

    #[test]
    fn test_lines_follow_chronological_order() {
        let encounter = closed_encounter(&[
            ("0HB6XZZ", dec!(1), 20),
            ("CONSULT-GP", dec!(1), 2),
            ("WARD-B2", dec!(1), 0),
        ]);
        let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();

        let codes: Vec<&str> = bill.lines().iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["WARD-B2", "CONSULT-GP", "0HB6XZZ"]);
        let numbers: Vec<u32> = bill.lines().iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_bill_references_encounter() {
        let encounter = closed_encounter(&[("CONSULT-GP", dec!(1), 1)]);
        let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();

        assert_eq!(bill.visit_id(), encounter.visit_id());
        assert_eq!(bill.patient_id(), encounter.patient_id());
        assert_eq!(bill.currency(), Currency::SGD);
    }

    #[test]
    fn test_lines_carry_category() {
        let encounter = closed_encounter(&[("WARD-B2", dec!(2), 0), ("0HB6XZZ", dec!(1), 3)]);
        let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();

        assert_eq!(bill.lines()[0].category, BenefitCategory::Hospitalization);
        assert_eq!(bill.lines()[1].category, BenefitCategory::MinorSurgery);
        assert_eq!(
            bill.total_by_category(BenefitCategory::Hospitalization).amount(),
            dec!(360.00)
        );
    }

    #[test]
    fn test_bill_currency_must_match_prices() {
        let encounter = closed_encounter(&[("CONSULT-GP", dec!(1), 1)]);
        let result = BillBuilder::new(&encounter, Currency::USD).unwrap().build();
        assert!(matches!(result, Err(BillingError::Money(_))));
    }
}

// ============================================================================
// Idempotence
// ============================================================================

mod idempotence_tests {
    use super::*;

    #[test]
    fn test_build_twice_is_identical() {
        let encounter = closed_encounter(&[
            ("WARD-B2", dec!(4), 0),
            ("CONSULT-GP", dec!(1), 1),
            ("MED-AMOX", dec!(9), 1),
        ]);
        let builder = BillBuilder::new(&encounter, Currency::SGD).unwrap();

        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_supplied_bill_id_is_used() {
        let encounter = closed_encounter(&[("CONSULT-GP", dec!(1), 1)]);
        let id = BillId::new();
        let bill = BillBuilder::new(&encounter, Currency::SGD)
            .unwrap()
            .with_bill_id(id)
            .build()
            .unwrap();
        assert_eq!(bill.id(), id);
    }
}

// ============================================================================
// Property-based tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn charge() -> impl Strategy<Value = (&'static str, Decimal, i64)> {
        (
            prop::sample::select(vec!["WARD-B2", "CONSULT-GP", "MED-AMOX", "SUNDRY", "0HB6XZZ"]),
            (1i64..500).prop_map(|q| Decimal::new(q, 1)),
            0i64..72,
        )
    }

    proptest! {
        #[test]
        fn grand_total_is_stepwise_sum(charges in prop::collection::vec(charge(), 0..25)) {
            let encounter = closed_encounter(&charges);
            let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();

            let expected = bill.lines().iter().fold(Money::zero(Currency::SGD), |total, line| {
                total.accumulate(&line.line_total).unwrap()
            });
            prop_assert_eq!(bill.grand_total(), expected);
            prop_assert!(bill.grand_total().is_currency_precise());
        }

        #[test]
        fn build_is_idempotent(charges in prop::collection::vec(charge(), 0..25)) {
            let encounter = closed_encounter(&charges);
            let builder = BillBuilder::new(&encounter, Currency::SGD).unwrap();
            prop_assert_eq!(builder.build().unwrap(), builder.build().unwrap());
        }
    }
}
