//! Bills and bill line items

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{BillId, Currency, Money, PatientId, VisitId};
use domain_catalog::BenefitCategory;

/// One priced line on a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillLineItem {
    /// Position on the bill, starting at 1
    pub line_number: u32,
    pub code: String,
    pub description: String,
    pub category: BenefitCategory,
    pub unit_price: Money,
    pub quantity: Decimal,
    pub incurred_at: DateTime<Utc>,
    /// Unit price times quantity, rounded half-up
    pub line_total: Money,
}

/// A finalised bill for one visit
///
/// Only [`crate::BillBuilder`] creates bills and nothing mutates one
/// afterwards, so the grand total always matches the lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bill {
    id: BillId,
    patient_id: PatientId,
    visit_id: VisitId,
    currency: Currency,
    lines: Vec<BillLineItem>,
    grand_total: Money,
    generated_at: DateTime<Utc>,
}

impl Bill {
    pub(crate) fn new(
        id: BillId,
        patient_id: PatientId,
        visit_id: VisitId,
        currency: Currency,
        lines: Vec<BillLineItem>,
        grand_total: Money,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            patient_id,
            visit_id,
            currency,
            lines,
            grand_total,
            generated_at,
        }
    }

    pub fn id(&self) -> BillId {
        self.id
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn visit_id(&self) -> VisitId {
        self.visit_id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Line items in chronological order
    pub fn lines(&self) -> &[BillLineItem] {
        &self.lines
    }

    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Subtotal of one benefit category, accumulated like the grand total
    pub fn total_by_category(&self, category: BenefitCategory) -> Money {
        self.running_total(self.lines.iter().filter(|line| line.category == category))
    }

    /// Subtotals for every category present on the bill
    pub fn category_totals(&self) -> BTreeMap<BenefitCategory, Money> {
        let mut totals = BTreeMap::new();
        for line in &self.lines {
            let entry = totals
                .entry(line.category)
                .or_insert_with(|| Money::zero(self.currency));
            *entry = Self::step(*entry, line.line_total);
        }
        totals
    }

    /// Half-up running sum of the given lines, in bill order
    pub fn running_total<'a>(&self, lines: impl IntoIterator<Item = &'a BillLineItem>) -> Money {
        lines
            .into_iter()
            .fold(Money::zero(self.currency), |total, line| Self::step(total, line.line_total))
    }

    // Lines share the bill currency, checked when the bill was built
    fn step(total: Money, amount: Money) -> Money {
        Money::new(total.amount() + amount.amount(), total.currency()).round_half_up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn line(n: u32, category: BenefitCategory, total: Decimal) -> BillLineItem {
        BillLineItem {
            line_number: n,
            code: format!("C{n}"),
            description: String::new(),
            category,
            unit_price: Money::new(total, Currency::SGD),
            quantity: Decimal::ONE,
            incurred_at: Utc.with_ymd_and_hms(2024, 1, 1, n, 0, 0).unwrap(),
            line_total: Money::new(total, Currency::SGD),
        }
    }

    fn bill(lines: Vec<BillLineItem>) -> Bill {
        let total = lines
            .iter()
            .fold(Money::zero(Currency::SGD), |t, l| t.accumulate(&l.line_total).unwrap());
        Bill::new(
            BillId::new(),
            PatientId::new(),
            VisitId::new(),
            Currency::SGD,
            lines,
            total,
            Utc::now(),
        )
    }

    #[test]
    fn test_category_totals() {
        let bill = bill(vec![
            line(1, BenefitCategory::Hospitalization, dec!(900.00)),
            line(2, BenefitCategory::Laboratory, dec!(28.50)),
            line(3, BenefitCategory::Hospitalization, dec!(450.00)),
        ]);

        let totals = bill.category_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&BenefitCategory::Hospitalization].amount(), dec!(1350.00));
        assert_eq!(bill.total_by_category(BenefitCategory::Laboratory).amount(), dec!(28.50));
        assert!(bill.total_by_category(BenefitCategory::Dental).is_zero());
    }

    #[test]
    fn test_category_totals_sum_to_grand_total() {
        let bill = bill(vec![
            line(1, BenefitCategory::Consultation, dec!(40.00)),
            line(2, BenefitCategory::Medication, dec!(12.35)),
        ]);

        let sum = bill
            .category_totals()
            .values()
            .fold(Money::zero(Currency::SGD), |t, m| t.accumulate(m).unwrap());
        assert_eq!(sum, bill.grand_total());
        assert_eq!(bill.line_count(), 2);
    }
}
