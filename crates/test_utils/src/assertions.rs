//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than plain `assert_eq!`.

use core_kernel::Money;
use domain_billing::Bill;
use domain_insurance::AdjudicationResult;

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics if the sum doesn't equal the total or the currencies differ
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts.iter().fold(Money::zero(total.currency()), |acc, m| {
        acc.checked_add(m).expect("Currency mismatch in sum")
    });

    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

/// Asserts that a Money value has no digits beyond its currency's precision
pub fn assert_currency_precise(money: &Money) {
    assert!(
        money.is_currency_precise(),
        "{} has more than {} decimal places",
        money,
        money.currency().decimal_places()
    );
}

/// Asserts that an adjudication split the bill without losing or inventing money
///
/// Checks `covered + payable == grand total`, that neither side is negative
/// and that both are rounded to currency precision.
pub fn assert_no_leakage(result: &AdjudicationResult, bill: &Bill) {
    assert_eq!(result.bill_id, bill.id(), "Result is for another bill");
    assert_eq!(
        result.grand_total,
        bill.grand_total(),
        "Result total {} differs from bill total {}",
        result.grand_total,
        bill.grand_total()
    );
    assert_money_sum_equals(&[result.covered, result.payable], &bill.grand_total());
    assert!(!result.covered.is_negative(), "Negative covered amount {}", result.covered);
    assert!(!result.payable.is_negative(), "Negative payable amount {}", result.payable);
    assert_currency_precise(&result.covered);
    assert_currency_precise(&result.payable);
}
