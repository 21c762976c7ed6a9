//! Money types with precise decimal arithmetic
//!
//! Amounts are exact `rust_decimal` values. Nothing rounds implicitly: the
//! billing and adjudication code decides where rounding happens and calls
//! [`Money::round_half_up`] (or [`Money::accumulate`]) at those points, so a
//! sequence of charges always rounds the same way.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    SGD,
    USD,
    EUR,
    GBP,
    JPY,
    MYR,
    INR,
    AUD,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::SGD => "S$",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::MYR => "RM",
            Currency::INR => "₹",
            Currency::AUD => "A$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::SGD => "SGD",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::MYR => "MYR",
            Currency::INR => "INR",
            Currency::AUD => "AUD",
        }
    }

    /// Parses an ISO 4217 code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "SGD" => Some(Currency::SGD),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "MYR" => Some(Currency::MYR),
            "INR" => Some(Currency::INR),
            "AUD" => Some(Currency::AUD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value holding the exact amount
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor_units, currency.decimal_places()), currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds to the currency's decimal places, ties away from zero
    ///
    /// This is the only rounding rule used for charges and coverage:
    /// 0.005 becomes 0.01 and 2.345 becomes 2.35.
    pub fn round_half_up(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency: self.currency,
        }
    }

    /// Returns true if the amount carries no digits beyond currency precision
    pub fn is_currency_precise(&self) -> bool {
        self.round_half_up().amount == self.amount
    }

    /// Checked addition that returns an error on currency mismatch
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(Self::new(self.amount + other.amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(Self::new(self.amount - other.amount, self.currency))
    }

    /// Adds `other` and rounds the running total half-up
    ///
    /// Totals are built by folding this over their parts in order, which
    /// fixes the rounding sequence rather than rounding once at the end.
    pub fn accumulate(&self, other: &Money) -> Result<Money, MoneyError> {
        Ok(self.checked_add(other)?.round_half_up())
    }

    /// Returns the smaller of two amounts in the same currency
    pub fn checked_min(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(if self.amount <= other.amount { *self } else { *other })
    }

    /// Multiplies by a scalar without rounding
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.amount * factor, self.currency)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

/// A percentage rate such as a subsidy tier or co-pay share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.20 for 20%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 5.0 for 5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// True when the rate lies within 0% to 100% inclusive
    pub fn is_fraction(&self) -> bool {
        self.value >= Decimal::ZERO && self.value <= Decimal::ONE
    }

    /// Applies this rate to a money amount, rounding the result half-up
    pub fn apply(&self, money: &Money) -> Money {
        money.multiply(self.value).round_half_up()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::SGD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::SGD);
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050, Currency::SGD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_round_half_up_breaks_ties_upward() {
        assert_eq!(Money::new(dec!(0.005), Currency::SGD).round_half_up().amount(), dec!(0.01));
        assert_eq!(Money::new(dec!(2.345), Currency::SGD).round_half_up().amount(), dec!(2.35));
        assert_eq!(Money::new(dec!(2.344), Currency::SGD).round_half_up().amount(), dec!(2.34));
        assert_eq!(Money::new(dec!(10.5), Currency::JPY).round_half_up().amount(), dec!(11));
    }

    #[test]
    fn test_accumulate_rounds_every_step() {
        let half_cent = Money::new(dec!(0.005), Currency::SGD);
        let total = Money::zero(Currency::SGD)
            .accumulate(&half_cent)
            .and_then(|t| t.accumulate(&half_cent))
            .unwrap();
        // 0.005 -> 0.01, then 0.015 -> 0.02
        assert_eq!(total.amount(), dec!(0.02));
    }

    #[test]
    fn test_currency_mismatch() {
        let sgd = Money::new(dec!(100.00), Currency::SGD);
        let eur = Money::new(dec!(100.00), Currency::EUR);

        let result = sgd.checked_add(&eur);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
        assert!(sgd.checked_min(&eur).is_err());
    }

    #[test]
    fn test_checked_min() {
        let a = Money::new(dec!(640.00), Currency::SGD);
        let b = Money::new(dec!(500.00), Currency::SGD);
        assert_eq!(a.checked_min(&b).unwrap(), b);
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percentage(dec!(20));
        let amount = Money::new(dec!(800.00), Currency::SGD);

        assert_eq!(rate.apply(&amount).amount(), dec!(160.00));
        assert!(rate.is_fraction());
        assert!(!Rate::from_percentage(dec!(120)).is_fraction());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("sgd"), Some(Currency::SGD));
        assert_eq!(Currency::from_code("XXX"), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rounded_amounts_are_currency_precise(
            mantissa in -1_000_000_000i64..1_000_000_000i64,
            scale in 0u32..6u32
        ) {
            let money = Money::new(Decimal::new(mantissa, scale), Currency::SGD);
            prop_assert!(money.round_half_up().is_currency_precise());
        }

        #[test]
        fn money_arithmetic_is_associative(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64,
            c in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a, Currency::SGD);
            let mb = Money::from_minor(b, Currency::SGD);
            let mc = Money::from_minor(c, Currency::SGD);

            let left = ma.checked_add(&mb).and_then(|s| s.checked_add(&mc)).unwrap();
            let right = mb.checked_add(&mc).and_then(|s| ma.checked_add(&s)).unwrap();
            prop_assert_eq!(left, right);
        }
    }
}
