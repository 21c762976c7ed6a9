//! Chargeable occurrences

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use core_kernel::Money;
use domain_catalog::Code;

/// One billable event: a resolved code, how much of it, and when
///
/// The sequence number records insertion order and breaks ties between
/// occurrences with the same timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeableOccurrence {
    code: Arc<Code>,
    quantity: Decimal,
    incurred_at: DateTime<Utc>,
    sequence: u64,
}

impl ChargeableOccurrence {
    pub(crate) fn new(code: Arc<Code>, quantity: Decimal, incurred_at: DateTime<Utc>, sequence: u64) -> Self {
        Self {
            code,
            quantity,
            incurred_at,
            sequence,
        }
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn incurred_at(&self) -> DateTime<Utc> {
        self.incurred_at
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Unit price times quantity, before any rounding
    pub fn raw_amount(&self) -> Money {
        self.code.unit_price().multiply(self.quantity)
    }
}
