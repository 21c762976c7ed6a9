//! Bill builder

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use core_kernel::{BillId, Currency, Money};
use domain_encounter::Encounter;

use crate::bill::{Bill, BillLineItem};
use crate::error::BillingError;

/// Builds the bill for a closed encounter
///
/// The bill id and timestamp are fixed when the builder is created, so
/// repeated calls to [`BillBuilder::build`] return identical bills.
#[derive(Debug)]
pub struct BillBuilder<'a> {
    encounter: &'a Encounter,
    currency: Currency,
    bill_id: BillId,
    generated_at: DateTime<Utc>,
}

impl<'a> BillBuilder<'a> {
    /// Creates a builder over a closed encounter
    ///
    /// # Errors
    ///
    /// `EncounterOpen` if the visit has not been closed yet.
    pub fn new(encounter: &'a Encounter, currency: Currency) -> Result<Self, BillingError> {
        if !encounter.is_closed() {
            warn!(visit_id = %encounter.visit_id(), "bill requested for open encounter");
            return Err(BillingError::EncounterOpen(encounter.visit_id()));
        }

        Ok(Self {
            encounter,
            currency,
            bill_id: BillId::new_v7(),
            generated_at: Utc::now(),
        })
    }

    /// Uses a caller supplied bill id
    pub fn with_bill_id(mut self, bill_id: BillId) -> Self {
        self.bill_id = bill_id;
        self
    }

    /// Uses a caller supplied generation timestamp
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn bill_id(&self) -> BillId {
        self.bill_id
    }

    /// Prices every occurrence and accumulates the grand total
    ///
    /// Lines follow the chronological occurrence order. The running total is
    /// rounded half-up after each line is added.
    pub fn build(&self) -> Result<Bill, BillingError> {
        let mut lines = Vec::with_capacity(self.encounter.len());
        let mut grand_total = Money::zero(self.currency);

        for (index, occurrence) in self.encounter.occurrences().into_iter().enumerate() {
            let code = occurrence.code();
            let line_total = occurrence.raw_amount().round_half_up();
            grand_total = grand_total.accumulate(&line_total)?;

            debug!(
                bill_id = %self.bill_id,
                code = %code.id(),
                quantity = %occurrence.quantity(),
                line_total = %line_total,
                running_total = %grand_total,
                "line accumulated"
            );

            lines.push(BillLineItem {
                line_number: (index + 1) as u32,
                code: code.id().to_string(),
                description: code.description().to_string(),
                category: code.category(),
                unit_price: code.unit_price(),
                quantity: occurrence.quantity(),
                incurred_at: occurrence.incurred_at(),
                line_total,
            });
        }

        info!(
            bill_id = %self.bill_id,
            visit_id = %self.encounter.visit_id(),
            lines = lines.len(),
            grand_total = %grand_total,
            "bill built"
        );

        Ok(Bill::new(
            self.bill_id,
            self.encounter.patient_id(),
            self.encounter.visit_id(),
            self.currency,
            lines,
            grand_total,
            self.generated_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{PatientId, VisitId};

    #[test]
    fn test_open_encounter_rejected() {
        let encounter = Encounter::new(VisitId::new(), PatientId::new());
        let result = BillBuilder::new(&encounter, Currency::SGD);
        assert!(matches!(result, Err(BillingError::EncounterOpen(_))));
    }

    #[test]
    fn test_empty_encounter_bills_zero() {
        let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
        encounter.close();

        let bill = BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap();
        assert!(bill.is_empty());
        assert!(bill.grand_total().is_zero());
    }
}
