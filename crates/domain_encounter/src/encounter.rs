//! The encounter aggregate

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use core_kernel::{PatientId, VisitId};
use domain_catalog::{Code, CodeRegistry};

use crate::error::EncounterError;
use crate::occurrence::ChargeableOccurrence;
use crate::visit::Visit;

/// Whether the encounter still accepts charges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterStatus {
    Open,
    Closed,
}

/// Billable events of one patient visit
///
/// Mutation goes through `&mut self`, so one owner appends at a time.
/// Failed additions leave the encounter untouched.
#[derive(Debug, Clone)]
pub struct Encounter {
    visit_id: VisitId,
    patient_id: PatientId,
    status: EncounterStatus,
    occurrences: Vec<ChargeableOccurrence>,
    next_sequence: u64,
}

impl Encounter {
    /// Opens an empty encounter for a visit
    pub fn new(visit_id: VisitId, patient_id: PatientId) -> Self {
        Self {
            visit_id,
            patient_id,
            status: EncounterStatus::Open,
            occurrences: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Replays a visit record against the registry
    ///
    /// Ward stays are added before individual charges; chronological order
    /// is restored by [`Encounter::occurrences`]. The encounter is closed if
    /// the visit is.
    pub fn from_visit(visit: &Visit, registry: &CodeRegistry) -> Result<Self, EncounterError> {
        let mut encounter = Self::new(visit.id, visit.patient_id);

        for stay in &visit.ward_stays {
            encounter.add_ward_stay(registry, &stay.ward_code, stay.admitted_at, stay.discharged_at)?;
        }
        for record in &visit.occurrences {
            encounter.add_occurrence(registry, &record.code, record.quantity, record.incurred_at)?;
        }
        if visit.closed {
            encounter.close();
        }

        Ok(encounter)
    }

    pub fn visit_id(&self) -> VisitId {
        self.visit_id
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == EncounterStatus::Closed
    }

    /// Records a charge for `quantity` units of `code_id`
    ///
    /// # Errors
    ///
    /// * `EncounterClosed` once the visit has been closed
    /// * `InvalidQuantity` if `quantity` is zero or negative
    /// * `UnknownCode` if the registry has no such code
    pub fn add_occurrence(
        &mut self,
        registry: &CodeRegistry,
        code_id: &str,
        quantity: Decimal,
        incurred_at: DateTime<Utc>,
    ) -> Result<&ChargeableOccurrence, EncounterError> {
        self.ensure_open()?;
        if quantity <= Decimal::ZERO {
            warn!(visit_id = %self.visit_id, code = %code_id, %quantity, "rejected non-positive quantity");
            return Err(EncounterError::InvalidQuantity {
                code: code_id.to_string(),
                quantity: quantity.to_string(),
            });
        }
        let code = registry.lookup(code_id)?;

        Ok(self.push(code, quantity, incurred_at))
    }

    /// Records a ward stay as one occurrence billed per calendar day
    ///
    /// The day count is the number of date boundaries between admission and
    /// discharge, with a minimum of one day for same-day stays.
    pub fn add_ward_stay(
        &mut self,
        registry: &CodeRegistry,
        ward_code: &str,
        admitted_at: DateTime<Utc>,
        discharged_at: DateTime<Utc>,
    ) -> Result<&ChargeableOccurrence, EncounterError> {
        self.ensure_open()?;
        if discharged_at < admitted_at {
            warn!(visit_id = %self.visit_id, code = %ward_code, "discharge precedes admission");
            return Err(EncounterError::InvalidStay {
                code: ward_code.to_string(),
                admitted_at: admitted_at.to_rfc3339(),
                discharged_at: discharged_at.to_rfc3339(),
            });
        }
        let code = registry.lookup(ward_code)?;
        let days = (discharged_at.date_naive() - admitted_at.date_naive())
            .num_days()
            .max(1);

        Ok(self.push(code, Decimal::from(days), admitted_at))
    }

    /// Closes the encounter; closing twice is a no-op
    pub fn close(&mut self) {
        if self.status == EncounterStatus::Open {
            self.status = EncounterStatus::Closed;
            info!(
                visit_id = %self.visit_id,
                occurrences = self.occurrences.len(),
                "encounter closed"
            );
        }
    }

    /// Occurrences in chronological order, ties kept in insertion order
    pub fn occurrences(&self) -> Vec<&ChargeableOccurrence> {
        let mut ordered: Vec<_> = self.occurrences.iter().collect();
        ordered.sort_by_key(|o| o.incurred_at());
        ordered
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    fn ensure_open(&self) -> Result<(), EncounterError> {
        if self.is_closed() {
            warn!(visit_id = %self.visit_id, "charge added to closed encounter");
            return Err(EncounterError::EncounterClosed(self.visit_id));
        }
        Ok(())
    }

    fn push(&mut self, code: Arc<Code>, quantity: Decimal, incurred_at: DateTime<Utc>) -> &ChargeableOccurrence {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        debug!(
            visit_id = %self.visit_id,
            code = %code.id(),
            %quantity,
            sequence,
            "occurrence added"
        );
        self.occurrences
            .push(ChargeableOccurrence::new(code, quantity, incurred_at, sequence));
        &self.occurrences[self.occurrences.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_kernel::{Currency, Money};
    use domain_catalog::CodeKind;
    use rust_decimal_macros::dec;

    fn registry() -> CodeRegistry {
        let codes = vec![
            Code::new("WARD-B1", CodeKind::Service, "Ward B1", Money::new(dec!(250), Currency::SGD)).unwrap(),
            Code::new("CONSULT-GP", CodeKind::Service, "GP", Money::new(dec!(40), Currency::SGD)).unwrap(),
        ];
        CodeRegistry::from_codes(Currency::SGD, codes).unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_zero_quantity_rejected_without_mutation() {
        let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
        let err = encounter
            .add_occurrence(&registry(), "CONSULT-GP", Decimal::ZERO, at(9))
            .unwrap_err();

        assert!(matches!(err, EncounterError::InvalidQuantity { .. }));
        assert!(encounter.is_empty());
    }

    #[test]
    fn test_unknown_code_surfaces_as_unknown_code() {
        let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
        let err = encounter
            .add_occurrence(&registry(), "XRAY", dec!(1), at(9))
            .unwrap_err();
        assert!(matches!(err, EncounterError::UnknownCode(code) if code == "XRAY"));
    }

    #[test]
    fn test_same_day_ward_stay_bills_one_day() {
        let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
        let stay = encounter
            .add_ward_stay(&registry(), "WARD-B1", at(8), at(20))
            .unwrap();
        assert_eq!(stay.quantity(), dec!(1));
    }

    #[test]
    fn test_ward_stay_counts_calendar_days() {
        let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
        let stay = encounter
            .add_ward_stay(&registry(), "WARD-B1", at(23), at(1) + Duration::days(3))
            .unwrap();
        assert_eq!(stay.quantity(), dec!(3));
        assert_eq!(stay.incurred_at(), at(23));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut encounter = Encounter::new(VisitId::new(), PatientId::new());
        encounter.close();
        encounter.close();
        assert_eq!(encounter.status(), EncounterStatus::Closed);
    }
}
