//! Test Data Builders
//!
//! Builders for visits and patients with sensible defaults, so tests only
//! spell out the charges they care about.

use chrono::{DateTime, Utc};
use core_kernel::{Currency, PatientId, VisitId};
use domain_billing::{Bill, BillBuilder};
use domain_catalog::CodeRegistry;
use domain_encounter::{Encounter, Visit};
use domain_insurance::{InsuranceProfile, Patient};
use rust_decimal::Decimal;

use crate::fixtures::{CatalogFixtures, TemporalFixtures};

/// Builder for a visit and the patient it belongs to
pub struct TestVisitBuilder {
    visit: Visit,
    patient: Patient,
    next_minute: i64,
}

impl Default for TestVisitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestVisitBuilder {
    /// Creates an open, empty visit for an uninsured patient
    pub fn new() -> Self {
        let patient = Patient::new(PatientId::new(), "Tan Wei Ming");
        Self {
            visit: Visit::new(VisitId::new(), patient.id),
            patient,
            next_minute: 0,
        }
    }

    pub fn with_patient_name(mut self, name: impl Into<String>) -> Self {
        self.patient.name = name.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<InsuranceProfile>) -> Self {
        self.patient.insurance_profile = Some(profile.into());
        self
    }

    /// Adds a charge one minute after the previous one
    pub fn charge(mut self, code: &str, quantity: Decimal) -> Self {
        let at = TemporalFixtures::minute(self.next_minute);
        self.next_minute += 1;
        self.charge_at(code, quantity, at)
    }

    pub fn charge_at(mut self, code: &str, quantity: Decimal, at: DateTime<Utc>) -> Self {
        self.visit = self.visit.with_occurrence(code, quantity, at);
        self
    }

    /// Adds a stay in the standard ward spanning `days` calendar days
    pub fn ward_days(mut self, days: i64) -> Self {
        self.visit = self.visit.with_ward_stay(
            CatalogFixtures::WARD,
            TemporalFixtures::admission(),
            TemporalFixtures::day(days),
        );
        self
    }

    pub fn closed(mut self) -> Self {
        self.visit.closed = true;
        self
    }

    pub fn visit_id(&self) -> VisitId {
        self.visit.id
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient.id
    }

    pub fn build(self) -> (Visit, Patient) {
        (self.visit, self.patient)
    }

    /// Builds the bill for this visit against `registry`, closing it first
    ///
    /// # Panics
    ///
    /// Panics if a charge does not resolve against the registry.
    pub fn bill_with(self, registry: &CodeRegistry) -> Bill {
        let visit = self.closed().visit;
        let encounter = Encounter::from_visit(&visit, registry).unwrap();
        BillBuilder::new(&encounter, Currency::SGD).unwrap().build().unwrap()
    }

    /// Builds the bill against the standard registry
    pub fn bill(self) -> Bill {
        self.bill_with(&CatalogFixtures::registry())
    }
}
