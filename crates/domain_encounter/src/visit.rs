//! Visit records as supplied by visit management
//!
//! A [`Visit`] is the raw shape handed over by the external collaborator:
//! unresolved code references plus a closed flag. [`crate::Encounter::from_visit`]
//! turns it into a validated encounter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{PatientId, VisitId};

/// A recorded charge, not yet resolved against the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    pub code: String,
    pub quantity: Decimal,
    pub incurred_at: DateTime<Utc>,
}

/// A ward occupancy period, billed per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardStayRecord {
    pub ward_code: String,
    pub admitted_at: DateTime<Utc>,
    pub discharged_at: DateTime<Utc>,
}

/// One patient visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: VisitId,
    pub patient_id: PatientId,
    #[serde(default)]
    pub ward_stays: Vec<WardStayRecord>,
    #[serde(default)]
    pub occurrences: Vec<OccurrenceRecord>,
    pub closed: bool,
}

impl Visit {
    /// Creates an open visit with no recorded charges
    pub fn new(id: VisitId, patient_id: PatientId) -> Self {
        Self {
            id,
            patient_id,
            ward_stays: Vec::new(),
            occurrences: Vec::new(),
            closed: false,
        }
    }

    pub fn with_occurrence(
        mut self,
        code: impl Into<String>,
        quantity: Decimal,
        incurred_at: DateTime<Utc>,
    ) -> Self {
        self.occurrences.push(OccurrenceRecord {
            code: code.into(),
            quantity,
            incurred_at,
        });
        self
    }

    pub fn with_ward_stay(
        mut self,
        ward_code: impl Into<String>,
        admitted_at: DateTime<Utc>,
        discharged_at: DateTime<Utc>,
    ) -> Self {
        self.ward_stays.push(WardStayRecord {
            ward_code: ward_code.into(),
            admitted_at,
            discharged_at,
        });
        self
    }

    /// Marks the visit as closed by visit management
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }
}
