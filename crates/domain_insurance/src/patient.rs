//! Patients as seen by adjudication

use serde::{Deserialize, Serialize};

use core_kernel::PatientId;

use crate::profile::InsuranceProfile;

/// A patient and the insurance arrangement they hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    /// Absent for self-paying patients
    #[serde(default)]
    pub insurance_profile: Option<InsuranceProfile>,
}

impl Patient {
    pub fn new(id: PatientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            insurance_profile: None,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<InsuranceProfile>) -> Self {
        self.insurance_profile = Some(profile.into());
        self
    }

    pub fn is_insured(&self) -> bool {
        self.insurance_profile.is_some()
    }
}
