//! Patient directory port

use async_trait::async_trait;

use core_kernel::{DomainPort, OperationMetadata, PatientId, PortError};

use crate::patient::Patient;

/// Read access to patients and their insurance profiles
#[async_trait]
pub trait PatientPort: DomainPort {
    async fn get_patient(
        &self,
        id: PatientId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Patient, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::profile::InsuranceProfile;

    /// In-memory patient directory
    #[derive(Debug, Default)]
    pub struct MockPatientPort {
        patients: Arc<RwLock<HashMap<PatientId, Patient>>>,
    }

    impl MockPatientPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with patients for testing
        pub async fn with_patients(patients: Vec<Patient>) -> Self {
            let port = Self::new();
            for patient in patients {
                port.insert(patient).await;
            }
            port
        }

        pub async fn insert(&self, patient: Patient) {
            self.patients.write().await.insert(patient.id, patient);
        }

        /// Replaces a patient's profile, as an enrolment change would
        pub async fn update_profile(
            &self,
            id: PatientId,
            profile: InsuranceProfile,
        ) -> Result<(), PortError> {
            let mut patients = self.patients.write().await;
            let patient = patients
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Patient", id))?;
            patient.insurance_profile = Some(profile);
            Ok(())
        }
    }

    impl DomainPort for MockPatientPort {}

    #[async_trait]
    impl PatientPort for MockPatientPort {
        async fn get_patient(
            &self,
            id: PatientId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Patient, PortError> {
            self.patients
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Patient", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockPatientPort;
    use super::*;
    use crate::profile::{GovernmentSubsidy, IncomeBracket};

    #[tokio::test]
    async fn test_profile_update_is_visible() {
        let patient = Patient::new(PatientId::new(), "Tan Ah Kow");
        let id = patient.id;
        let port = MockPatientPort::with_patients(vec![patient]).await;
        assert!(!port.get_patient(id, None).await.unwrap().is_insured());

        let profile = GovernmentSubsidy::new("MediShield Life", IncomeBracket::new("B1"));
        port.update_profile(id, profile.into()).await.unwrap();

        assert!(port.get_patient(id, None).await.unwrap().is_insured());
    }

    #[tokio::test]
    async fn test_unknown_patient() {
        let port = MockPatientPort::new();
        let err = port.get_patient(PatientId::new(), None).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
