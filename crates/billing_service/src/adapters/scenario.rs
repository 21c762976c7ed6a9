//! Scenario file adapter

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{Currency, DomainPort, OperationMetadata, PatientId, PortError, VisitId};
use domain_catalog::{CatalogEntry, Code, CodeCatalogPort};
use domain_encounter::{Visit, VisitPort};
use domain_insurance::{Patient, PatientPort};

/// On-disk shape of a scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

/// A loaded scenario acting as catalog, patient directory and visit source
#[derive(Debug)]
pub struct ScenarioFile {
    currency: Currency,
    catalog: Vec<CatalogEntry>,
    patients: HashMap<PatientId, Patient>,
    visits: HashMap<VisitId, Visit>,
    /// Visit ids in file order
    visit_order: Vec<VisitId>,
}

impl ScenarioFile {
    /// Reads and parses a scenario file
    pub async fn load(path: impl AsRef<Path>, currency: Currency) -> Result<Self, PortError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PortError::io(format!("cannot read scenario {}", path.display()), e))?;
        let scenario = Self::from_json(&json, currency)?;
        info!(
            path = %path.display(),
            codes = scenario.catalog.len(),
            patients = scenario.patients.len(),
            visits = scenario.visits.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    pub fn from_json(json: &str, currency: Currency) -> Result<Self, PortError> {
        let scenario: Scenario = serde_json::from_str(json)
            .map_err(|e| PortError::transformation(format!("invalid scenario: {}", e)))?;
        Self::from_scenario(scenario, currency)
    }

    /// Indexes a scenario; repeated patient or visit ids are rejected
    pub fn from_scenario(scenario: Scenario, currency: Currency) -> Result<Self, PortError> {
        let mut patients = HashMap::new();
        for patient in scenario.patients {
            let id = patient.id;
            if patients.insert(id, patient).is_some() {
                return Err(PortError::validation_field(format!("duplicate patient {}", id), "patients"));
            }
        }

        let mut visits = HashMap::new();
        let mut visit_order = Vec::new();
        for visit in scenario.visits {
            let id = visit.id;
            if visits.insert(id, visit).is_some() {
                return Err(PortError::validation_field(format!("duplicate visit {}", id), "visits"));
            }
            visit_order.push(id);
        }

        Ok(Self {
            currency,
            catalog: scenario.catalog,
            patients,
            visits,
            visit_order,
        })
    }

    /// Visits in the order they appear in the file
    pub fn visit_ids(&self) -> &[VisitId] {
        &self.visit_order
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl DomainPort for ScenarioFile {}

#[async_trait]
impl CodeCatalogPort for ScenarioFile {
    async fn load_codes(&self, _metadata: Option<OperationMetadata>) -> Result<Vec<Code>, PortError> {
        self.catalog
            .iter()
            .cloned()
            .map(|entry| {
                let id = entry.code.clone();
                entry
                    .into_code(self.currency)
                    .map_err(|e| PortError::validation_field(e.to_string(), id))
            })
            .collect()
    }
}

#[async_trait]
impl PatientPort for ScenarioFile {
    async fn get_patient(
        &self,
        id: PatientId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Patient, PortError> {
        debug!(patient_id = %id, "patient lookup");
        self.patients
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Patient", id))
    }
}

#[async_trait]
impl VisitPort for ScenarioFile {
    async fn get_visit(
        &self,
        id: VisitId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Visit, PortError> {
        debug!(visit_id = %id, "visit lookup");
        self.visits
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Visit", id))
    }
}
