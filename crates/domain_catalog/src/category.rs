//! Benefit categories
//!
//! Every code belongs to exactly one category. Private policies exclude
//! charges by category, so the category travels with each bill line.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::code::CodeKind;

/// Benefit category of a chargeable code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitCategory {
    Hospitalization,
    Consultation,
    MajorSurgery,
    MinorSurgery,
    DiagnosticImaging,
    Laboratory,
    Maternity,
    Dental,
    CriticalIllness,
    Accident,
    ChronicConditions,
    AcuteConditions,
    PreventiveCare,
    OutpatientTreatment,
    Medication,
    Other,
}

impl BenefitCategory {
    /// Infers the category from the code identifier
    ///
    /// Diagnoses follow ICD-10-CM chapter prefixes, procedures follow the
    /// ICD-10-PCS section and body-system characters. Hospital service
    /// codes are recognised by prefix (`WARD-`, `CONSULT-`, `LAB-`, `MED-`)
    /// and otherwise fall back to [`BenefitCategory::Other`].
    pub fn infer(kind: CodeKind, code_id: &str) -> Self {
        match kind {
            CodeKind::Diagnostic => Self::infer_diagnostic(code_id),
            CodeKind::Procedure => Self::infer_procedure(code_id),
            CodeKind::Service => Self::infer_service(code_id),
        }
    }

    fn infer_service(code_id: &str) -> Self {
        let code = code_id.trim().to_ascii_uppercase();
        let prefix = code.split('-').next().unwrap_or_default();
        match prefix {
            "WARD" => BenefitCategory::Hospitalization,
            "CONSULT" => BenefitCategory::Consultation,
            "LAB" => BenefitCategory::Laboratory,
            "MED" => BenefitCategory::Medication,
            _ => BenefitCategory::Other,
        }
    }

    fn infer_diagnostic(code_id: &str) -> Self {
        let code = code_id.trim().to_ascii_uppercase();
        let chars: Vec<char> = code.chars().collect();
        let Some(&chapter) = chars.first() else {
            return BenefitCategory::OutpatientTreatment;
        };
        let two_digits = |i: usize| -> Option<u32> {
            let tens = chars.get(i)?.to_digit(10)?;
            let units = chars.get(i + 1)?.to_digit(10)?;
            Some(tens * 10 + units)
        };
        let block = two_digits(1);

        // Higher-priority mappings first
        match (chapter, block) {
            ('O', _) => BenefitCategory::Maternity,
            ('C', Some(_)) => BenefitCategory::CriticalIllness,
            ('I', Some(20..=25 | 30..=39 | 40..=41)) => BenefitCategory::CriticalIllness,
            ('G', Some(30)) | ('E', Some(10 | 11)) => BenefitCategory::CriticalIllness,
            ('S' | 'T', _) => BenefitCategory::Accident,
            ('K', Some(0..=5)) => BenefitCategory::Dental,
            ('Z', Some(74)) => BenefitCategory::PreventiveCare,
            ('E', Some(66)) | ('I', Some(10)) | ('J', Some(45)) | ('N', Some(18)) => {
                BenefitCategory::ChronicConditions
            }
            ('J', Some(6)) | ('N', Some(30)) | ('R', Some(5)) => BenefitCategory::AcuteConditions,
            ('Z', Some(51..=53)) => BenefitCategory::PreventiveCare,
            _ => BenefitCategory::OutpatientTreatment,
        }
    }

    fn infer_procedure(code_id: &str) -> Self {
        let code = code_id.trim().to_ascii_uppercase();
        let mut chars = code.chars();
        let section = chars.next();
        let body_system = chars.next();

        match (section, body_system) {
            (Some('B'), _) => BenefitCategory::DiagnosticImaging,
            (Some('0'), Some('0' | '2')) => BenefitCategory::MajorSurgery,
            (Some('0'), Some('H' | 'P' | 'Q' | 'R' | 'S')) => BenefitCategory::MinorSurgery,
            (Some('0'), _) => BenefitCategory::MajorSurgery,
            _ => BenefitCategory::OutpatientTreatment,
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            BenefitCategory::Hospitalization => "Hospitalization",
            BenefitCategory::Consultation => "Consultation",
            BenefitCategory::MajorSurgery => "Major surgery",
            BenefitCategory::MinorSurgery => "Minor surgery",
            BenefitCategory::DiagnosticImaging => "Diagnostic imaging",
            BenefitCategory::Laboratory => "Laboratory",
            BenefitCategory::Maternity => "Maternity",
            BenefitCategory::Dental => "Dental",
            BenefitCategory::CriticalIllness => "Critical illness",
            BenefitCategory::Accident => "Accident",
            BenefitCategory::ChronicConditions => "Chronic conditions",
            BenefitCategory::AcuteConditions => "Acute conditions",
            BenefitCategory::PreventiveCare => "Preventive care",
            BenefitCategory::OutpatientTreatment => "Outpatient treatment",
            BenefitCategory::Medication => "Medication",
            BenefitCategory::Other => "Other",
        }
    }
}

impl fmt::Display for BenefitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(code: &str) -> BenefitCategory {
        BenefitCategory::infer(CodeKind::Diagnostic, code)
    }

    fn proc(code: &str) -> BenefitCategory {
        BenefitCategory::infer(CodeKind::Procedure, code)
    }

    #[test]
    fn test_diagnostic_inference() {
        assert_eq!(diag("O80"), BenefitCategory::Maternity);
        assert_eq!(diag("C34.1"), BenefitCategory::CriticalIllness);
        assert_eq!(diag("I21.4"), BenefitCategory::CriticalIllness);
        assert_eq!(diag("E11.9"), BenefitCategory::CriticalIllness);
        assert_eq!(diag("S72.001A"), BenefitCategory::Accident);
        assert_eq!(diag("K02.9"), BenefitCategory::Dental);
        assert_eq!(diag("I10"), BenefitCategory::ChronicConditions);
        assert_eq!(diag("J06.9"), BenefitCategory::AcuteConditions);
        assert_eq!(diag("Z51.11"), BenefitCategory::PreventiveCare);
        assert_eq!(diag("A09"), BenefitCategory::OutpatientTreatment);
    }

    #[test]
    fn test_critical_illness_wins_over_chronic_for_heart_disease() {
        // I10 is chronic, I25 is ischaemic heart disease
        assert_eq!(diag("I25.10"), BenefitCategory::CriticalIllness);
    }

    #[test]
    fn test_procedure_inference() {
        assert_eq!(proc("02703ZZ"), BenefitCategory::MajorSurgery);
        assert_eq!(proc("0HB6XZZ"), BenefitCategory::MinorSurgery);
        assert_eq!(proc("0DTJ4ZZ"), BenefitCategory::MajorSurgery);
        assert_eq!(proc("BW28ZZZ"), BenefitCategory::DiagnosticImaging);
        assert_eq!(proc("3E0234Z"), BenefitCategory::OutpatientTreatment);
    }

    #[test]
    fn test_service_inference_by_prefix() {
        let service = |code| BenefitCategory::infer(CodeKind::Service, code);
        assert_eq!(service("WARD-B1"), BenefitCategory::Hospitalization);
        assert_eq!(service("consult-gp"), BenefitCategory::Consultation);
        assert_eq!(service("LAB-FBC"), BenefitCategory::Laboratory);
        assert_eq!(service("MED-PARACETAMOL"), BenefitCategory::Medication);
        assert_eq!(service("TELEMED"), BenefitCategory::Other);
    }

    #[test]
    fn test_blank_code_is_outpatient() {
        assert_eq!(diag(""), BenefitCategory::OutpatientTreatment);
    }
}
