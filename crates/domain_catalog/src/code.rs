//! Chargeable codes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Currency, Money};
use crate::category::BenefitCategory;
use crate::error::CatalogError;

/// The family a code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    /// ICD-10-CM diagnosis
    Diagnostic,
    /// ICD-10-PCS procedure
    Procedure,
    /// Hospital service: ward day, consultation, lab test, medication
    Service,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Diagnostic => f.write_str("diagnostic"),
            CodeKind::Procedure => f.write_str("procedure"),
            CodeKind::Service => f.write_str("service"),
        }
    }
}

/// A priced code from the hospital catalog
///
/// Fields are private: a `Code` is built once, validated, and read-only
/// from then on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Code {
    id: String,
    kind: CodeKind,
    description: String,
    category: BenefitCategory,
    unit_price: Money,
}

impl Code {
    /// Creates a code, inferring its benefit category from the identifier
    ///
    /// # Errors
    ///
    /// `EmptyIdentifier` for a blank id, `NegativePrice` for a price below zero.
    pub fn new(
        id: impl Into<String>,
        kind: CodeKind,
        description: impl Into<String>,
        unit_price: Money,
    ) -> Result<Self, CatalogError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(CatalogError::EmptyIdentifier);
        }
        if unit_price.is_negative() {
            return Err(CatalogError::NegativePrice {
                code: id,
                price: unit_price.amount().to_string(),
            });
        }

        Ok(Self {
            category: BenefitCategory::infer(kind, &id),
            id,
            kind,
            description: description.into(),
            unit_price,
        })
    }

    /// Overrides the inferred benefit category
    pub fn with_category(mut self, category: BenefitCategory) -> Self {
        self.category = category;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> BenefitCategory {
        self.category
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.id, self.description, self.unit_price)
    }
}

/// A raw catalog record as supplied by a catalog source
///
/// Prices arrive as bare decimals in the catalog currency; the category is
/// optional and inferred when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub kind: CodeKind,
    pub description: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub category: Option<BenefitCategory>,
}

impl CatalogEntry {
    /// Validates the record and converts it into a [`Code`]
    pub fn into_code(self, currency: Currency) -> Result<Code, CatalogError> {
        let code = Code::new(
            self.code,
            self.kind,
            self.description,
            Money::new(self.unit_price, currency),
        )?;
        Ok(match self.category {
            Some(category) => code.with_category(category),
            None => code,
        })
    }
}
