//! Legal reserve (encaje legal) records and the grouped report built from them.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;

use crate::types::decimal;
use crate::types::ordered::DateMap;

/// A reserve record joined with the name of its owning category.
///
/// This is the flat row the report engine streams over.
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveEntry {
    pub category: String,
    pub subcategory: String,
    pub value: BigDecimal,
    pub cutoff_date: NaiveDate,
    /// Name of the owning `category` row, reported as the report source.
    pub source: String,
}

/// Raw values recorded for one subcategory on one cut-off date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubcategoryValues {
    #[serde(rename = "subcategoria")]
    pub subcategory: String,
    #[serde(rename = "valores", serialize_with = "decimal::as_f64_seq")]
    pub values: Vec<BigDecimal>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryGroup {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "subcategorias")]
    pub subcategories: Vec<SubcategoryValues>,
}

/// Sum of all values recorded for one subcategory on one cut-off date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubcategoryTotal {
    #[serde(rename = "subcategoria")]
    pub subcategory: String,
    #[serde(rename = "valor_total", serialize_with = "decimal::as_f64")]
    pub total: BigDecimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTotal {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "subcategorias")]
    pub subcategories: Vec<SubcategoryTotal>,
}

/// Reserve records grouped by cut-off date, category and subcategory.
///
/// Dates appear newest first; categories and subcategories in first-seen order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReserveReport {
    #[serde(rename = "fuente")]
    pub source: String,
    #[serde(rename = "reporte")]
    pub report_name: String,
    #[serde(rename = "fecha_corte")]
    pub by_date: DateMap<Vec<CategoryGroup>>,
    #[serde(rename = "Total")]
    pub totals_by_date: DateMap<Vec<CategoryTotal>>,
}

impl ReserveReport {
    /// Returns true if no cut-off date has any record.
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
