//! FILENAME: crosstab-engine/src/definition.rs
//! Pivot Configuration - The serializable description of a cross-tab.
//!
//! This module contains all the types needed to DESCRIBE a pivot:
//! which fields form the row and column groups, which field is
//! aggregated and how, and whether totals are shown. These structures
//! are designed to be:
//! - Serializable (for the durable configuration store)
//! - Immutable snapshots of user intent
//! - Independent of the data they are applied to

use serde::{Deserialize, Serialize};

/// Unique identifier for a saved pivot configuration.
pub type ConfigId = String;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation methods for the value field.
///
/// Serialized names (`sum`, `avg`, ..., `countUnique`) are part of the
/// persisted configuration format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationMethod {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    CountUnique,
}

impl Default for AggregationMethod {
    fn default() -> Self {
        AggregationMethod::Sum
    }
}

// ============================================================================
// FIELD SELECTION
// ============================================================================

/// The fields a user has placed on each axis, plus the value field.
///
/// Order is significant: composite keys concatenate the selected field
/// values in selection order, and the order is preserved on save/load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSelection {
    /// Fields forming the row composite key (outer to inner).
    pub row_fields: Vec<String>,

    /// Fields forming the column composite key (outer to inner).
    pub col_fields: Vec<String>,

    /// The field whose readings are aggregated.
    pub value_field: Option<String>,
}

impl FieldSelection {
    pub fn new(
        row_fields: Vec<String>,
        col_fields: Vec<String>,
        value_field: impl Into<String>,
    ) -> Self {
        FieldSelection {
            row_fields,
            col_fields,
            value_field: Some(value_field.into()),
        }
    }

    /// The engine is inert until rows, columns AND a value field exist.
    pub fn is_complete(&self) -> bool {
        !self.row_fields.is_empty()
            && !self.col_fields.is_empty()
            && self.value_field.as_deref().map_or(false, |f| !f.is_empty())
    }
}

// ============================================================================
// SORTING
// ============================================================================

/// Which axis a sort request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortAxis {
    Rows,
    Columns,
}

/// Direction of a lexicographic key sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Ascending
    }
}

// ============================================================================
// SAVED CONFIGURATION
// ============================================================================

/// A named, persisted snapshot of the pivot configuration.
///
/// The serialized key names (`rowHeaders`, `colHeaders`, camelCase
/// elsewhere) are the on-disk format of the configuration store; the
/// store holds a JSON array of these objects under a single well-known
/// key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotConfig {
    /// Unique id. Empty on a fresh save; the store assigns one.
    #[serde(default)]
    pub id: ConfigId,

    /// User-facing name. Must be non-blank to save.
    pub name: String,

    /// Row composite-key fields, in selection order.
    #[serde(rename = "rowHeaders")]
    pub row_fields: Vec<String>,

    /// Column composite-key fields, in selection order.
    #[serde(rename = "colHeaders")]
    pub col_fields: Vec<String>,

    pub value_field: String,

    pub aggregation_method: AggregationMethod,

    pub show_row_totals: bool,

    pub show_col_totals: bool,
}

impl PivotConfig {
    /// Creates an unsaved configuration (no id yet).
    pub fn new(name: impl Into<String>, selection: &FieldSelection) -> Self {
        PivotConfig {
            id: ConfigId::new(),
            name: name.into(),
            row_fields: selection.row_fields.clone(),
            col_fields: selection.col_fields.clone(),
            value_field: selection.value_field.clone().unwrap_or_default(),
            aggregation_method: AggregationMethod::Sum,
            show_row_totals: true,
            show_col_totals: true,
        }
    }

    /// Rebuilds the field selection this configuration captured.
    pub fn selection(&self) -> FieldSelection {
        FieldSelection {
            row_fields: self.row_fields.clone(),
            col_fields: self.col_fields.clone(),
            value_field: if self.value_field.is_empty() {
                None
            } else {
                Some(self.value_field.clone())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregation_method_serialized_names_match_store_format() {
        let json = serde_json::to_string(&AggregationMethod::CountUnique).unwrap();
        assert_eq!(json, "\"countUnique\"");
        let back: AggregationMethod = serde_json::from_str("\"avg\"").unwrap();
        assert_eq!(back, AggregationMethod::Avg);
    }

    #[test]
    fn config_serializes_with_header_key_names() {
        let selection = FieldSelection::new(
            vec!["Location".to_string()],
            vec!["ClassType".to_string()],
            "Revenue",
        );
        let config = PivotConfig::new("rev-by-loc", &selection);
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("rowHeaders").is_some());
        assert!(json.get("colHeaders").is_some());
        assert!(json.get("valueField").is_some());
        assert!(json.get("aggregationMethod").is_some());
        assert_eq!(json["showRowTotals"], serde_json::Value::Bool(true));
    }

    #[test]
    fn selection_completeness() {
        let mut selection = FieldSelection::default();
        assert!(!selection.is_complete());
        selection.row_fields = vec!["Location".to_string()];
        selection.col_fields = vec!["ClassType".to_string()];
        assert!(!selection.is_complete());
        selection.value_field = Some("Revenue".to_string());
        assert!(selection.is_complete());
        selection.value_field = Some(String::new());
        assert!(!selection.is_complete());
    }
}
