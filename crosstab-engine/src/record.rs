//! FILENAME: crosstab-engine/src/record.rs
//! Record Model - Dynamic, untyped tabular input.
//!
//! Session records arrive from the data-loading collaborator with a
//! field set that is not fixed at compile time: any field may later be
//! chosen as a row, column, value, or filter key. This module provides:
//! - `Scalar`: the numeric-or-textual cell value
//! - `Record`: an ordered field -> scalar mapping with an explicit
//!   accessor (no dynamic property lookup)
//! - `Dataset`: the record collection plus the field names available
//!   for selection (every key seen on the first record)

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// SCALAR VALUES
// ============================================================================

/// A single field reading. Numeric or textual; `Empty` stands in for
/// null/missing readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Empty,
    Number(f64),
    Text(String),
}

impl Scalar {
    /// String form used for composite keys, filters, and uniqueness.
    pub fn display(&self) -> String {
        match self {
            Scalar::Empty => String::new(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    /// Permissive numeric coercion: unparseable values become 0 rather
    /// than an error, so malformed data degrades instead of crashing.
    pub fn to_number(&self) -> f64 {
        match self {
            Scalar::Empty => 0.0,
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        }
    }

    /// True for null/missing readings. A record whose value-field
    /// reading is empty contributes to no bucket.
    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Empty)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One session record: an ordered mapping from field name to scalar.
///
/// Field order is preserved from ingestion (it defines the available
/// field list). Lookup is a linear scan; records carry on the order of
/// a dozen fields, so an index would cost more than it saves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Record { values: Vec::new() }
    }

    /// Builder-style field append, used heavily by tests and loaders.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.values.push((field.into(), value.into()));
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Scalar>) {
        let field = field.into();
        if let Some(slot) = self.values.iter_mut().find(|(name, _)| *name == field) {
            slot.1 = value.into();
        } else {
            self.values.push((field, value.into()));
        }
    }

    /// Explicit accessor for a field reading.
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates all readings, for whole-record predicates (search).
    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        self.values.iter().map(|(_, value)| value)
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// The raw record collection handed to the engine, plus the field
/// names offered for selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Every key seen on the first record, in its field order.
    field_names: Vec<String>,

    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset; the first record defines the available fields.
    pub fn from_records(records: Vec<Record>) -> Self {
        let field_names = records
            .first()
            .map(|record| record.field_names().map(str::to_string).collect())
            .unwrap_or_default();

        Dataset {
            field_names,
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.field_names.iter().any(|name| name == field)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Validates requested field names against the sample record's key
    /// set, dropping (and logging) unknown names so a stale selection
    /// cannot poison the pipeline.
    pub fn validate_fields(&self, requested: &[String]) -> Vec<String> {
        let known: FxHashSet<&str> = self.field_names.iter().map(String::as_str).collect();

        requested
            .iter()
            .filter(|field| {
                let ok = known.contains(field.as_str());
                if !ok {
                    log::warn!("dropping unknown field from selection: {}", field);
                }
                ok
            })
            .cloned()
            .collect()
    }
}
