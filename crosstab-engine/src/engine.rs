//! FILENAME: crosstab-engine/src/engine.rs
//! Cross-Tab Engine - The calculation core.
//!
//! Takes the filtered record set plus a FieldSelection and produces a
//! Matrix ready for rendering.
//!
//! Algorithm:
//! 1. Group: build row/column composite keys per record, collect the
//!    raw value-field readings into per-cell buckets
//! 2. Aggregate: reduce every bucket to one number per the selected
//!    aggregation method
//! 3. Assemble: dense matrix over the observed key sets (missing
//!    combinations read as zero)
//! 4. Totals: per-row / per-column sums of the already-aggregated
//!    cells, plus one grand total

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::definition::{AggregationMethod, FieldSelection};
use crate::record::{Record, Scalar};
use crate::view::Matrix;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Separator between field values inside a composite key.
pub const KEY_SEPARATOR: &str = " - ";

/// Label substituted for a missing/null selected-field value.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ============================================================================
// BUCKETS
// ============================================================================

/// Raw value-field readings collected for one cell.
type ValueList = SmallVec<[Scalar; 4]>;

/// Transient grouping result: per-(rowKey, colKey) raw value lists,
/// discarded once aggregation completes. Key vectors keep first-seen
/// order so the matrix is deterministic for a given record order.
#[derive(Debug, Default)]
pub struct Bucket {
    cells: FxHashMap<(String, String), ValueList>,
    row_keys: Vec<String>,
    col_keys: Vec<String>,
}

impl Bucket {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Builds the composite key for one record: the string forms of the
/// selected field values, in selection order, joined with `" - "`.
/// Missing or null readings render as `"Unknown"`.
pub fn composite_key(record: &Record, fields: &[String]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|field| match record.get(field) {
            None | Some(Scalar::Empty) => UNKNOWN_LABEL.to_string(),
            Some(value) => value.display(),
        })
        .collect();
    parts.join(KEY_SEPARATOR)
}

/// Grouping stage. Records whose value-field reading is missing or
/// null contribute to no bucket (and therefore to no key). An
/// incomplete selection yields an empty bucket: the engine is inert
/// until rows, columns and a value field all exist.
pub fn group_records(records: &[&Record], selection: &FieldSelection) -> Bucket {
    let mut bucket = Bucket::default();

    if !selection.is_complete() {
        return bucket;
    }
    let value_field = match selection.value_field.as_deref() {
        Some(field) => field,
        None => return bucket,
    };

    let mut seen_rows: FxHashSet<String> = FxHashSet::default();
    let mut seen_cols: FxHashSet<String> = FxHashSet::default();

    for record in records {
        let reading = match record.get(value_field) {
            None | Some(Scalar::Empty) => continue,
            Some(value) => value.clone(),
        };

        let row_key = composite_key(record, &selection.row_fields);
        let col_key = composite_key(record, &selection.col_fields);

        if seen_rows.insert(row_key.clone()) {
            bucket.row_keys.push(row_key.clone());
        }
        if seen_cols.insert(col_key.clone()) {
            bucket.col_keys.push(col_key.clone());
        }

        bucket
            .cells
            .entry((row_key, col_key))
            .or_default()
            .push(reading);
    }

    bucket
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Reduces one bucket's value list to a single number.
///
/// Numeric methods coerce permissively (unparseable -> 0); `count` and
/// `count_unique` operate on the raw values so distinct labels are
/// preserved, with uniqueness judged on the string form. An empty list
/// yields exactly 0 for every method - never NaN.
pub fn aggregate_values(values: &[Scalar], method: AggregationMethod) -> f64 {
    match method {
        AggregationMethod::Sum => values.iter().map(Scalar::to_number).sum(),
        AggregationMethod::Avg => {
            if values.is_empty() {
                0.0
            } else {
                let sum: f64 = values.iter().map(Scalar::to_number).sum();
                sum / values.len() as f64
            }
        }
        AggregationMethod::Min => values
            .iter()
            .map(Scalar::to_number)
            .fold(None, |min: Option<f64>, v| {
                Some(min.map_or(v, |m| m.min(v)))
            })
            .unwrap_or(0.0),
        AggregationMethod::Max => values
            .iter()
            .map(Scalar::to_number)
            .fold(None, |max: Option<f64>, v| {
                Some(max.map_or(v, |m| m.max(v)))
            })
            .unwrap_or(0.0),
        AggregationMethod::Count => values.len() as f64,
        AggregationMethod::CountUnique => {
            let distinct: FxHashSet<String> = values.iter().map(Scalar::display).collect();
            distinct.len() as f64
        }
    }
}

// ============================================================================
// MATRIX ASSEMBLY & TOTALS
// ============================================================================

/// Runs grouping, aggregation, assembly and totals over an already
/// filtered record set, producing a fresh Matrix.
pub fn calculate(
    records: &[&Record],
    selection: &FieldSelection,
    method: AggregationMethod,
    show_row_totals: bool,
    show_col_totals: bool,
) -> Matrix {
    let bucket = group_records(records, selection);

    let mut matrix = Matrix::default();
    matrix.row_keys = bucket.row_keys;
    matrix.col_keys = bucket.col_keys;

    for ((row_key, col_key), values) in &bucket.cells {
        matrix.set_cell(row_key, col_key, aggregate_values(values, method));
    }

    compute_totals(&mut matrix, show_row_totals, show_col_totals);
    matrix
}

/// Totals stage. Each total sums the *already aggregated* cell values
/// (missing cells read as zero), independent of the aggregation
/// method: avg/min/max totals are sums-of-aggregates by definition,
/// not re-aggregates of the underlying raw data. A disabled axis gets
/// an empty map - not computed, not merely hidden.
pub fn compute_totals(matrix: &mut Matrix, show_row_totals: bool, show_col_totals: bool) {
    matrix.row_totals.clear();
    matrix.col_totals.clear();

    if show_row_totals {
        for row_key in &matrix.row_keys {
            let total: f64 = matrix
                .col_keys
                .iter()
                .map(|col_key| matrix.value(row_key, col_key))
                .sum();
            matrix.row_totals.insert(row_key.clone(), total);
        }
    }

    if show_col_totals {
        for col_key in &matrix.col_keys {
            let total: f64 = matrix
                .row_keys
                .iter()
                .map(|row_key| matrix.value(row_key, col_key))
                .sum();
            matrix.col_totals.insert(col_key.clone(), total);
        }
    }

    matrix.grand_total = if show_row_totals {
        Some(matrix.row_totals.values().sum())
    } else if show_col_totals {
        Some(matrix.col_totals.values().sum())
    } else {
        None
    };
}
