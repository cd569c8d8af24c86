//! FILENAME: crosstab-engine/src/export.rs
//! Export Stage - CSV serialization of the current matrix.
//!
//! Layout:
//! ```text
//! Row Field,<col1>,<col2>,...,Total      (Total column if row totals on)
//! <rowKey1>,<v11>,<v12>,...,<rowTotal1>
//! ...
//! Total,<colTotal1>,...,<grandTotal>     (row present if col totals on)
//! ```
//!
//! Export is rejected (an error value, never a panic) when the field
//! selection is incomplete or the matrix has no rows.

use thiserror::Error;

use crate::definition::{AggregationMethod, FieldSelection};
use crate::view::Matrix;

/// Label of the leading header cell and of the totals row/column.
const ROW_FIELD_HEADER: &str = "Row Field";
const TOTAL_LABEL: &str = "Total";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("select row fields, column fields and a value field before exporting")]
    IncompleteSelection,

    #[error("nothing to export: the pivot table has no rows")]
    EmptyMatrix,

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// A rendered export: CSV text plus a suggested file name derived from
/// the selected fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Serializes the matrix to CSV text.
pub fn export_csv(
    matrix: &Matrix,
    selection: &FieldSelection,
    method: AggregationMethod,
    show_row_totals: bool,
    show_col_totals: bool,
) -> Result<CsvExport, ExportError> {
    if !selection.is_complete() {
        return Err(ExportError::IncompleteSelection);
    }
    if matrix.is_empty() {
        return Err(ExportError::EmptyMatrix);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());

    // Header row
    let mut header: Vec<String> = Vec::with_capacity(matrix.col_count() + 2);
    header.push(ROW_FIELD_HEADER.to_string());
    header.extend(matrix.col_keys.iter().cloned());
    if show_row_totals {
        header.push(TOTAL_LABEL.to_string());
    }
    writer.write_record(&header)?;

    // One row per row key
    for row_key in &matrix.row_keys {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        row.push(row_key.clone());
        for col_key in &matrix.col_keys {
            row.push(format_value(matrix.value(row_key, col_key), method));
        }
        if show_row_totals {
            row.push(format_value(matrix.row_total(row_key), method));
        }
        writer.write_record(&row)?;
    }

    // Trailing totals row
    if show_col_totals {
        let mut totals: Vec<String> = Vec::with_capacity(header.len());
        totals.push(TOTAL_LABEL.to_string());
        for col_key in &matrix.col_keys {
            totals.push(format_value(matrix.col_total(col_key), method));
        }
        if show_row_totals {
            let grand = matrix.grand_total.unwrap_or(0.0);
            totals.push(format_value(grand, method));
        }
        writer.write_record(&totals)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    Ok(CsvExport {
        filename: suggested_filename(selection),
        content,
    })
}

/// Per-method cell formatting: averages keep two decimals, counts are
/// rounded integers, everything else renders the raw number.
pub fn format_value(value: f64, method: AggregationMethod) -> String {
    match method {
        AggregationMethod::Avg => format!("{:.2}", value),
        AggregationMethod::Count | AggregationMethod::CountUnique => {
            format!("{}", value.round() as i64)
        }
        _ => value.to_string(),
    }
}

/// Selected fields joined with hyphens, e.g. `Loc-Type-Rev.csv`.
fn suggested_filename(selection: &FieldSelection) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(selection.row_fields.iter().map(String::as_str));
    parts.extend(selection.col_fields.iter().map(String::as_str));
    if let Some(value_field) = selection.value_field.as_deref() {
        parts.push(value_field);
    }
    format!("{}.csv", parts.join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_rules_per_method() {
        assert_eq!(format_value(130.0, AggregationMethod::Sum), "130");
        assert_eq!(format_value(43.333333, AggregationMethod::Avg), "43.33");
        assert_eq!(format_value(2.999999, AggregationMethod::Count), "3");
        assert_eq!(format_value(2.0, AggregationMethod::CountUnique), "2");
        assert_eq!(format_value(12.5, AggregationMethod::Max), "12.5");
    }

    #[test]
    fn filename_joins_selected_fields() {
        let selection = FieldSelection::new(
            vec!["Loc".to_string()],
            vec!["Type".to_string()],
            "Rev",
        );
        assert_eq!(suggested_filename(&selection), "Loc-Type-Rev.csv");
    }

    #[test]
    fn incomplete_selection_is_rejected() {
        let matrix = Matrix::default();
        let selection = FieldSelection::default();
        let err = export_csv(
            &matrix,
            &selection,
            AggregationMethod::Sum,
            true,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::IncompleteSelection));
    }

    #[test]
    fn empty_matrix_is_rejected() {
        let matrix = Matrix::default();
        let selection = FieldSelection::new(
            vec!["Loc".to_string()],
            vec!["Type".to_string()],
            "Rev",
        );
        let err = export_csv(
            &matrix,
            &selection,
            AggregationMethod::Sum,
            true,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::EmptyMatrix));
    }
}
