//! FILENAME: crosstab-engine/src/view.rs
//! Matrix View - The durable result of a recompute.
//!
//! A dense (sparse-filled) cross-tab: ordered row/column keys, a cell
//! lookup defaulting to zero, per-axis total maps, and one grand
//! total. This is what the UI collaborator renders; each recompute
//! produces a fresh, independent Matrix.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// The aggregated cross-tab result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Matrix {
    /// Observed row keys, in display order (first-seen until sorted).
    pub row_keys: Vec<String>,

    /// Observed column keys (union across rows), in display order.
    pub col_keys: Vec<String>,

    /// Aggregated value per (row key -> column key). Combinations with
    /// no contributing records are simply absent and read as zero.
    cells: FxHashMap<String, FxHashMap<String, f64>>,

    /// Per-row totals; empty (not merely hidden) when disabled.
    pub row_totals: FxHashMap<String, f64>,

    /// Per-column totals; empty when disabled.
    pub col_totals: FxHashMap<String, f64>,

    /// Sum of whichever axis totals are enabled; `None` if neither is.
    pub grand_total: Option<f64>,
}

impl Matrix {
    /// Cell lookup; missing (row, col) combinations default to 0.
    pub fn value(&self, row_key: &str, col_key: &str) -> f64 {
        self.cells
            .get(row_key)
            .and_then(|row| row.get(col_key))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn row_total(&self, row_key: &str) -> f64 {
        self.row_totals.get(row_key).copied().unwrap_or(0.0)
    }

    pub fn col_total(&self, col_key: &str) -> f64 {
        self.col_totals.get(col_key).copied().unwrap_or(0.0)
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_keys.len()
    }

    /// True for the inert/no-data case.
    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty()
    }

    pub(crate) fn set_cell(&mut self, row_key: &str, col_key: &str, value: f64) {
        self.cells
            .entry(row_key.to_string())
            .or_default()
            .insert(col_key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_read_as_zero() {
        let mut matrix = Matrix::default();
        matrix.row_keys.push("A".to_string());
        matrix.col_keys.push("Barre".to_string());
        matrix.set_cell("A", "Barre", 100.0);

        assert_eq!(matrix.value("A", "Barre"), 100.0);
        assert_eq!(matrix.value("A", "Cycle"), 0.0);
        assert_eq!(matrix.value("B", "Barre"), 0.0);
        assert_eq!(matrix.row_total("B"), 0.0);
    }
}
