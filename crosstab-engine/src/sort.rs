//! FILENAME: crosstab-engine/src/sort.rs
//! Sort Stage - Per-axis lexicographic ordering of composite keys.
//!
//! A sort request on an axis toggles that axis's direction; the first
//! request on an axis sorts ascending. Axes are independent and each
//! retains its last-applied direction, which is re-applied after every
//! recompute.

use crate::definition::{SortAxis, SortDirection};
use crate::view::Matrix;

/// Last-applied sort direction per axis. `None` = never sorted; keys
/// stay in first-observed order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortState {
    rows: Option<SortDirection>,
    cols: Option<SortDirection>,
}

impl SortState {
    /// Registers a sort request: toggles the axis's direction, or
    /// starts it ascending on first use. Returns the new direction.
    pub fn request(&mut self, axis: SortAxis) -> SortDirection {
        let slot = match axis {
            SortAxis::Rows => &mut self.rows,
            SortAxis::Columns => &mut self.cols,
        };
        let next = match *slot {
            Some(direction) => direction.toggled(),
            None => SortDirection::Ascending,
        };
        *slot = Some(next);
        next
    }

    pub fn direction(&self, axis: SortAxis) -> Option<SortDirection> {
        match axis {
            SortAxis::Rows => self.rows,
            SortAxis::Columns => self.cols,
        }
    }

    /// Re-applies the retained directions to a freshly built matrix.
    pub fn apply(&self, matrix: &mut Matrix) {
        if let Some(direction) = self.rows {
            sort_keys(&mut matrix.row_keys, direction);
        }
        if let Some(direction) = self.cols {
            sort_keys(&mut matrix.col_keys, direction);
        }
    }
}

/// Lexicographic string comparison on the composite key.
///
/// Keys compare by Unicode code point, not locale-aware collation:
/// accented labels order after the ASCII range (`"Émile"` sorts after
/// `"Zoe"`).
pub fn sort_keys(keys: &mut [String], direction: SortDirection) {
    match direction {
        SortDirection::Ascending => keys.sort_by(|a, b| a.cmp(b)),
        SortDirection::Descending => keys.sort_by(|a, b| b.cmp(a)),
    }
}
