//! FILENAME: crosstab-engine/src/state.rs
//! Pivot State - The engine's outbound surface to the UI collaborator.
//!
//! Owns the active dataset, filter and field selections, and a
//! `ConfigStore`. Every mutation re-runs the full pipeline (filter ->
//! group -> aggregate -> totals -> sort) from scratch; there is no
//! incremental recompute. Each recompute produces a fresh Matrix.

use rustc_hash::FxHashSet;

use crate::definition::{AggregationMethod, FieldSelection, PivotConfig, SortAxis};
use crate::engine;
use crate::export::{self, CsvExport, ExportError};
use crate::filter::FilterSpec;
use crate::record::Dataset;
use crate::sort::SortState;
use crate::store::{ConfigStore, StoreError, StoreResult};
use crate::view::Matrix;

/// Single-threaded, synchronous pivot controller.
pub struct PivotState {
    dataset: Dataset,
    filter: FilterSpec,
    selection: FieldSelection,
    method: AggregationMethod,
    show_row_totals: bool,
    show_col_totals: bool,
    sort: SortState,
    matrix: Matrix,
    store: Box<dyn ConfigStore>,
}

impl PivotState {
    pub fn new(dataset: Dataset, store: Box<dyn ConfigStore>) -> Self {
        let mut state = PivotState {
            dataset,
            filter: FilterSpec::default(),
            selection: FieldSelection::default(),
            method: AggregationMethod::default(),
            show_row_totals: true,
            show_col_totals: true,
            sort: SortState::default(),
            matrix: Matrix::default(),
            store,
        };
        state.recalculate();
        state
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// The current cross-tab result.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Fields offered for selection: every key seen on the first record.
    pub fn available_fields(&self) -> &[String] {
        self.dataset.field_names()
    }

    pub fn selection(&self) -> &FieldSelection {
        &self.selection
    }

    pub fn method(&self) -> AggregationMethod {
        self.method
    }

    // ========================================================================
    // MUTATIONS (each triggers a full recompute)
    // ========================================================================

    /// Replaces the raw record set.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        // Selections may reference fields the new data lacks.
        self.selection.row_fields = self.dataset.validate_fields(&self.selection.row_fields);
        self.selection.col_fields = self.dataset.validate_fields(&self.selection.col_fields);
        if let Some(value_field) = self.selection.value_field.clone() {
            if !self.dataset.has_field(&value_field) {
                log::warn!("dropping unknown value field: {}", value_field);
                self.selection.value_field = None;
            }
        }
        self.recalculate();
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.recalculate();
    }

    /// Free-text search. Debouncing is the caller's responsibility.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
        self.recalculate();
    }

    pub fn set_periods(&mut self, periods: FxHashSet<String>) {
        self.filter.periods = periods;
        self.recalculate();
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.filter.location = location.into();
        self.recalculate();
    }

    pub fn set_row_fields(&mut self, fields: Vec<String>) {
        self.selection.row_fields = self.dataset.validate_fields(&fields);
        self.recalculate();
    }

    pub fn set_col_fields(&mut self, fields: Vec<String>) {
        self.selection.col_fields = self.dataset.validate_fields(&fields);
        self.recalculate();
    }

    pub fn set_value_field(&mut self, field: Option<String>) {
        self.selection.value_field = match field {
            Some(name) if self.dataset.has_field(&name) => Some(name),
            Some(name) => {
                log::warn!("ignoring unknown value field: {}", name);
                None
            }
            None => None,
        };
        self.recalculate();
    }

    pub fn set_method(&mut self, method: AggregationMethod) {
        self.method = method;
        self.recalculate();
    }

    pub fn set_show_row_totals(&mut self, show: bool) {
        self.show_row_totals = show;
        self.recalculate();
    }

    pub fn set_show_col_totals(&mut self, show: bool) {
        self.show_col_totals = show;
        self.recalculate();
    }

    /// Sort request from the UI: toggles the axis direction and
    /// reorders the current matrix keys.
    pub fn request_sort(&mut self, axis: SortAxis) {
        self.sort.request(axis);
        self.sort.apply(&mut self.matrix);
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    pub fn export_csv(&self) -> Result<CsvExport, ExportError> {
        export::export_csv(
            &self.matrix,
            &self.selection,
            self.method,
            self.show_row_totals,
            self.show_col_totals,
        )
    }

    // ========================================================================
    // CONFIGURATION CRUD
    // ========================================================================

    /// Saves the current configuration under a new name.
    pub fn save_current(&mut self, name: &str) -> StoreResult<PivotConfig> {
        let config = self.snapshot(name);
        self.store.save(config)
    }

    /// Re-saves the current configuration over an existing entry.
    pub fn update_saved(&mut self, id: &str, name: &str) -> StoreResult<PivotConfig> {
        let config = self.snapshot(name);
        self.store.update(id, config)
    }

    /// Applies a saved configuration and re-drives the pipeline.
    pub fn load_config(&mut self, id: &str) -> StoreResult<()> {
        let config = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let selection = config.selection();
        self.selection.row_fields = self.dataset.validate_fields(&selection.row_fields);
        self.selection.col_fields = self.dataset.validate_fields(&selection.col_fields);
        self.selection.value_field = match selection.value_field {
            Some(name) if self.dataset.has_field(&name) => Some(name),
            Some(name) => {
                log::warn!("saved value field {} not present in current data", name);
                None
            }
            None => None,
        };
        self.method = config.aggregation_method;
        self.show_row_totals = config.show_row_totals;
        self.show_col_totals = config.show_col_totals;
        self.recalculate();
        Ok(())
    }

    pub fn delete_config(&mut self, id: &str) -> StoreResult<()> {
        self.store.delete(id)
    }

    pub fn saved_configs(&self) -> Vec<PivotConfig> {
        self.store.list_all()
    }

    // ========================================================================
    // PIPELINE
    // ========================================================================

    /// Full recompute, stages 1-6. Inert (empty matrix) until the
    /// field selection is complete.
    fn recalculate(&mut self) {
        if !self.selection.is_complete() {
            log::debug!("field selection incomplete, matrix cleared");
            self.matrix = Matrix::default();
            return;
        }

        let filtered = self.filter.apply(self.dataset.records());
        let mut matrix = engine::calculate(
            &filtered,
            &self.selection,
            self.method,
            self.show_row_totals,
            self.show_col_totals,
        );
        self.sort.apply(&mut matrix);
        self.matrix = matrix;
    }

    fn snapshot(&self, name: &str) -> PivotConfig {
        PivotConfig {
            id: String::new(),
            name: name.to_string(),
            row_fields: self.selection.row_fields.clone(),
            col_fields: self.selection.col_fields.clone(),
            value_field: self.selection.value_field.clone().unwrap_or_default(),
            aggregation_method: self.method,
            show_row_totals: self.show_row_totals,
            show_col_totals: self.show_col_totals,
        }
    }
}
