//! FILENAME: crosstab-engine/src/lib.rs
//! Cross-Tab Pivot Engine for studio session analytics.
//!
//! This crate turns a flat collection of session records into
//! interactive cross-tabulated summaries: composite-key grouping over
//! arbitrary fields, multi-method aggregation, row/column/grand
//! totals, deterministic sorting, and CSV export. Durable storage of
//! named configurations lives behind the `ConfigStore` seam (see the
//! `persistence` crate).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot IS)
//! - `record`: Dynamic untyped input records (what we compute OVER)
//! - `filter`: Record-set reduction (what we compute ON)
//! - `engine`: Grouping, aggregation and totals (HOW we calculate)
//! - `view`: The Matrix result (WHAT we display)
//! - `sort` / `export`: On-demand ordering and CSV serialization
//! - `store`: Configuration CRUD seam
//! - `state`: The controller driving the full pipeline

pub mod definition;
pub mod engine;
pub mod export;
pub mod filter;
pub mod record;
pub mod sort;
pub mod state;
pub mod store;
pub mod view;

pub use definition::{
    AggregationMethod, ConfigId, FieldSelection, PivotConfig, SortAxis, SortDirection,
};
pub use engine::{aggregate_values, calculate, composite_key, group_records, Bucket};
pub use export::{export_csv, CsvExport, ExportError};
pub use filter::FilterSpec;
pub use record::{Dataset, Record, Scalar};
pub use sort::{sort_keys, SortState};
pub use state::PivotState;
pub use store::{
    new_config_id, validate_config, ConfigStore, MemoryConfigStore, StoreError, StoreResult,
};
pub use view::Matrix;
