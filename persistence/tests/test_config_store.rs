//! FILENAME: persistence/tests/test_config_store.rs
//! Integration tests for the durable JSON configuration store.

use crosstab_engine::{
    AggregationMethod, ConfigStore, FieldSelection, PivotConfig, StoreError,
};
use persistence::JsonConfigStore;
use tempfile::TempDir;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn sample_config(name: &str) -> PivotConfig {
    let selection = FieldSelection::new(
        vec!["Loc".to_string()],
        vec!["Type".to_string()],
        "Rev",
    );
    let mut config = PivotConfig::new(name, &selection);
    config.aggregation_method = AggregationMethod::Sum;
    config
}

// ============================================================================
// DURABILITY TESTS
// ============================================================================

#[test]
fn test_saved_config_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let saved = {
        let mut store = JsonConfigStore::open(dir.path()).unwrap();
        store.save(sample_config("rev-by-loc-type")).unwrap()
    };

    // A fresh store instance over the same directory sees the entry.
    let store = JsonConfigStore::open(dir.path()).unwrap();
    let loaded = store.get(&saved.id).expect("config should persist");

    assert_eq!(loaded.name, "rev-by-loc-type");
    assert_eq!(loaded.row_fields, vec!["Loc".to_string()]);
    assert_eq!(loaded.col_fields, vec!["Type".to_string()]);
    assert_eq!(loaded.value_field, "Rev");
    assert_eq!(loaded.aggregation_method, AggregationMethod::Sum);
    assert!(loaded.show_row_totals);
    assert!(loaded.show_col_totals);
}

#[test]
fn test_missing_store_file_is_an_empty_list() {
    let dir = TempDir::new().unwrap();
    let store = JsonConfigStore::open(dir.path()).unwrap();
    assert!(store.list_all().is_empty());
}

#[test]
fn test_corrupt_store_file_degrades_to_empty_list() {
    let dir = TempDir::new().unwrap();
    let path = {
        let store = JsonConfigStore::open(dir.path()).unwrap();
        store.path().to_path_buf()
    };
    std::fs::write(&path, "{ not json at all").unwrap();

    let store = JsonConfigStore::open(dir.path()).unwrap();
    assert!(store.list_all().is_empty());
}

#[test]
fn test_failed_write_leaves_reads_consistent_with_disk() {
    let dir = TempDir::new().unwrap();
    let store_dir = dir.path().join("store");
    let mut store = JsonConfigStore::open(&store_dir).unwrap();
    let kept = store.save(sample_config("kept")).unwrap();

    // Pull the directory out from under the store so the next write fails.
    std::fs::remove_dir_all(&store_dir).unwrap();

    let err = store.save(sample_config("lost")).unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));

    // The failed save is not visible in memory either: reads still
    // match the last durable state.
    let all = store.list_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "kept");

    let err = store.delete(&kept.id).unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));
    assert_eq!(store.list_all().len(), 1);
}

#[test]
fn test_persisted_format_uses_header_key_names() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonConfigStore::open(dir.path()).unwrap();
    store.save(sample_config("format-check")).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &json.as_array().unwrap()[0];

    assert!(entry.get("rowHeaders").is_some());
    assert!(entry.get("colHeaders").is_some());
    assert_eq!(entry["valueField"], "Rev");
    assert_eq!(entry["aggregationMethod"], "sum");
    assert_eq!(entry["showRowTotals"], true);
}

// ============================================================================
// CRUD TESTS
// ============================================================================

#[test]
fn test_update_overwrites_in_place() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonConfigStore::open(dir.path()).unwrap();
    let saved = store.save(sample_config("original")).unwrap();

    let mut edited = sample_config("edited");
    edited.aggregation_method = AggregationMethod::Avg;
    store.update(&saved.id, edited).unwrap();

    let store = JsonConfigStore::open(dir.path()).unwrap();
    assert_eq!(store.list_all().len(), 1);
    let loaded = store.get(&saved.id).unwrap();
    assert_eq!(loaded.name, "edited");
    assert_eq!(loaded.aggregation_method, AggregationMethod::Avg);
}

#[test]
fn test_delete_persists() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonConfigStore::open(dir.path()).unwrap();
    let saved = store.save(sample_config("doomed")).unwrap();
    store.save(sample_config("survivor")).unwrap();

    store.delete(&saved.id).unwrap();

    let store = JsonConfigStore::open(dir.path()).unwrap();
    let all = store.list_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "survivor");
}

#[test]
fn test_blank_name_rejected_without_touching_disk() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonConfigStore::open(dir.path()).unwrap();
    store.save(sample_config("kept")).unwrap();

    let err = store.save(sample_config("  ")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let store = JsonConfigStore::open(dir.path()).unwrap();
    let all = store.list_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "kept");
}
