//! FILENAME: crosstab-engine/src/filter.rs
//! Filter Stage - Reduces the raw record set before grouping.
//!
//! Four predicates, all ANDed:
//! 1. time-window membership on the period-identifying field
//! 2. categorical equality on the location field
//! 3. case-insensitive free-text search across every field
//! 4. arbitrary per-field allowed-value sets
//!
//! Pure function of its inputs; the caller owns debouncing of search
//! input (the engine imposes no rate limiting).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::record::Record;

/// Categorical value meaning "no location filtering", alongside `""`.
pub const LOCATION_ALL: &str = "all";

/// The complete filter selection for one recompute.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Field holding the time-window identifier on each record.
    pub period_field: String,

    /// Selected time windows. Empty set = no time filtering.
    pub periods: FxHashSet<String>,

    /// Field holding the categorical location value.
    pub location_field: String,

    /// `""` or `"all"` = no location filtering; otherwise exact match.
    pub location: String,

    /// Free-text substring, matched case-insensitively against the
    /// string form of any field value. Empty = pass everything.
    pub search: String,

    /// Additional per-field allowed-value sets. A field absent from the
    /// map, or mapped to an empty set, imposes no constraint.
    pub field_values: FxHashMap<String, FxHashSet<String>>,
}

impl FilterSpec {
    /// Applies the filter to a record slice, borrowing survivors.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let search = self.search.trim().to_lowercase();

        records
            .iter()
            .filter(|record| self.matches(record, &search))
            .collect()
    }

    fn matches(&self, record: &Record, search_lower: &str) -> bool {
        self.matches_period(record)
            && self.matches_location(record)
            && self.matches_search(record, search_lower)
            && self.matches_field_values(record)
    }

    fn matches_period(&self, record: &Record) -> bool {
        if self.periods.is_empty() {
            return true;
        }
        let period = field_string(record, &self.period_field);
        self.periods.contains(&period)
    }

    fn matches_location(&self, record: &Record) -> bool {
        if self.location.is_empty() || self.location == LOCATION_ALL {
            return true;
        }
        field_string(record, &self.location_field) == self.location
    }

    fn matches_search(&self, record: &Record, search_lower: &str) -> bool {
        if search_lower.is_empty() {
            return true;
        }
        record
            .values()
            .any(|value| value.display().to_lowercase().contains(search_lower))
    }

    fn matches_field_values(&self, record: &Record) -> bool {
        self.field_values.iter().all(|(field, allowed)| {
            allowed.is_empty() || allowed.contains(&field_string(record, field))
        })
    }
}

/// String form of a field reading; missing fields compare as `""`.
fn field_string(record: &Record, field: &str) -> String {
    record.get(field).map(|v| v.display()).unwrap_or_default()
}
