//! FILENAME: crosstab-engine/tests/common/mod.rs
//! Fixtures for cross-tab engine integration tests.

use crosstab_engine::{Dataset, FieldSelection, MemoryConfigStore, PivotState, Record};

/// A month of studio session records across two locations.
pub struct StudioFixture;

impl StudioFixture {
    /// (period, location, class type, instructor, revenue, attendance)
    pub fn data() -> Vec<(&'static str, &'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("2024-01", "Downtown", "Barre", "Ana", 120.0, 10.0),
            ("2024-01", "Downtown", "Cycle", "Ben", 80.0, 8.0),
            ("2024-01", "Uptown", "Barre", "Ana", 95.0, 9.0),
            ("2024-02", "Downtown", "Barre", "Cleo", 130.0, 12.0),
            ("2024-02", "Uptown", "Cycle", "Ben", 60.0, 6.0),
            ("2024-02", "Uptown", "Yoga", "Cleo", 70.0, 7.0),
            ("2024-03", "Downtown", "Yoga", "Ana", 110.0, 11.0),
            ("2024-03", "Uptown", "Barre", "Ben", 85.0, 8.0),
        ]
    }

    pub fn dataset() -> Dataset {
        let records = Self::data()
            .into_iter()
            .map(|(period, loc, class, instructor, revenue, attendance)| {
                Record::new()
                    .with("Period", period)
                    .with("Location", loc)
                    .with("ClassType", class)
                    .with("Instructor", instructor)
                    .with("Revenue", revenue)
                    .with("Attendance", attendance)
            })
            .collect();
        Dataset::from_records(records)
    }
}

/// The three-record dataset used by the end-to-end scenarios.
pub fn scenario_dataset() -> Dataset {
    Dataset::from_records(vec![
        Record::new().with("Loc", "A").with("Type", "Barre").with("Rev", 100.0),
        Record::new().with("Loc", "A").with("Type", "Cycle").with("Rev", 50.0),
        Record::new().with("Loc", "B").with("Type", "Barre").with("Rev", 30.0),
    ])
}

/// A state over the scenario dataset with Loc rows / Type columns /
/// Rev values already selected (sum aggregation, both totals on).
pub fn scenario_state() -> PivotState {
    let mut state = PivotState::new(scenario_dataset(), Box::new(MemoryConfigStore::new()));
    state.set_row_fields(vec!["Loc".to_string()]);
    state.set_col_fields(vec!["Type".to_string()]);
    state.set_value_field(Some("Rev".to_string()));
    state
}

/// A state over the studio fixture with no selections yet.
pub fn studio_state() -> PivotState {
    PivotState::new(StudioFixture::dataset(), Box::new(MemoryConfigStore::new()))
}

pub fn scenario_selection() -> FieldSelection {
    FieldSelection::new(vec!["Loc".to_string()], vec!["Type".to_string()], "Rev")
}
