//! Property-based tests for the cleaning pipeline.
//!
//! Random listing files are generated from small value pools so that
//! duplicates, junk numbers, out-of-range years and unknown categories all
//! show up regularly.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p autoclean --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p autoclean --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use autoclean::{
    CanonicalRole, CleaningJob, Cleaner, DelimitedEncoder, JobStatus, ValidationRules, Value,
};

// =============================================================================
// Test Strategies
// =============================================================================

fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Swift".to_string()),
        Just(" Swift ".to_string()),
        Just("City".to_string()),
        Just("Alto 800".to_string()),
        Just("".to_string()),
    ]
}

fn year() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (1880u32..2040).prop_map(|y| y.to_string()),
        1 => Just("NA".to_string()),
        1 => Just("new".to_string()),
    ]
}

fn price() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (0u32..2_000_000).prop_map(|p| p.to_string()),
        2 => (1u32..2_000).prop_map(|p| format!("${},000", p)),
        1 => Just("-500".to_string()),
        1 => Just("call".to_string()),
        1 => Just("".to_string()),
    ]
}

fn mileage() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (0u32..300_000).prop_map(|m| m.to_string()),
        1 => Just("12.5".to_string()),
        1 => Just("".to_string()),
    ]
}

fn fuel() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Petrol".to_string()),
        Just("Diesel ".to_string()),
        Just("CNG".to_string()),
        Just("Hydrogen".to_string()),
    ]
}

fn transmission() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Manual".to_string()),
        Just("Automatic".to_string()),
        Just("CVT".to_string()),
    ]
}

type Row = (String, String, String, String, String, String);

fn rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((name(), year(), price(), mileage(), fuel(), transmission()), 1..40)
}

fn to_csv(rows: &[Row]) -> Vec<u8> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["name", "year", "selling_price", "km_driven", "fuel", "transmission"])
        .unwrap();
    for (n, y, p, m, f, t) in rows {
        writer.write_record([n, y, p, m, f, t]).unwrap();
    }
    writer.into_inner().unwrap()
}

fn number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).expect("numeric cell")
}

// =============================================================================
// Output Invariants
// =============================================================================

proptest! {
    #[test]
    fn surviving_rows_satisfy_every_filter(rows in rows()) {
        let outcome = Cleaner::new().clean_bytes(&to_csv(&rows)).unwrap();
        let rules = ValidationRules::default();
        let table = &outcome.table;

        for row in 0..table.row_count() {
            prop_assert!(number(table.get_by_name(row, "price")) > 0.0);
            prop_assert!(rules.year_in_range(number(table.get_by_name(row, "year"))));
            prop_assert!(number(table.get_by_name(row, "mileage")) > 0.0);

            let fuel = table.get_by_name(row, "fuel").and_then(Value::as_str).unwrap();
            prop_assert!(rules.allowed_fuels.iter().any(|f| f == fuel));
            let gearbox = table.get_by_name(row, "transmission").and_then(Value::as_str).unwrap();
            prop_assert!(rules.allowed_transmissions.iter().any(|t| t == gearbox));
        }
    }

    #[test]
    fn output_has_no_duplicate_rows(rows in rows()) {
        let outcome = Cleaner::new().clean_bytes(&to_csv(&rows)).unwrap();
        let unique: HashSet<&Vec<Value>> = outcome.table.rows.iter().collect();
        prop_assert_eq!(unique.len(), outcome.output_rows());
    }

    #[test]
    fn output_is_sorted_by_name_then_year(rows in rows()) {
        let outcome = Cleaner::new().clean_bytes(&to_csv(&rows)).unwrap();
        let name = outcome.table.column_index("name").unwrap();
        let year = outcome.table.column_index("year").unwrap();

        for pair in outcome.table.rows.windows(2) {
            let a = (&pair[0][name], &pair[0][year]);
            let b = (&pair[1][name], &pair[1][year]);
            prop_assert!(a <= b);
        }
    }

    #[test]
    fn stage_counts_never_increase(rows in rows()) {
        let outcome = Cleaner::new().clean_bytes(&to_csv(&rows)).unwrap();
        let mut previous = outcome.input_rows;
        for stage in &outcome.filters.stages {
            prop_assert_eq!(stage.rows_before, previous);
            prop_assert!(stage.rows_after <= stage.rows_before);
            previous = stage.rows_after;
        }
        prop_assert_eq!(previous, outcome.output_rows());
    }

    #[test]
    fn cleaning_own_output_is_a_fixed_point(rows in rows()) {
        let job = CleaningJob::default();
        let encoder = DelimitedEncoder::csv();

        let first = job.run("bronze/cars.csv", &to_csv(&rows), &encoder);
        prop_assume!(first.status == JobStatus::Completed);
        let first_bytes = first.artifact.unwrap();

        let second = job.run("bronze/cars_clean.csv", &first_bytes, &encoder);
        prop_assert_eq!(second.status, JobStatus::Completed);
        prop_assert_eq!(second.input_rows, first.output_rows);
        prop_assert_eq!(second.output_rows, first.output_rows);
        prop_assert_eq!(second.artifact.unwrap(), first_bytes);
    }

    #[test]
    fn resolution_is_independent_of_row_content(rows in rows()) {
        let outcome = Cleaner::new().clean_bytes(&to_csv(&rows)).unwrap();
        prop_assert_eq!(outcome.schema.column(CanonicalRole::Price), Some("price"));
        prop_assert_eq!(outcome.schema.column(CanonicalRole::Mileage), Some("mileage"));
        prop_assert_eq!(outcome.schema.column(CanonicalRole::Name), Some("name"));
    }
}
