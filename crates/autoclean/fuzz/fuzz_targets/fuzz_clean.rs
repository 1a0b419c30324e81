//! Fuzz target for the full cleaning job.
//!
//! Structured listings are rendered to CSV and cleaned twice. Any completed
//! run must reproduce itself byte for byte when fed its own output.

#![no_main]

use arbitrary::Arbitrary;
use autoclean::{CleaningJob, DelimitedEncoder, JobStatus};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Listing {
    name: String,
    year: String,
    price: String,
    mileage: String,
    fuel: String,
}

fuzz_target!(|listings: Vec<Listing>| {
    if listings.len() > 500 {
        return;
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    if writer.write_record(["name", "year", "price", "km_driven", "fuel"]).is_err() {
        return;
    }
    for l in &listings {
        if writer
            .write_record([&l.name, &l.year, &l.price, &l.mileage, &l.fuel])
            .is_err()
        {
            return;
        }
    }
    let Ok(input) = writer.into_inner() else {
        return;
    };

    let job = CleaningJob::default();
    let encoder = DelimitedEncoder::csv();
    let first = job.run("bronze/fuzz.csv", &input, &encoder);
    assert!(first.status_code == 200 || first.status_code == 400);

    if first.status == JobStatus::Completed {
        let output = first.artifact.unwrap_or_default();
        let second = job.run("bronze/fuzz_clean.csv", &output, &encoder);
        assert_eq!(second.output_rows, first.output_rows);
        assert_eq!(second.artifact.unwrap_or_default(), output);
    }
});
