use std::fs;

use biligram_core::{ClassificationReport, ClassifierConfig};
use biligram_engine::classify_request_str;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn term_infant_request_matches_golden() {
    let request = fs::read_to_string(fixture_path("term_infant_request.json"))
        .expect("could not read sample request");

    let report = classify_request_str(&request, &ClassifierConfig::default())
        .expect("could not classify request");

    let expected = fs::read_to_string(fixture_path("term_infant_report.json"))
        .expect("could not read golden report");
    let mut expected: ClassificationReport =
        serde_json::from_str(&expected).expect("invalid golden");
    expected.generated_at = report.generated_at;

    assert_eq!(report, expected);
}
