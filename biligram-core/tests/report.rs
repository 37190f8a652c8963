use biligram_core::{
    Advisory, BiligramError, ClassificationReport, ClassificationResult, ClassifierConfig, FollowUpGuidance,
    Measurement, MeasurementMethod, RiskFactorStatus, RiskZone, TreatmentTier,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

fn result(hours: i64, level: f64, phototherapy: TreatmentTier) -> ClassificationResult {
    let birth = Utc.with_ymd_and_hms(2016, 6, 1, 0, 0, 0).unwrap();
    let measurement = Measurement::new(
        birth + Duration::hours(hours),
        level,
        MeasurementMethod::Serum,
    );
    ClassificationResult {
        age_hours: measurement.age_hours(birth),
        measurement,
        risk_zone: RiskZone::Low,
        phototherapy,
        transfusion: TreatmentTier::None,
        follow_up: FollowUpGuidance::default(),
        treatment_notes: Vec::new(),
    }
}

#[test]
fn report_orders_newest_first_and_keeps_later_input_on_ties() {
    let report = ClassificationReport::new(
        Vec::new(),
        vec![
            result(24, 1.0, TreatmentTier::None),
            result(48, 2.0, TreatmentTier::None),
            result(24, 3.0, TreatmentTier::None),
        ],
    );

    let levels: Vec<f64> = report.results.iter().map(|r| r.measurement.level).collect();
    assert_eq!(levels, vec![2.0, 3.0, 1.0]);
    assert_eq!(report.latest().map(|r| r.age_hours), Some(48.0));
}

#[test]
fn curve_visibility_follows_exceedances() {
    let quiet = ClassificationReport::new(Vec::new(), vec![result(24, 1.0, TreatmentTier::None)]);
    assert!(!quiet.curve_visibility.phototherapy);

    let busy = ClassificationReport::new(
        Vec::new(),
        vec![
            result(24, 1.0, TreatmentTier::None),
            result(30, 12.0, TreatmentTier::Medium),
        ],
    );
    assert!(busy.curve_visibility.phototherapy);
    assert!(!busy.curve_visibility.transfusion);
}

#[test]
fn empty_report_keeps_advisories() {
    let report = ClassificationReport::empty(vec![Advisory::UndefinedBelow35Weeks]);
    assert!(report.results.is_empty());
    assert!(report.latest().is_none());
    assert_eq!(report.advisories.len(), 1);
}

#[test]
fn methods_accept_lab_table_aliases() {
    let poc: MeasurementMethod = serde_json::from_value(json!("POC")).unwrap();
    let transcut: MeasurementMethod = serde_json::from_value(json!("transcut")).unwrap();
    let serum: MeasurementMethod = serde_json::from_value(json!("serum")).unwrap();
    assert_eq!(poc, MeasurementMethod::PointOfCare);
    assert_eq!(transcut, MeasurementMethod::Transcutaneous);
    assert_eq!(serum.label(), "serum");
    assert_eq!(
        serde_json::to_value(MeasurementMethod::PointOfCare).unwrap(),
        json!("point_of_care")
    );
}

#[test]
fn config_defaults_to_unknown_risk_factors() {
    let config: ClassifierConfig = serde_json::from_value(json!({})).unwrap();
    assert_eq!(config.risk_factors, RiskFactorStatus::Unknown);

    let config: ClassifierConfig =
        serde_json::from_value(json!({ "risk_factors": "present" })).unwrap();
    assert_eq!(config.risk_factors, RiskFactorStatus::Present);
}

#[test]
fn advisories_serialize_with_a_kind_tag() {
    let advisory = Advisory::InvalidBirthWeight {
        value: "0.3".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&advisory).unwrap(),
        json!({ "kind": "invalid_birth_weight", "value": "0.3" })
    );
    assert!(advisory.message().contains("(0.3)"));
    assert_eq!(
        serde_json::to_value(Advisory::NomogramNotValidated).unwrap(),
        json!({ "kind": "nomogram_not_validated" })
    );
}

#[test]
fn zones_order_by_severity() {
    assert!(RiskZone::Undefined < RiskZone::Low);
    assert!(RiskZone::Low < RiskZone::LowIntermediate);
    assert!(RiskZone::HighIntermediate < RiskZone::High);
    assert_eq!(RiskZone::HighIntermediate.label(), "High-intermediate");
}

#[test]
fn errors_describe_the_failed_input() {
    let messages: Vec<String> = [
        BiligramError::MissingData,
        BiligramError::Parse("expected value".to_string()),
    ]
    .iter()
    .map(|err| match err {
        BiligramError::MissingData | BiligramError::Parse(_) => err.to_string(),
    })
    .collect();

    assert_eq!(
        messages,
        vec![
            "input is missing the minimum required data".to_string(),
            "could not read input: expected value".to_string(),
        ]
    );
}
