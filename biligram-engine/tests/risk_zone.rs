use biligram_core::RiskZone;
use biligram_engine::RiskZoneTable;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn zone_is_undefined_before_twelve_hours() {
    let table = RiskZoneTable::bhutani();
    for age in [-6.0, 0.0, 5.5, 11.9] {
        for level in [0.0, 5.0, 12.0, 30.0] {
            assert_eq!(table.classify(age, level), RiskZone::Undefined);
        }
    }
    assert_eq!(table.classify(f64::NAN, 10.0), RiskZone::Undefined);
}

#[test]
fn twenty_nine_hours_interpolates_between_the_28_and_32_hour_samples() {
    let table = RiskZoneTable::bhutani();
    let high_intermediate_ceiling = &table.curves()[1];

    assert_eq!(high_intermediate_ceiling.sample(4), Some(8.9));
    assert_eq!(high_intermediate_ceiling.sample(5), Some(10.0));
    // 8.9 + (29 - 28) * (10.0 - 8.9) / 4
    assert_close(
        high_intermediate_ceiling.threshold_at(29.0).unwrap(),
        9.175,
    );

    // 12.2 clears the first interior curve, so the scan stops at the top zone.
    assert_eq!(table.classify(29.0, 12.2), RiskZone::High);
}

#[test]
fn reaching_a_curve_returns_the_zone_above_it() {
    let table = RiskZoneTable::bhutani();
    // At 24 h the interior curves sit at 7.8, 6.1 and 4.9.
    assert_eq!(table.classify(24.0, 7.8), RiskZone::High);
    assert_eq!(table.classify(24.0, 7.79), RiskZone::HighIntermediate);
    assert_eq!(table.classify(24.0, 6.1), RiskZone::HighIntermediate);
    assert_eq!(table.classify(24.0, 6.0), RiskZone::LowIntermediate);
    assert_eq!(table.classify(24.0, 4.9), RiskZone::LowIntermediate);
    assert_eq!(table.classify(24.0, 4.8), RiskZone::Low);
    assert_eq!(table.classify(24.0, 0.0), RiskZone::Low);
}

#[test]
fn thresholds_between_samples_follow_the_line() {
    let table = RiskZoneTable::bhutani();
    // At 30 h: high-intermediate ceiling 9.45, low-intermediate ceiling 7.5.
    assert_eq!(table.classify(30.0, 9.5), RiskZone::High);
    assert_eq!(table.classify(30.0, 9.4), RiskZone::HighIntermediate);
    assert_eq!(table.classify(30.0, 7.4), RiskZone::LowIntermediate);
}

#[test]
fn ages_past_the_table_reuse_the_last_sample() {
    let table = RiskZoneTable::bhutani();
    let last_age = table.curves()[1].age_at(34);
    assert_close(last_age, 148.0);

    for level in [5.0, 12.9, 13.0, 15.2, 15.3, 17.3, 17.4, 22.0] {
        let at_edge = table.classify(last_age, level);
        for age in [150.0, 200.0, 500.0] {
            assert_eq!(table.classify(age, level), at_edge, "age {age}, level {level}");
        }
    }

    assert_eq!(table.classify(300.0, 17.4), RiskZone::High);
    assert_eq!(table.classify(300.0, 13.0), RiskZone::LowIntermediate);
    assert_eq!(table.classify(300.0, 12.9), RiskZone::Low);
}

#[test]
fn raising_the_level_never_lowers_the_zone() {
    let table = RiskZoneTable::bhutani();
    for half_hours in 24..=320 {
        let age = f64::from(half_hours) / 2.0;
        let mut previous = RiskZone::Low;
        for tenths in 0..=300 {
            let level = f64::from(tenths) / 10.0;
            let zone = table.classify(age, level);
            assert!(zone >= previous, "age {age}: {level} gave {zone:?} after {previous:?}");
            previous = zone;
        }
    }
}

#[test]
fn bands_stack_from_floor_to_ceiling() {
    let table = RiskZoneTable::bhutani();
    let bands = table.bands();

    let zones: Vec<RiskZone> = bands.iter().map(|band| band.zone).collect();
    assert_eq!(
        zones,
        vec![
            RiskZone::High,
            RiskZone::HighIntermediate,
            RiskZone::LowIntermediate,
            RiskZone::Low
        ]
    );

    let high: Vec<(f64, f64, f64)> = bands[0].points().collect();
    assert_eq!(high.len(), 35);
    assert_eq!(high[0], (12.0, 7.1, 25.0));

    let low: Vec<(f64, f64, f64)> = bands[3].points().collect();
    assert_eq!(low[34], (148.0, 0.0, 13.0));
}
