//! Bhutani hour-specific risk zones (Pediatrics 1999;103:6-14).

use biligram_core::RiskZone;

use crate::curves::{SampleGrid, ThresholdCurve};

const GRID: SampleGrid = SampleGrid::new(12.0, 4.0);

const CEILING: [f64; 35] = [25.0; 35];

const HIGH_INTERMEDIATE_CEILING: [f64; 35] = [
    7.1, 7.2, 7.4, 7.8, 8.9, 10.0, 11.1, 12.2, 12.5, 13.2, 13.8, 14.4, 15.2, 15.4, 15.6, 15.9,
    16.2, 16.4, 16.7, 17.0, 17.2, 17.4, 17.4, 17.5, 17.5, 17.5, 17.6, 17.7, 17.6, 17.5, 17.4,
    17.4, 17.3, 17.3, 17.4,
];

const LOW_INTERMEDIATE_CEILING: [f64; 35] = [
    5.1, 5.5, 5.9, 6.1, 7.0, 8.0, 8.9, 9.9, 10.3, 10.8, 11.3, 12.0, 12.6, 12.9, 13.1, 13.4, 13.8,
    14.3, 14.7, 14.7, 15.0, 15.2, 15.3, 15.4, 15.5, 15.6, 15.7, 15.8, 15.7, 15.6, 15.5, 15.4,
    15.3, 15.2, 15.3,
];

const LOW_CEILING: [f64; 35] = [
    3.9, 4.3, 4.7, 4.9, 5.5, 6.3, 7.0, 7.8, 8.1, 8.6, 9.0, 9.3, 9.6, 10.2, 10.7, 11.2, 11.3,
    11.4, 11.6, 11.8, 12.2, 12.3, 12.5, 12.7, 12.8, 13.0, 13.1, 13.2, 13.2, 13.2, 13.2, 13.2,
    13.2, 13.2, 13.0,
];

const FLOOR: [f64; 35] = [0.0; 35];

static BHUTANI: RiskZoneTable = RiskZoneTable {
    curves: [
        ThresholdCurve::new(&CEILING, GRID),
        ThresholdCurve::new(&HIGH_INTERMEDIATE_CEILING, GRID),
        ThresholdCurve::new(&LOW_INTERMEDIATE_CEILING, GRID),
        ThresholdCurve::new(&LOW_CEILING, GRID),
        ThresholdCurve::new(&FLOOR, GRID),
    ],
};

/// Zone boundary curves, highest first: the plotting ceiling, the upper edges of the
/// high-intermediate, low-intermediate and low zones, then the zero floor.
#[derive(Debug, Clone)]
pub struct RiskZoneTable {
    curves: [ThresholdCurve; 5],
}

/// Area between two curves that makes up one zone on a chart.
#[derive(Debug, Clone, Copy)]
pub struct ZoneBand<'a> {
    pub zone: RiskZone,
    pub lower: &'a ThresholdCurve,
    pub upper: &'a ThresholdCurve,
}

impl ZoneBand<'_> {
    /// `(age_hours, low, high)` triples for an area-range plot.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.lower
            .points()
            .zip(self.upper.samples.iter())
            .map(|((age, low), high)| (age, low, *high))
    }
}

impl RiskZoneTable {
    /// The published nomogram.
    pub fn bhutani() -> &'static RiskZoneTable {
        &BHUTANI
    }

    pub fn grid(&self) -> SampleGrid {
        self.curves[0].grid
    }

    pub fn curves(&self) -> &[ThresholdCurve; 5] {
        &self.curves
    }

    /// Zone a bilirubin `level` falls in at `age_hours` of life.
    pub fn classify(&self, age_hours: f64, level: f64) -> RiskZone {
        let grid = self.grid();
        if age_hours.is_nan() || age_hours < grid.start_hours {
            return RiskZone::Undefined;
        }

        let len = self.curves[0].len() as i64;
        let mut anchor = grid.anchor(age_hours);
        if anchor.index >= len {
            anchor.index = len - 1;
        }

        // The ceiling and the floor never decide a zone: above the high-intermediate
        // ceiling is High, below every interior curve is Low.
        for (index, curve) in self.curves.iter().enumerate().take(4).skip(1) {
            let Some(threshold) = curve.interpolate(anchor, age_hours) else {
                continue;
            };
            if level >= threshold {
                return zone_above(index);
            }
        }

        RiskZone::Low
    }

    /// The four zones as curve pairs, most severe first.
    pub fn bands(&self) -> [ZoneBand<'_>; 4] {
        let [ceiling, high_int, low_int, low, floor] = &self.curves;
        [
            ZoneBand {
                zone: RiskZone::High,
                lower: high_int,
                upper: ceiling,
            },
            ZoneBand {
                zone: RiskZone::HighIntermediate,
                lower: low_int,
                upper: high_int,
            },
            ZoneBand {
                zone: RiskZone::LowIntermediate,
                lower: low,
                upper: low_int,
            },
            ZoneBand {
                zone: RiskZone::Low,
                lower: floor,
                upper: low,
            },
        ]
    }
}

impl Default for RiskZoneTable {
    fn default() -> Self {
        BHUTANI.clone()
    }
}

/// Zone entered by reaching the curve at `index`, one tier above the zone it caps.
fn zone_above(index: usize) -> RiskZone {
    match index {
        1 => RiskZone::High,
        2 => RiskZone::HighIntermediate,
        3 => RiskZone::LowIntermediate,
        _ => RiskZone::Low,
    }
}
