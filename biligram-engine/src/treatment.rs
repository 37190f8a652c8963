//! Phototherapy and exchange transfusion thresholds for infants of 35 weeks or more
//! (AAP, Pediatrics 2004;114:297-316).

use biligram_core::{TreatmentAssessment, TreatmentTier};

use crate::curves::{SampleGrid, ThresholdCurve};

const GRID: SampleGrid = SampleGrid::new(0.0, 12.0);

const PHOTOTHERAPY_LOWER_RISK: [f64; 13] = [
    6.7, 9.0, 11.5, 13.5, 15.2, 16.4, 17.6, 18.8, 19.8, 20.3, 21.0, 21.0, 21.0,
];
const PHOTOTHERAPY_MEDIUM_RISK: [f64; 13] = [
    5.0, 7.6, 9.8, 11.7, 13.1, 14.5, 15.4, 16.4, 17.2, 18.0, 18.0, 18.0, 18.0,
];
const PHOTOTHERAPY_HIGHER_RISK: [f64; 13] = [
    3.8, 6.0, 7.8, 9.5, 11.1, 12.4, 13.4, 14.0, 14.5, 14.9, 15.0, 15.0, 15.0,
];

const TRANSFUSION_LOWER_RISK: [f64; 13] = [
    16.0, 17.7, 19.0, 20.8, 22.1, 23.0, 23.9, 24.4, 24.9, 24.9, 24.9, 24.9, 24.9,
];
const TRANSFUSION_MEDIUM_RISK: [f64; 13] = [
    13.8, 15.1, 16.5, 17.9, 19.1, 20.1, 21.2, 22.0, 22.4, 22.4, 22.4, 22.4, 22.4,
];
const TRANSFUSION_HIGHER_RISK: [f64; 13] = [
    12.0, 13.5, 15.0, 16.0, 17.1, 18.0, 18.5, 18.8, 19.0, 19.0, 19.0, 19.0, 19.0,
];

static AAP_2004: TreatmentZoneTable = TreatmentZoneTable {
    phototherapy: TreatmentFamily {
        therapy: Therapy::Phototherapy,
        lines: [
            TreatmentLine::new(TreatmentTier::Low, &PHOTOTHERAPY_LOWER_RISK),
            TreatmentLine::new(TreatmentTier::Medium, &PHOTOTHERAPY_MEDIUM_RISK),
            TreatmentLine::new(TreatmentTier::High, &PHOTOTHERAPY_HIGHER_RISK),
        ],
    },
    transfusion: TreatmentFamily {
        therapy: Therapy::Transfusion,
        lines: [
            TreatmentLine::new(TreatmentTier::Low, &TRANSFUSION_LOWER_RISK),
            TreatmentLine::new(TreatmentTier::Medium, &TRANSFUSION_MEDIUM_RISK),
            TreatmentLine::new(TreatmentTier::High, &TRANSFUSION_HIGHER_RISK),
        ],
    },
};

/// Infants at or past this gestational age are never held to the 35-37w6d line.
pub const TERM_GESTATIONAL_AGE_WEEKS: f64 = 38.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Therapy {
    Phototherapy,
    Transfusion,
}

impl Therapy {
    pub fn label(self) -> &'static str {
        match self {
            Therapy::Phototherapy => "phototherapy",
            Therapy::Transfusion => "transfusion",
        }
    }
}

/// One treatment threshold curve and the risk population it applies to.
#[derive(Debug, Clone, Copy)]
pub struct TreatmentLine {
    pub tier: TreatmentTier,
    pub curve: ThresholdCurve,
}

impl TreatmentLine {
    const fn new(tier: TreatmentTier, samples: &'static [f64]) -> Self {
        Self {
            tier,
            curve: ThresholdCurve::new(samples, GRID),
        }
    }
}

/// Lines of one therapy, highest threshold (lower-risk infants) first.
#[derive(Debug, Clone)]
pub struct TreatmentFamily {
    pub therapy: Therapy,
    pub lines: [TreatmentLine; 3],
}

impl TreatmentFamily {
    /// Most severe tier whose line `level` reaches at `age_hours`.
    pub fn classify(
        &self,
        age_hours: f64,
        level: f64,
        gestational_age_weeks: Option<f64>,
    ) -> TreatmentTier {
        if !age_hours.is_finite() {
            return TreatmentTier::None;
        }

        let len = self.lines[0].curve.len() as i64;
        let mut anchor = self.lines[0].curve.grid.anchor(age_hours);
        // Only indexes strictly past the table are clamped; an index equal to the
        // sample count has no sample and exceeds nothing.
        if anchor.index > len {
            anchor.index = len - 1;
        }

        for line in &self.lines[..self.scanned_lines(gestational_age_weeks)] {
            let Some(threshold) = line.curve.interpolate(anchor, age_hours) else {
                continue;
            };
            if level >= threshold {
                return line.tier;
            }
        }

        TreatmentTier::None
    }

    /// Lines that apply at this gestational age; the last one is reserved for 35-37w6d.
    fn scanned_lines(&self, gestational_age_weeks: Option<f64>) -> usize {
        match gestational_age_weeks {
            Some(ga) if ga >= TERM_GESTATIONAL_AGE_WEEKS => self.lines.len() - 1,
            _ => self.lines.len(),
        }
    }
}

/// Phototherapy and exchange transfusion curve families.
#[derive(Debug, Clone)]
pub struct TreatmentZoneTable {
    phototherapy: TreatmentFamily,
    transfusion: TreatmentFamily,
}

impl TreatmentZoneTable {
    /// The published AAP thresholds.
    pub fn aap_2004() -> &'static TreatmentZoneTable {
        &AAP_2004
    }

    pub fn phototherapy(&self) -> &TreatmentFamily {
        &self.phototherapy
    }

    pub fn transfusion(&self) -> &TreatmentFamily {
        &self.transfusion
    }

    pub fn family(&self, therapy: Therapy) -> &TreatmentFamily {
        match therapy {
            Therapy::Phototherapy => &self.phototherapy,
            Therapy::Transfusion => &self.transfusion,
        }
    }

    /// Tiers exceeded by `level` at `age_hours`, each family evaluated on its own.
    pub fn classify(
        &self,
        age_hours: f64,
        level: f64,
        gestational_age_weeks: Option<f64>,
    ) -> TreatmentAssessment {
        TreatmentAssessment {
            phototherapy: self
                .phototherapy
                .classify(age_hours, level, gestational_age_weeks),
            transfusion: self
                .transfusion
                .classify(age_hours, level, gestational_age_weeks),
        }
    }
}

impl Default for TreatmentZoneTable {
    fn default() -> Self {
        AAP_2004.clone()
    }
}
