//! Core data model for neonatal bilirubin risk classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-tunable behaviour of the classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClassifierConfig {
    /// Whether the infant is known to carry the named neurotoxicity risk factors.
    #[serde(default)]
    pub risk_factors: RiskFactorStatus,
}

/// Risk factor presence as known to the caller (isoimmune disease, G6PD deficiency,
/// asphyxia, lethargy, temperature instability, sepsis, albumin < 3.0 g/dL).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorStatus {
    /// The engine reports both follow-up variants.
    #[default]
    Unknown,
    Absent,
    Present,
}

/// Assay used for a bilirubin determination.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMethod {
    Serum,
    #[serde(alias = "POC")]
    PointOfCare,
    #[serde(alias = "transcut")]
    Transcutaneous,
}

impl MeasurementMethod {
    /// Short label used by lab result tables.
    pub fn label(self) -> &'static str {
        match self {
            MeasurementMethod::Serum => "serum",
            MeasurementMethod::PointOfCare => "POC",
            MeasurementMethod::Transcutaneous => "transcut",
        }
    }
}

/// One bilirubin determination in mg/dL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub drawn_at: DateTime<Utc>,
    pub level: f64,
    pub method: MeasurementMethod,
}

impl Measurement {
    pub fn new(drawn_at: DateTime<Utc>, level: f64, method: MeasurementMethod) -> Self {
        Self {
            drawn_at,
            level,
            method,
        }
    }

    /// Hours of life at draw time, rounded to one decimal place.
    pub fn age_hours(&self, birth_time: DateTime<Utc>) -> f64 {
        let millis = self
            .drawn_at
            .signed_duration_since(birth_time)
            .num_milliseconds() as f64;
        round_tenth(millis / 3_600_000.0)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Birth data needed to pick the applicable curves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientContext {
    pub birth_time: DateTime<Utc>,
    /// Whole plus fractional weeks, e.g. 36 6/7 is 36.857.
    pub gestational_age_weeks: Option<f64>,
    pub birth_weight_kg: Option<f64>,
}

impl PatientContext {
    pub fn new(
        birth_time: DateTime<Utc>,
        gestational_age_weeks: f64,
        birth_weight_kg: f64,
    ) -> Self {
        Self {
            birth_time,
            gestational_age_weeks: Some(gestational_age_weeks),
            birth_weight_kg: Some(birth_weight_kg),
        }
    }
}

/// Bhutani nomogram zone, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskZone {
    /// Risk is not assessed before 12 hours of life.
    Undefined,
    Low,
    LowIntermediate,
    HighIntermediate,
    High,
}

impl RiskZone {
    pub fn label(self) -> &'static str {
        match self {
            RiskZone::Undefined => "Undefined",
            RiskZone::Low => "Low",
            RiskZone::LowIntermediate => "Low-intermediate",
            RiskZone::HighIntermediate => "High-intermediate",
            RiskZone::High => "High",
        }
    }
}

/// Risk population whose treatment line was crossed.
///
/// `Low` is the line for well infants of 38 weeks or more (the highest threshold),
/// `High` the line for 35-37w6d infants with risk factors (the lowest).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentTier {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl TreatmentTier {
    pub fn is_exceeded(self) -> bool {
        self != TreatmentTier::None
    }
}

/// Phototherapy and exchange transfusion tiers for one point. Both may be exceeded at once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TreatmentAssessment {
    pub phototherapy: TreatmentTier,
    pub transfusion: TreatmentTier,
}

/// Follow-up recommendation text; a variant is `None` when the caller ruled it out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FollowUpGuidance {
    pub without_risk_factors: Option<String>,
    pub with_risk_factors: Option<String>,
}

/// One measurement decorated with its classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub measurement: Measurement,
    pub age_hours: f64,
    pub risk_zone: RiskZone,
    pub phototherapy: TreatmentTier,
    pub transfusion: TreatmentTier,
    pub follow_up: FollowUpGuidance,
    #[serde(default)]
    pub treatment_notes: Vec<String>,
}

impl ClassificationResult {
    pub fn treatment(&self) -> TreatmentAssessment {
        TreatmentAssessment {
            phototherapy: self.phototherapy,
            transfusion: self.transfusion,
        }
    }
}

/// Which treatment curve families are worth drawing for this report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CurveVisibility {
    pub phototherapy: bool,
    pub transfusion: bool,
}

/// Warnings for the caller to show next to the results. None of them stop classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    NomogramNotValidated,
    UndefinedBelow35Weeks,
    InvalidBirthTime { value: String },
    InvalidGestationalAge { value: String },
    InvalidBirthWeight { value: String },
    UnreadableMeasurement {
        method: MeasurementMethod,
        drawtime: String,
        level: String,
    },
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Advisory::NomogramNotValidated => concat!(
                "The Bhutani risk zones are only valid for birth GA 36+ weeks and birth weight > 2 kg, ",
                "or 35+ weeks and birth weight > 2.5 kg"
            )
            .to_string(),
            Advisory::UndefinedBelow35Weeks => {
                "The Bhutani nomogram does not define risk for infants with a birth gestational age under 35 weeks".to_string()
            }
            Advisory::InvalidBirthTime { value } => {
                format!("Could not figure out the birth date/time or it doesn't seem valid ({value})")
            }
            Advisory::InvalidGestationalAge { value } => {
                format!("Could not figure out the birth gestational age ({value})")
            }
            Advisory::InvalidBirthWeight { value } => {
                format!("Could not figure out the birth weight or it doesn't seem valid ({value})")
            }
            Advisory::UnreadableMeasurement {
                method,
                drawtime,
                level,
            } => format!(
                "Skipped unreadable {} result ({drawtime}: {level})",
                method.label()
            ),
        }
    }
}

/// Final output for one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationReport {
    pub generated_at: DateTime<Utc>,
    pub advisories: Vec<Advisory>,
    /// Newest draw time first.
    pub results: Vec<ClassificationResult>,
    pub curve_visibility: CurveVisibility,
}

impl ClassificationReport {
    /// Orders results newest first and derives curve visibility from them.
    pub fn new(advisories: Vec<Advisory>, mut results: Vec<ClassificationResult>) -> Self {
        // Ascending then reversed, so equal draw times keep the later input on top.
        results.sort_by_key(|result| result.measurement.drawn_at);
        results.reverse();

        let curve_visibility = CurveVisibility {
            phototherapy: results.iter().any(|r| r.phototherapy.is_exceeded()),
            transfusion: results.iter().any(|r| r.transfusion.is_exceeded()),
        };

        Self {
            generated_at: Utc::now(),
            advisories,
            results,
            curve_visibility,
        }
    }

    /// Report carrying only advisories, for patients that cannot be classified.
    pub fn empty(advisories: Vec<Advisory>) -> Self {
        Self::new(advisories, Vec::new())
    }

    /// Most recent result.
    pub fn latest(&self) -> Option<&ClassificationResult> {
        self.results.first()
    }
}

/// Errors raised while reading classification input.
#[derive(Debug, thiserror::Error)]
pub enum BiligramError {
    #[error("input is missing the minimum required data")]
    MissingData,
    #[error("could not read input: {0}")]
    Parse(String),
}
