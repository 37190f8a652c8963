//! Classification of a patient's measurements against both tables.

use biligram_core::{
    Advisory, ClassificationReport, ClassificationResult, ClassifierConfig, Measurement,
    PatientContext,
};
use tracing::{debug, warn};

use crate::guidance::{follow_up, treatment_note};
use crate::risk_zone::RiskZoneTable;
use crate::treatment::{Therapy, TreatmentZoneTable};

/// Combines the risk zone and treatment tables into per-measurement results.
///
/// Holds only shared references to immutable tables, so one classifier can serve
/// any number of patients from any thread.
#[derive(Debug, Clone)]
pub struct ResultClassifier<'a> {
    risk_zones: &'a RiskZoneTable,
    treatment: &'a TreatmentZoneTable,
    config: ClassifierConfig,
}

impl ResultClassifier<'static> {
    /// Classifier over the published tables.
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_tables(
            RiskZoneTable::bhutani(),
            TreatmentZoneTable::aap_2004(),
            config,
        )
    }
}

impl Default for ResultClassifier<'static> {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl<'a> ResultClassifier<'a> {
    pub fn with_tables(
        risk_zones: &'a RiskZoneTable,
        treatment: &'a TreatmentZoneTable,
        config: ClassifierConfig,
    ) -> Self {
        Self {
            risk_zones,
            treatment,
            config,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies every measurement; results come back newest draw time first.
    pub fn classify(
        &self,
        measurements: &[Measurement],
        patient: &PatientContext,
    ) -> ClassificationReport {
        self.classify_with_advisories(measurements, patient, Vec::new())
    }

    /// Same as [`classify`](Self::classify), keeping advisories raised earlier (e.g. during intake).
    pub fn classify_with_advisories(
        &self,
        measurements: &[Measurement],
        patient: &PatientContext,
        mut advisories: Vec<Advisory>,
    ) -> ClassificationReport {
        for advisory in check_applicability(patient) {
            if !advisories.contains(&advisory) {
                advisories.push(advisory);
            }
        }

        let results = measurements
            .iter()
            .map(|measurement| self.classify_point(measurement, patient))
            .collect();

        ClassificationReport::new(advisories, results)
    }

    fn classify_point(
        &self,
        measurement: &Measurement,
        patient: &PatientContext,
    ) -> ClassificationResult {
        let ga = patient.gestational_age_weeks;
        let age_hours = measurement.age_hours(patient.birth_time);
        let level = measurement.level;

        let risk_zone = self.risk_zones.classify(age_hours, level);
        let treatment = self.treatment.classify(age_hours, level, ga);

        debug!(
            age_hours,
            level,
            method = measurement.method.label(),
            ?risk_zone,
            phototherapy = ?treatment.phototherapy,
            transfusion = ?treatment.transfusion,
            "classified bilirubin point"
        );

        let treatment_notes = [
            treatment_note(Therapy::Phototherapy, treatment.phototherapy, ga),
            treatment_note(Therapy::Transfusion, treatment.transfusion, ga),
        ]
        .into_iter()
        .flatten()
        .collect();

        ClassificationResult {
            measurement: measurement.clone(),
            age_hours,
            risk_zone,
            phototherapy: treatment.phototherapy,
            transfusion: treatment.transfusion,
            follow_up: follow_up(risk_zone, ga, self.config.risk_factors),
            treatment_notes,
        }
    }
}

/// Advisories on whether the Bhutani zones apply to this patient at all.
pub fn check_applicability(patient: &PatientContext) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    let ga = patient.gestational_age_weeks;
    let weight = patient.birth_weight_kg;

    let validated = match (ga, weight) {
        (Some(ga), Some(weight)) => (ga >= 36.0 && weight > 2.0) || (ga >= 35.0 && weight > 2.5),
        _ => false,
    };
    if !validated {
        warn!(?ga, ?weight, "risk zones not validated for this patient");
        advisories.push(Advisory::NomogramNotValidated);
    }

    if ga.is_some_and(|ga| ga < 35.0) {
        warn!(?ga, "Bhutani nomogram undefined below 35 weeks");
        advisories.push(Advisory::UndefinedBelow35Weeks);
    }

    advisories
}
