//! Turns raw lab-table text into typed measurements and patient context.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use biligram_core::{
    Advisory, BiligramError, ClassificationReport, ClassifierConfig, Measurement,
    MeasurementMethod, PatientContext,
};

use crate::classifier::ResultClassifier;

/// Birth weights below this are treated as a charting mistake.
const MIN_PLAUSIBLE_BIRTH_WEIGHT_KG: f64 = 0.5;

/// A field that may arrive as text or as a bare JSON number.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
}

impl RawField {
    pub fn as_text(&self) -> String {
        match self {
            RawField::Number(value) => value.to_string(),
            RawField::Text(text) => text.clone(),
        }
    }
}

impl Default for RawField {
    fn default() -> Self {
        RawField::Text(String::new())
    }
}

/// Birth data as charted.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PatientRecord {
    /// `6/1/16`, `6/1/2016`, or a full RFC 3339 timestamp.
    #[serde(default, alias = "birthDay")]
    pub birth_day: String,
    /// `00:23` or `0023`.
    #[serde(default, alias = "birthTime")]
    pub birth_time: String,
    /// `36 6/7` or `36.857`.
    #[serde(default, alias = "birthGA")]
    pub gestational_age: RawField,
    /// `2.930 kg (6 lb 10 oz)`.
    #[serde(default, alias = "birthWeight")]
    pub birth_weight: RawField,
}

/// One row of a lab result table.
#[derive(Debug, Clone, Deserialize)]
pub struct LabRow {
    pub drawtime: String,
    pub level: RawField,
}

/// Patient plus the three per-method result tables.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationRequest {
    pub patient: PatientRecord,
    #[serde(default)]
    pub serum: Vec<LabRow>,
    #[serde(default, alias = "POC")]
    pub point_of_care: Vec<LabRow>,
    #[serde(default, alias = "TCLab")]
    pub transcutaneous: Vec<LabRow>,
}

/// Typed input ready for the classifier, with everything that went wrong on the way.
#[derive(Debug, Clone)]
pub struct PreparedInput {
    pub patient: Option<PatientContext>,
    /// Chronological.
    pub measurements: Vec<Measurement>,
    pub advisories: Vec<Advisory>,
}

impl ClassificationRequest {
    pub fn prepare(&self) -> PreparedInput {
        let mut advisories = Vec::new();
        let patient = prepare_patient(&self.patient, &mut advisories);

        let tables = [
            (MeasurementMethod::Serum, &self.serum),
            (MeasurementMethod::PointOfCare, &self.point_of_care),
            (MeasurementMethod::Transcutaneous, &self.transcutaneous),
        ];

        let mut measurements = Vec::new();
        for (method, rows) in tables {
            for row in rows {
                let level_text = row.level.as_text();
                let drawn_at = parse_emr_datetime(&row.drawtime);
                let level = match &row.level {
                    RawField::Number(value) => Some(*value),
                    RawField::Text(text) => parse_level(text),
                };

                match (drawn_at, level) {
                    (Some(drawn_at), Some(level)) => {
                        measurements.push(Measurement::new(drawn_at, level, method))
                    }
                    _ => {
                        warn!(
                            method = method.label(),
                            drawtime = %row.drawtime,
                            level = %level_text,
                            "skipping unreadable lab row"
                        );
                        advisories.push(Advisory::UnreadableMeasurement {
                            method,
                            drawtime: row.drawtime.clone(),
                            level: level_text,
                        });
                    }
                }
            }
        }

        measurements.sort_by_key(|measurement| measurement.drawn_at);

        PreparedInput {
            patient,
            measurements,
            advisories,
        }
    }

    /// Classifies the request; an unreadable birth time yields advisories only.
    pub fn classify(&self, config: &ClassifierConfig) -> ClassificationReport {
        let prepared = self.prepare();
        match prepared.patient {
            Some(patient) => ResultClassifier::new(config.clone()).classify_with_advisories(
                &prepared.measurements,
                &patient,
                prepared.advisories,
            ),
            None => ClassificationReport::empty(prepared.advisories),
        }
    }
}

fn prepare_patient(
    record: &PatientRecord,
    advisories: &mut Vec<Advisory>,
) -> Option<PatientContext> {
    let ga_text = record.gestational_age.as_text();
    let gestational_age_weeks = match &record.gestational_age {
        RawField::Number(value) => Some(*value),
        RawField::Text(text) => parse_gestational_age(text),
    };
    if gestational_age_weeks.is_none() {
        warn!(value = %ga_text, "unreadable gestational age");
        advisories.push(Advisory::InvalidGestationalAge { value: ga_text });
    }

    let weight_text = record.birth_weight.as_text();
    let birth_weight_kg = match &record.birth_weight {
        RawField::Number(value) => Some(*value),
        RawField::Text(text) => parse_birth_weight(text),
    };
    if birth_weight_kg.map_or(true, |kg| kg < MIN_PLAUSIBLE_BIRTH_WEIGHT_KG) {
        warn!(value = %weight_text, "implausible birth weight");
        advisories.push(Advisory::InvalidBirthWeight { value: weight_text });
    }

    let birth_stamp = format!(
        "{} {}",
        record.birth_day.trim(),
        normalize_clock(record.birth_time.trim())
    );
    let birth_time =
        parse_emr_datetime(&birth_stamp).or_else(|| parse_emr_datetime(&record.birth_day));
    let Some(birth_time) = birth_time else {
        warn!(value = %birth_stamp.trim(), "unreadable birth date/time");
        advisories.push(Advisory::InvalidBirthTime {
            value: birth_stamp.trim().to_string(),
        });
        return None;
    };

    Some(PatientContext {
        birth_time,
        gestational_age_weeks,
        birth_weight_kg,
    })
}

/// Classify a request given as a JSON string.
pub fn classify_request_str(
    request_json: &str,
    config: &ClassifierConfig,
) -> Result<ClassificationReport, BiligramError> {
    let value: Value =
        serde_json::from_str(request_json).map_err(|err| BiligramError::Parse(err.to_string()))?;
    classify_request_value(&value, config)
}

/// Classify a request given as a `serde_json::Value`.
pub fn classify_request_value(
    request: &Value,
    config: &ClassifierConfig,
) -> Result<ClassificationReport, BiligramError> {
    if !request.get("patient").is_some_and(Value::is_object) {
        return Err(BiligramError::MissingData);
    }

    let request = ClassificationRequest::deserialize(request)
        .map_err(|err| BiligramError::Parse(err.to_string()))?;

    Ok(request.classify(config))
}

/// Whole plus fractional weeks: `36 6/7` is 36.857, `39` and `36.5` pass through.
/// Anything after the fraction, such as a `weeks` unit, is ignored.
pub fn parse_gestational_age(text: &str) -> Option<f64> {
    let mut parts = text.split_whitespace();
    let whole = parts.next()?;
    let Some(fraction) = parts.next().filter(|part| part.contains('/')) else {
        return whole.parse::<f64>().ok().filter(|weeks| weeks.is_finite());
    };

    let whole = whole.parse::<u32>().ok()?;
    let (numerator, denominator) = fraction.split_once('/')?;
    let numerator = numerator.parse::<u32>().ok()?;
    let denominator = denominator.parse::<u32>().ok()?;
    if denominator == 0 {
        return None;
    }
    Some(f64::from(whole) + f64::from(numerator) / f64::from(denominator))
}

/// Leading kilogram value of a charted weight such as `2.930 kg (6 lb 10 oz)`.
pub fn parse_birth_weight(text: &str) -> Option<f64> {
    leading_number(text)
}

/// Leading value of a lab level; trailing flags such as `*` or `(H)` are ignored.
pub fn parse_level(text: &str) -> Option<f64> {
    leading_number(text)
}

/// Longest numeric prefix, so `12.3.4` reads as 12.3 and `7.1-H` as 7.1.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let run_end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(text.len());
    let run = &text[..run_end];
    (1..=run.len())
        .rev()
        .find_map(|end| run[..end].parse::<f64>().ok())
}

/// Inserts the colon into a bare clock time: `0023` becomes `00:23`, `923` becomes `9:23`.
pub fn normalize_clock(time: &str) -> String {
    if time.contains(':') || !time.chars().all(|c| c.is_ascii_digit()) {
        return time.to_string();
    }
    match time.len() {
        4 => format!("{}:{}", &time[..2], &time[2..]),
        3 => format!("{}:{}", &time[..1], &time[1..]),
        _ => time.to_string(),
    }
}

/// Lab table timestamp: `6/4/16 12:02`, `6/4/2016 1202`, or RFC 3339.
///
/// Wall-clock stamps are taken as UTC; only differences between them matter.
pub fn parse_emr_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let (date, clock) = text.split_once(char::is_whitespace)?;
    let year = date.rsplit('/').next()?;
    let format = if year.len() == 4 {
        "%m/%d/%Y %H:%M"
    } else {
        "%m/%d/%y %H:%M"
    };
    let stamp = format!("{date} {}", normalize_clock(clock.trim()));
    NaiveDateTime::parse_from_str(&stamp, format)
        .ok()
        .map(|naive| naive.and_utc())
}
