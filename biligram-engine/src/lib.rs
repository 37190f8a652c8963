//! Bilirubin threshold evaluation: Bhutani risk zones, AAP phototherapy and exchange
//! transfusion thresholds, and follow-up guidance for newborns of 35 weeks or more.
//!
//! The tables are fixed published data. Classification is pure and holds no mutable
//! state, so the same tables serve concurrent callers without locking.

pub mod classifier;
pub mod curves;
pub mod guidance;
pub mod intake;
pub mod risk_zone;
pub mod treatment;

pub use classifier::{check_applicability, ResultClassifier};
pub use curves::{Anchor, SampleGrid, ThresholdCurve};
pub use guidance::{follow_up, treatment_note, GestationalBand};
pub use intake::{
    classify_request_str, classify_request_value, ClassificationRequest, LabRow, PatientRecord,
    PreparedInput, RawField,
};
pub use risk_zone::{RiskZoneTable, ZoneBand};
pub use treatment::{
    Therapy, TreatmentFamily, TreatmentLine, TreatmentZoneTable, TERM_GESTATIONAL_AGE_WEEKS,
};
