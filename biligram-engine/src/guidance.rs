//! Follow-up recommendations (Maisels et al., Pediatrics 2009;124:1193-1198) and treatment notes.

use biligram_core::{FollowUpGuidance, RiskFactorStatus, RiskZone, TreatmentTier};

use crate::treatment::{Therapy, TERM_GESTATIONAL_AGE_WEEKS};

const NOT_APPLICABLE_UNDER_35_WEEKS: &str = "(Not applicable under 35 weeks)";
const NOT_APPLICABLE_BEFORE_12_HOURS: &str = "(Not applicable before 12 hours of age)";

const RISK_FACTORS: &str = "with these risk factors: isoimmune disease, G6PD deficiency, asphyxia, lethargy, temp instability, sepsis, albumin < 3.0 g/dL (if measured)";

/// Gestational age band the 2009 recommendations are split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestationalBand {
    /// 35 to 37 6/7 weeks.
    Young,
    /// Past 38 weeks.
    NotYoung,
}

impl GestationalBand {
    /// Band for a gestational age; exactly 38 weeks belongs to neither.
    pub fn from_weeks(gestational_age_weeks: Option<f64>) -> Option<Self> {
        let ga = gestational_age_weeks?;
        if (35.0..TERM_GESTATIONAL_AGE_WEEKS).contains(&ga) {
            Some(GestationalBand::Young)
        } else if ga > TERM_GESTATIONAL_AGE_WEEKS {
            Some(GestationalBand::NotYoung)
        } else {
            None
        }
    }
}

/// Recommendation text as `(without risk factors, with risk factors)`.
fn recommendation(band: GestationalBand, zone: RiskZone) -> Option<(&'static str, &'static str)> {
    let texts = match (band, zone) {
        (GestationalBand::Young, RiskZone::High) => (
            "Evaluate for phototherapy, TSB in 4-24 h (inpatient or outpatient)",
            "Evaluate for phototherapy, TSB in 4-8 h (inpatient)",
        ),
        (GestationalBand::Young, RiskZone::HighIntermediate) => (
            "Evaluate for phototherapy, TcB/TSB within 24 h (inpatient or outpatient)",
            "Evaluate for phototherapy, TSB in 4-24 h (inpatient or outpatient)",
        ),
        (GestationalBand::Young, RiskZone::LowIntermediate) => (
            "If discharging < 72 h of age, follow up within 2 d",
            "If discharging < 72 h of age, follow-up within 2 d, consider TSB/TcB at follow-up",
        ),
        (GestationalBand::Young, RiskZone::Low) => (
            "If discharging in < 72 h of age, follow up within 2-3 d",
            "If discharging < 72 h of age, follow up within 2 d",
        ),
        (GestationalBand::NotYoung, RiskZone::High) => (
            "Evaluate for phototherapy, TSB in 4-24 h (inpatient or outpatient)",
            "Evaluate for phototherapy, TSB in 4-24 h (inpatient or outpatient)",
        ),
        (GestationalBand::NotYoung, RiskZone::HighIntermediate) => (
            "Follow up within 2 d, consider TcB/TSB at follow-up",
            "Evaluate for phototherapy, TcB/TSB within 24 h (inpatient or outpatient)",
        ),
        (GestationalBand::NotYoung, RiskZone::LowIntermediate) => (
            "If discharging < 72 h of age, follow up within 2-3 d",
            "If discharging < 72 h of age, follow up within 2 d",
        ),
        (GestationalBand::NotYoung, RiskZone::Low) => (
            "If discharging < 72 h of age, time follow-up according to age at discharge or concerns other than jaundice (e.g., breastfeeding)",
            "If discharging in < 72 h of age, follow up within 2-3 d",
        ),
        (_, RiskZone::Undefined) => return None,
    };
    Some(texts)
}

/// Follow-up guidance for a zone, filtered by what the caller knows about risk factors.
pub fn follow_up(
    zone: RiskZone,
    gestational_age_weeks: Option<f64>,
    risk_factors: RiskFactorStatus,
) -> FollowUpGuidance {
    if zone == RiskZone::Undefined {
        return not_applicable(NOT_APPLICABLE_BEFORE_12_HOURS);
    }

    let Some((without, with)) = GestationalBand::from_weeks(gestational_age_weeks)
        .and_then(|band| recommendation(band, zone))
    else {
        return not_applicable(NOT_APPLICABLE_UNDER_35_WEEKS);
    };

    FollowUpGuidance {
        without_risk_factors: (risk_factors != RiskFactorStatus::Present)
            .then(|| without.to_string()),
        with_risk_factors: (risk_factors != RiskFactorStatus::Absent).then(|| with.to_string()),
    }
}

fn not_applicable(text: &str) -> FollowUpGuidance {
    FollowUpGuidance {
        without_risk_factors: Some(text.to_string()),
        with_risk_factors: Some(text.to_string()),
    }
}

/// Sentence describing an exceeded treatment line, `None` when nothing was exceeded.
pub fn treatment_note(
    therapy: Therapy,
    tier: TreatmentTier,
    gestational_age_weeks: Option<f64>,
) -> Option<String> {
    let therapy = therapy.label();
    match tier {
        TreatmentTier::None => None,
        TreatmentTier::Low => Some(format!(
            "Exceeds {therapy} threshold for 38+ infants who are well"
        )),
        TreatmentTier::Medium => Some(format!(
            "Exceeds {therapy} threshold for 35-37w6d healthy, or 38w+ GA infants {RISK_FACTORS}"
        )),
        TreatmentTier::High => {
            let young = gestational_age_weeks.is_some_and(|ga| ga < TERM_GESTATIONAL_AGE_WEEKS);
            Some(if young {
                format!("Exceeds {therapy} threshold for infants 35w-37w6d GA {RISK_FACTORS}")
            } else {
                format!("Exceeds {therapy} threshold for infants {RISK_FACTORS}")
            })
        }
    }
}
