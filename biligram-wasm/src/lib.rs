//! Framework-neutral WASM <-> JavaScript bridge.

use biligram_core::{BiligramError, ClassifierConfig, RiskFactorStatus};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsClassifierConfig {
    #[serde(default)]
    risk_factors: Option<RiskFactorStatus>,
}

impl From<JsClassifierConfig> for ClassifierConfig {
    fn from(cfg: JsClassifierConfig) -> Self {
        let mut base = ClassifierConfig::default();
        if let Some(risk_factors) = cfg.risk_factors {
            base.risk_factors = risk_factors;
        }
        base
    }
}

/// Classifies a request object (`patient` plus `serum` / `POC` / `TCLab` tables).
#[wasm_bindgen]
pub fn classify_bilirubin(request: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let request_value = from_value::<serde_json::Value>(request)
        .map_err(|err| JsValue::from_str(&format!("could not read request JSON: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsClassifierConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("could not read config: {err}")))?;
            ClassifierConfig::from(cfg)
        }
        None => ClassifierConfig::default(),
    };

    let report = biligram_engine::classify_request_value(&request_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_biligram_error(err)))?;

    to_value(&report).map_err(|err| JsValue::from_str(&format!("could not serialize report: {err}")))
}

fn format_biligram_error(err: BiligramError) -> String {
    format!("Biligram error: {err}")
}
