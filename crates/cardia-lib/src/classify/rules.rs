//! Deterministic rule-based classifier: maps heart rate and HRV features
//! from the canonical analysis lead to a probability table over the fixed
//! condition set. Serves as the fallback path when no external model is
//! available or its invocation fails.

use super::{ClassificationResult, Condition, Confidence, Diagnosis};
use crate::config::EngineConfig;
use crate::detectors::DetectorKind;
use crate::metrics::{heart_rate, hrv_sdnn_ms};
use crate::signal::TimeSeries;

const NORMAL_STRONG: f64 = 0.85;
const NORMAL_BASE: f64 = 0.7;
const NORMAL_WEAK: f64 = 0.5;
const RATE_ELEVATED: f64 = 0.6;
const RATE_REST: f64 = 0.1;
const AFIB_ELEVATED: f64 = 0.4;
const AFIB_REST: f64 = 0.05;
const OTHER_BASE: f64 = 0.1;

pub fn classify_rule_based(ts: &TimeSeries, cfg: &EngineConfig) -> ClassificationResult {
    let hr = heart_rate(ts, cfg, DetectorKind::default());
    let sdnn = hrv_sdnn_ms(ts, cfg, DetectorKind::default()) as f64;

    let in_range = hr >= cfg.normal_hr_low && hr <= cfg.normal_hr_high;
    let normal = if in_range && sdnn < cfg.normal_sdnn_bound {
        NORMAL_STRONG
    } else if !in_range {
        NORMAL_WEAK
    } else {
        NORMAL_BASE
    };
    let brady = if hr < cfg.normal_hr_low {
        RATE_ELEVATED
    } else {
        RATE_REST
    };
    let tachy = if hr > cfg.normal_hr_high {
        RATE_ELEVATED
    } else {
        RATE_REST
    };
    let afib = if sdnn > cfg.afib_sdnn_bound {
        AFIB_ELEVATED
    } else {
        AFIB_REST
    };

    // Enumeration order, so ties sort deterministically.
    let table = [
        (Condition::NormalSinusRhythm, normal),
        (Condition::SinusBradycardia, brady),
        (Condition::SinusTachycardia, tachy),
        (Condition::AtrialFibrillation, afib),
        (Condition::OtherAbnormality, OTHER_BASE),
    ];
    let predictions = table
        .iter()
        .map(|&(condition, probability)| Diagnosis {
            condition,
            probability,
            confidence: Confidence::bucket(probability, cfg),
        })
        .collect();
    ClassificationResult::from_predictions(predictions, false)
}
