pub mod fusion;
pub mod model;
pub mod rules;

pub use fusion::ClassifierFusion;
pub use model::{ExternalClassifier, LabelProbs, ModelError, ProcessClassifier};
pub use rules::classify_rule_based;

use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed condition taxonomy shared by both classifier paths. The enumeration
/// order doubles as the tie-break order when predictions are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Normal Sinus Rhythm")]
    NormalSinusRhythm,
    #[serde(rename = "Sinus Bradycardia")]
    SinusBradycardia,
    #[serde(rename = "Sinus Tachycardia")]
    SinusTachycardia,
    #[serde(rename = "Atrial Fibrillation")]
    AtrialFibrillation,
    #[serde(rename = "First-Degree AV Block")]
    FirstDegreeAvBlock,
    #[serde(rename = "Right Bundle Branch Block")]
    RightBundleBranchBlock,
    #[serde(rename = "Left Bundle Branch Block")]
    LeftBundleBranchBlock,
    #[serde(rename = "Other Abnormalities")]
    OtherAbnormality,
}

impl Condition {
    /// Conditions the external model can report, in enumeration order.
    pub const EXTERNAL: [Condition; 6] = [
        Condition::SinusBradycardia,
        Condition::SinusTachycardia,
        Condition::AtrialFibrillation,
        Condition::FirstDegreeAvBlock,
        Condition::RightBundleBranchBlock,
        Condition::LeftBundleBranchBlock,
    ];

    /// Label emitted by the external model for this condition, when any.
    pub fn external_label(self) -> Option<&'static str> {
        match self {
            Condition::SinusBradycardia => Some("SB"),
            Condition::SinusTachycardia => Some("ST"),
            Condition::AtrialFibrillation => Some("AF"),
            Condition::FirstDegreeAvBlock => Some("1dAVb"),
            Condition::RightBundleBranchBlock => Some("RBBB"),
            Condition::LeftBundleBranchBlock => Some("LBBB"),
            Condition::NormalSinusRhythm | Condition::OtherAbnormality => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::NormalSinusRhythm => "Normal Sinus Rhythm",
            Condition::SinusBradycardia => "Sinus Bradycardia",
            Condition::SinusTachycardia => "Sinus Tachycardia",
            Condition::AtrialFibrillation => "Atrial Fibrillation",
            Condition::FirstDegreeAvBlock => "First-Degree AV Block",
            Condition::RightBundleBranchBlock => "Right Bundle Branch Block",
            Condition::LeftBundleBranchBlock => "Left Bundle Branch Block",
            Condition::OtherAbnormality => "Other Abnormalities",
        };
        f.write_str(name)
    }
}

/// Deterministic confidence bucket, applied identically on both paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn bucket(probability: f64, cfg: &EngineConfig) -> Self {
        if probability > cfg.high_confidence {
            Confidence::High
        } else if probability > cfg.medium_confidence {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub condition: Condition,
    pub probability: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Sorted by probability descending; ties keep enumeration order.
    pub predictions: Vec<Diagnosis>,
    pub primary_diagnosis: Condition,
    pub is_abnormal: bool,
    /// Whether the external classifier contributed to this result.
    pub model_used: bool,
}

impl ClassificationResult {
    /// Predictions must arrive in enumeration order so the stable sort breaks
    /// ties deterministically.
    pub(crate) fn from_predictions(mut predictions: Vec<Diagnosis>, model_used: bool) -> Self {
        predictions.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let primary_diagnosis = predictions
            .first()
            .map(|d| d.condition)
            .unwrap_or(Condition::NormalSinusRhythm);
        Self {
            is_abnormal: primary_diagnosis != Condition::NormalSinusRhythm,
            primary_diagnosis,
            predictions,
            model_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_buckets_are_monotonic() {
        let cfg = EngineConfig::default();
        assert_eq!(Confidence::bucket(0.95, &cfg), Confidence::High);
        assert_eq!(Confidence::bucket(0.71, &cfg), Confidence::High);
        assert_eq!(Confidence::bucket(0.7, &cfg), Confidence::Medium);
        assert_eq!(Confidence::bucket(0.5, &cfg), Confidence::Medium);
        assert_eq!(Confidence::bucket(0.4, &cfg), Confidence::Low);
        assert_eq!(Confidence::bucket(0.0, &cfg), Confidence::Low);
        // Monotone in probability.
        let mut last = Confidence::Low;
        for i in 0..=100 {
            let c = Confidence::bucket(i as f64 / 100.0, &cfg);
            assert!(c >= last);
            last = c;
        }
    }

    #[test]
    fn sorting_is_stable_on_ties() {
        let cfg = EngineConfig::default();
        let preds = vec![
            Diagnosis {
                condition: Condition::NormalSinusRhythm,
                probability: 0.5,
                confidence: Confidence::bucket(0.5, &cfg),
            },
            Diagnosis {
                condition: Condition::SinusBradycardia,
                probability: 0.6,
                confidence: Confidence::bucket(0.6, &cfg),
            },
            Diagnosis {
                condition: Condition::SinusTachycardia,
                probability: 0.1,
                confidence: Confidence::bucket(0.1, &cfg),
            },
            Diagnosis {
                condition: Condition::OtherAbnormality,
                probability: 0.1,
                confidence: Confidence::bucket(0.1, &cfg),
            },
        ];
        let result = ClassificationResult::from_predictions(preds, false);
        assert_eq!(result.primary_diagnosis, Condition::SinusBradycardia);
        assert!(result.is_abnormal);
        let order: Vec<Condition> = result.predictions.iter().map(|d| d.condition).collect();
        assert_eq!(
            order,
            vec![
                Condition::SinusBradycardia,
                Condition::NormalSinusRhythm,
                Condition::SinusTachycardia,
                Condition::OtherAbnormality,
            ]
        );
    }

    #[test]
    fn condition_serializes_to_clinical_names() {
        let json = serde_json::to_string(&Condition::NormalSinusRhythm).unwrap();
        assert_eq!(json, "\"Normal Sinus Rhythm\"");
        let back: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Condition::NormalSinusRhythm);
    }
}
