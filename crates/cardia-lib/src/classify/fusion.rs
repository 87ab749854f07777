//! Decides whether to trust the external classifier or fall back to the
//! rule-based path. External failures are logged and recovered locally;
//! callers always get a complete result.

use super::{
    classify_rule_based, ClassificationResult, Condition, Confidence, Diagnosis,
    ExternalClassifier, LabelProbs,
};
use crate::config::EngineConfig;
use crate::record::WaveformRecord;
use log::{debug, warn};

pub struct ClassifierFusion {
    config: EngineConfig,
    model: Option<Box<dyn ExternalClassifier>>,
}

impl ClassifierFusion {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn with_model(mut self, model: Box<dyn ExternalClassifier>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classify(&self, record: &WaveformRecord) -> ClassificationResult {
        if let Some(model) = &self.model {
            match model.predict(record) {
                Ok(probs) => {
                    debug!("external classifier returned {} labels", probs.len());
                    return self.from_model_probs(&probs);
                }
                Err(err) => {
                    warn!("external classifier failed, using rule-based fallback: {err}");
                }
            }
        }
        classify_rule_based(&record.analysis_series(), &self.config)
    }

    /// Map external label probabilities onto the condition taxonomy. Labels
    /// the model did not report default to 0. The record is judged normal
    /// only when every probability stays below the normal threshold, in
    /// which case a normal diagnosis is added so it ranks first.
    fn from_model_probs(&self, probs: &LabelProbs) -> ClassificationResult {
        let cfg = &self.config;
        let mut predictions: Vec<Diagnosis> = Vec::new();
        let mut max_prob: f64 = 0.0;
        for condition in Condition::EXTERNAL {
            let probability = condition
                .external_label()
                .and_then(|label| {
                    probs
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(label))
                        .map(|&(_, p)| p)
                })
                .unwrap_or(0.0);
            max_prob = max_prob.max(probability);
            predictions.push(Diagnosis {
                condition,
                probability,
                confidence: Confidence::bucket(probability, cfg),
            });
        }
        if max_prob < cfg.normal_threshold {
            let probability = 1.0 - max_prob;
            predictions.insert(
                0,
                Diagnosis {
                    condition: Condition::NormalSinusRhythm,
                    probability,
                    confidence: Confidence::bucket(probability, cfg),
                },
            );
        }
        ClassificationResult::from_predictions(predictions, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ModelError;
    use std::time::Duration;

    struct FixedModel(LabelProbs);

    impl ExternalClassifier for FixedModel {
        fn predict(&self, _record: &WaveformRecord) -> Result<LabelProbs, ModelError> {
            Ok(self.0.clone())
        }
    }

    struct FailingModel;

    impl ExternalClassifier for FailingModel {
        fn predict(&self, _record: &WaveformRecord) -> Result<LabelProbs, ModelError> {
            Err(ModelError::Timeout(Duration::from_secs(30)))
        }
    }

    fn beating_record() -> WaveformRecord {
        let mut lead_ii = vec![0.0; 3600];
        for k in 1..=11 {
            lead_ii[k * 288] = 1.0;
        }
        let mut leads = vec![Vec::new(); 12];
        leads[1] = lead_ii;
        WaveformRecord::from_canonical(leads, 360).unwrap()
    }

    #[test]
    fn failing_model_falls_back_to_rule_based_exactly() {
        let record = beating_record();
        let cfg = EngineConfig::default();
        let with_model = ClassifierFusion::new(cfg.clone()).with_model(Box::new(FailingModel));
        let without_model = ClassifierFusion::new(cfg);
        let fused = with_model.classify(&record);
        let rule_based = without_model.classify(&record);
        assert!(!fused.model_used);
        assert_eq!(
            serde_json::to_string(&fused).unwrap(),
            serde_json::to_string(&rule_based).unwrap()
        );
    }

    #[test]
    fn abnormal_model_output_ranks_the_hot_label_first() {
        let fusion = ClassifierFusion::new(EngineConfig::default()).with_model(Box::new(
            FixedModel(vec![("AF".into(), 0.82), ("SB".into(), 0.1)]),
        ));
        let result = fusion.classify(&beating_record());
        assert!(result.model_used);
        assert!(result.is_abnormal);
        assert_eq!(result.primary_diagnosis, Condition::AtrialFibrillation);
        assert_eq!(result.predictions[0].probability, 0.82);
        assert_eq!(result.predictions[0].confidence, Confidence::High);
        // All six external conditions are present, missing labels at 0.
        assert_eq!(result.predictions.len(), 6);
        assert!(result
            .predictions
            .iter()
            .any(|d| d.condition == Condition::LeftBundleBranchBlock && d.probability == 0.0));
    }

    #[test]
    fn quiet_model_output_is_overridden_to_normal() {
        let fusion = ClassifierFusion::new(EngineConfig::default()).with_model(Box::new(
            FixedModel(vec![("AF".into(), 0.2), ("RBBB".into(), 0.31)]),
        ));
        let result = fusion.classify(&beating_record());
        assert!(result.model_used);
        assert!(!result.is_abnormal);
        assert_eq!(result.primary_diagnosis, Condition::NormalSinusRhythm);
        assert!((result.predictions[0].probability - 0.69).abs() < 1e-12);
        assert_eq!(result.predictions.len(), 7);
    }

    #[test]
    fn no_model_attached_uses_the_rules() {
        let fusion = ClassifierFusion::new(EngineConfig::default());
        let result = fusion.classify(&beating_record());
        assert!(!result.model_used);
        assert_eq!(result.primary_diagnosis, Condition::NormalSinusRhythm);
    }
}
