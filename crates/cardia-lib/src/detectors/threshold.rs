//! Baseline-residual detector: subtract a trailing moving average from the
//! raw lead and accept strict local maxima of the positive residual, spaced
//! by the refractory distance. Alternate strategy to the envelope detector.

use super::PeakDetector;
use crate::config::EngineConfig;
use crate::signal::{Events, TimeSeries};

pub struct SimpleThresholdDetector;

impl PeakDetector for SimpleThresholdDetector {
    fn detect(&self, ts: &TimeSeries, cfg: &EngineConfig) -> Events {
        let data = &ts.data;
        if data.len() < 3 {
            return Events::from_indices(Vec::new());
        }
        let fs = ts.fs.max(1.0);
        let min_gap = ((cfg.refractory_s * fs).round() as usize).max(1);
        let win = ((cfg.integration_window_s * fs) as usize).max(1);

        let mut baseline = vec![0.0; data.len()];
        let mut acc = 0.0;
        for i in 0..data.len() {
            acc += data[i];
            if i >= win {
                acc -= data[i - win];
            }
            baseline[i] = acc / win as f64;
        }

        let mut peaks = Vec::new();
        let mut last_idx = 0usize;
        for i in 1..data.len() - 1 {
            let y = data[i] - baseline[i];
            if y > 0.0
                && y > (data[i - 1] - baseline[i - 1])
                && y > (data[i + 1] - baseline[i + 1])
                && (peaks.is_empty() || i - last_idx >= min_gap)
            {
                peaks.push(i);
                last_idx = i;
            }
        }
        Events::from_indices(peaks)
    }
}
