//! Signal quality: a coarse "does this look like an ECG" plausibility score,
//! not a noise-floor or SNR estimate.

use crate::record::WaveformRecord;

/// Per-lead heuristic: leads with a usable amplitude range and variance score
/// 80 plus a range bonus (capped at 100); flat or noisy leads score 30. The
/// overall score is the truncated mean across leads with more than 10
/// samples, defaulting to 50 when none qualify.
pub fn signal_quality(record: &WaveformRecord) -> u32 {
    let mut scores = Vec::new();
    for lead in &record.leads {
        if lead.len() <= 10 {
            continue;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in lead {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        let range = max - min;
        let mean = sum / lead.len() as f64;
        let variance =
            lead.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / lead.len() as f64;
        let score = if range > 0.1 && variance > 0.001 {
            (80.0 + 50.0 * range).min(100.0)
        } else {
            30.0
        };
        scores.push(score);
    }
    if scores.is_empty() {
        50
    } else {
        (scores.iter().sum::<f64>() / scores.len() as f64) as u32
    }
}
