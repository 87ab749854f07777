//! Pan–Tompkins-inspired envelope detector: differentiate, square, and
//! integrate the lead into a beat-energy envelope, then refine adaptive
//! threshold crossings against the raw signal.

use super::PeakDetector;
use crate::config::EngineConfig;
use crate::signal::{Events, TimeSeries};

pub struct EnvelopeDetector;

impl PeakDetector for EnvelopeDetector {
    fn detect(&self, ts: &TimeSeries, cfg: &EngineConfig) -> Events {
        let data = &ts.data;
        if data.is_empty() {
            return Events::from_indices(Vec::new());
        }
        let fs = ts.fs.max(1.0);
        let refractory = ((cfg.refractory_s * fs).round() as usize).max(1);
        if data.len() < 2 * refractory {
            // No full window to scan.
            return Events::from_indices(Vec::new());
        }

        let envelope = energy_envelope(data, fs, cfg.integration_window_s);
        let mean = envelope.iter().sum::<f64>() / envelope.len() as f64;
        let var = envelope.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / envelope.len() as f64;
        let threshold = mean + cfg.envelope_k * var.sqrt();
        let radius = ((cfg.search_radius_s * fs).round() as usize).max(1);

        let mut peaks: Vec<usize> = Vec::new();
        let mut i = refractory;
        while i + refractory < envelope.len() {
            if envelope[i] > threshold {
                let start = i.saturating_sub(radius);
                let end = (i + radius).min(data.len());
                let mut best = start;
                for j in start..end {
                    if data[j] > data[best] {
                        best = j;
                    }
                }
                // Refinement can pull two crossings toward the same beat;
                // keep the refractory guarantee on the emitted indices.
                if peaks.last().map_or(true, |&prev| best >= prev + refractory) {
                    peaks.push(best);
                }
                i += refractory;
            } else {
                i += 1;
            }
        }
        Events::from_indices(peaks)
    }
}

/// Beat-energy envelope, same length as the input: first difference (last
/// element 0), elementwise square, centered moving mean of round(window_s*fs)
/// samples.
pub fn energy_envelope(data: &[f64], fs: f64, window_s: f64) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let mut squared = vec![0.0; data.len()];
    for i in 0..data.len() - 1 {
        let d = data[i + 1] - data[i];
        squared[i] = d * d;
    }
    let win = ((window_s * fs).round() as usize).max(1);
    centered_mean(&squared, win)
}

/// "Same"-length windowed mean: out[i] averages win samples centered on i,
/// zero-padded at the edges (the sum over the clamped window is still divided
/// by the full window length).
fn centered_mean(data: &[f64], win: usize) -> Vec<f64> {
    if win <= 1 {
        return data.to_vec();
    }
    let mut prefix = Vec::with_capacity(data.len() + 1);
    let mut acc = 0.0;
    prefix.push(0.0);
    for &v in data {
        acc += v;
        prefix.push(acc);
    }
    let right = (win - 1) / 2;
    let left = win - 1 - right;
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let lo = i.saturating_sub(left);
        let hi = (i + right + 1).min(data.len());
        out.push((prefix[hi] - prefix[lo]) / win as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::PeakDetector;

    fn impulse_train(len: usize, spacing: usize) -> Vec<f64> {
        let mut data = vec![0.0; len];
        let mut i = spacing;
        while i < len {
            data[i] = 1.0;
            i += spacing;
        }
        data
    }

    #[test]
    fn empty_and_short_signals_yield_no_peaks() {
        let cfg = EngineConfig::default();
        let empty = TimeSeries::new(360.0, Vec::new());
        assert!(EnvelopeDetector.detect(&empty, &cfg).is_empty());
        // 2 * refractory at 360 Hz is 216 samples.
        let short = TimeSeries::new(360.0, vec![1.0; 200]);
        assert!(EnvelopeDetector.detect(&short, &cfg).is_empty());
    }

    #[test]
    fn impulse_train_detected_at_exact_spacing() {
        let fs = 360.0;
        let spacing = 288; // 0.8 s
        let ts = TimeSeries::new(fs, impulse_train(10 * spacing, spacing));
        let cfg = EngineConfig::default();
        let events = EnvelopeDetector.detect(&ts, &cfg);
        assert_eq!(events.indices, vec![288, 576, 864, 1152, 1440, 1728, 2016, 2304, 2592]);
    }

    #[test]
    fn consecutive_peaks_respect_refractory_distance() {
        let fs = 360.0;
        let cfg = EngineConfig::default();
        // Impulses closer than the refractory window: only a subset survives.
        let ts = TimeSeries::new(fs, impulse_train(3600, 54));
        let events = EnvelopeDetector.detect(&ts, &cfg);
        let refractory = (cfg.refractory_s * fs).round() as usize;
        for pair in events.indices.windows(2) {
            assert!(pair[1] - pair[0] >= refractory);
        }
    }

    #[test]
    fn envelope_preserves_length_and_smooths_impulse() {
        let mut data = vec![0.0; 100];
        data[50] = 1.0;
        let envelope = energy_envelope(&data, 100.0, 0.15);
        assert_eq!(envelope.len(), data.len());
        // The impulse energy is spread over the integration window.
        assert!(envelope[50] > 0.0);
        assert!(envelope[44] > 0.0);
        assert!(envelope[10] == 0.0);
    }

    #[test]
    fn centered_mean_matches_same_convolution_alignment() {
        // numpy.convolve(x, ones(3)/3, mode="same") on [0,0,3,0,0]
        let out = centered_mean(&[0.0, 0.0, 3.0, 0.0, 0.0], 3);
        assert_eq!(out, vec![0.0, 1.0, 1.0, 1.0, 0.0]);
        // Even window: reach is one further to the left.
        let out = centered_mean(&[0.0, 0.0, 4.0, 0.0, 0.0, 0.0], 4);
        assert_eq!(out, vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
    }
}
