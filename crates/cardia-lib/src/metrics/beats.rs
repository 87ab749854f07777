//! Beat-derived metrics. Every function re-detects peaks from its inputs and
//! degrades to zero on insufficient data instead of erroring.

use crate::config::EngineConfig;
use crate::detectors::DetectorKind;
use crate::signal::{RRSeries, TimeSeries};
use serde::{Deserialize, Serialize};

fn rr_intervals(ts: &TimeSeries, cfg: &EngineConfig, detector: DetectorKind) -> RRSeries {
    let events = detector.build().detect(ts, cfg);
    RRSeries::from_events(&events, ts.fs.max(1.0))
}

/// Mean heart rate in beats per minute, truncated toward zero. Zero for leads
/// shorter than one second or with fewer than two detected peaks.
pub fn heart_rate(ts: &TimeSeries, cfg: &EngineConfig, detector: DetectorKind) -> u32 {
    if (ts.len() as f64) < ts.fs {
        return 0;
    }
    let rr = rr_intervals(ts, cfg, detector);
    let mean = rr.mean();
    if rr.rr.is_empty() || mean <= 0.0 {
        0
    } else {
        (60.0 / mean) as u32
    }
}

/// Mean RR interval in milliseconds, truncated. Zero with fewer than two peaks.
pub fn rr_interval_ms(ts: &TimeSeries, cfg: &EngineConfig, detector: DetectorKind) -> u32 {
    let rr = rr_intervals(ts, cfg, detector);
    if rr.rr.is_empty() {
        0
    } else {
        (rr.mean() * 1000.0) as u32
    }
}

/// SDNN: population standard deviation of the RR intervals in milliseconds,
/// truncated. Zero with fewer than two peaks.
pub fn hrv_sdnn_ms(ts: &TimeSeries, cfg: &EngineConfig, detector: DetectorKind) -> u32 {
    let rr = rr_intervals(ts, cfg, detector);
    if rr.rr.is_empty() {
        0
    } else {
        (rr.stddev() * 1000.0) as u32
    }
}

/// Count of RR intervals deviating from the mean by more than two standard
/// deviations. An outlier rule, not an arrhythmia classifier. Zero with fewer
/// than three peaks.
pub fn abnormal_beat_count(ts: &TimeSeries, cfg: &EngineConfig, detector: DetectorKind) -> usize {
    let rr = rr_intervals(ts, cfg, detector);
    if rr.rr.len() < 2 {
        return 0;
    }
    let mean = rr.mean();
    let sd = rr.stddev();
    rr.rr.iter().filter(|&&x| (x - mean).abs() > 2.0 * sd).count()
}

/// Time-domain RR statistics reported alongside the integer metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RrSummary {
    /// Number of RR intervals.
    pub n: usize,
    pub mean_rr_ms: f64,
    pub sdnn_ms: f64,
    /// Root mean square of successive RR differences.
    pub rmssd_ms: f64,
    /// Fraction of successive differences exceeding 50 ms.
    pub pnn50: f64,
}

pub fn rr_summary(rr: &RRSeries) -> RrSummary {
    let n = rr.rr.len();
    let mean_rr_ms = rr.mean() * 1000.0;
    let sdnn_ms = rr.stddev() * 1000.0;
    let (rmssd_ms, pnn50) = if n > 1 {
        let sq_sum: f64 = rr.rr.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        let over_50 = rr
            .rr
            .windows(2)
            .filter(|w| (w[1] - w[0]).abs() > 0.050)
            .count();
        (
            (sq_sum / (n as f64 - 1.0)).sqrt() * 1000.0,
            over_50 as f64 / (n as f64 - 1.0),
        )
    } else {
        (0.0, 0.0)
    };
    RrSummary {
        n,
        mean_rr_ms,
        sdnn_ms,
        rmssd_ms,
        pnn50,
    }
}
