//! Fiducial point location. Q and S are taken as the raw-signal minima in a
//! tight window on either side of each R peak; in common QRS morphology both
//! deflections are negative-going relative to R, so the minimum brackets the
//! complex without template matching. P and T slots are reserved by the data
//! model but never populated by this locator.

use crate::config::EngineConfig;
use crate::signal::{Events, TimeSeries};
use serde::{Deserialize, Serialize};

/// A named landmark within one heartbeat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Peak {
    /// 0-based sample offset
    pub index: usize,
    /// index / sampling rate, in seconds
    pub time: f64,
    /// raw sample value at index
    pub amplitude: f64,
}

/// Per-kind landmark lists, chronological. Every Q/S entry is anchored to
/// exactly one R, so |R| >= |Q| and |R| >= |S|.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FiducialPointSet {
    pub p: Vec<Peak>,
    pub q: Vec<Peak>,
    pub r: Vec<Peak>,
    pub s: Vec<Peak>,
    pub t: Vec<Peak>,
}

impl FiducialPointSet {
    pub fn counts(&self) -> FiducialCounts {
        FiducialCounts {
            p: self.p.len(),
            q: self.q.len(),
            r: self.r.len(),
            s: self.s.len(),
            t: self.t.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiducialCounts {
    pub p: usize,
    pub q: usize,
    pub r: usize,
    pub s: usize,
    pub t: usize,
}

fn peak_at(data: &[f64], index: usize, fs: f64) -> Peak {
    Peak {
        index,
        time: index as f64 / fs,
        amplitude: data[index],
    }
}

fn argmin(data: &[f64], start: usize, end: usize) -> usize {
    let mut best = start;
    for i in start..end {
        if data[i] < data[best] {
            best = i;
        }
    }
    best
}

/// Anchor Q/S extrema to each detected R peak.
pub fn locate_fiducials(ts: &TimeSeries, peaks: &Events, cfg: &EngineConfig) -> FiducialPointSet {
    let data = &ts.data;
    let fs = ts.fs.max(1.0);
    let window = ((cfg.qs_window_s * fs).round() as usize).max(1);
    let mut set = FiducialPointSet::default();
    for &r in &peaks.indices {
        if r >= data.len() {
            continue;
        }
        set.r.push(peak_at(data, r, fs));

        // Q: minimum over [r - window, r)
        let q_start = r.saturating_sub(window);
        if q_start < r {
            set.q.push(peak_at(data, argmin(data, q_start, r), fs));
        }

        // S: minimum over (r, r + window]
        let s_end = (r + window + 1).min(data.len());
        if r + 1 < s_end {
            set.s.push(peak_at(data, argmin(data, r + 1, s_end), fs));
        }
    }
    set
}
