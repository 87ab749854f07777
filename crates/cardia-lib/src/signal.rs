use serde::{Deserialize, Serialize};

/// One lead of ECG voltage bound to its sampling rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Uniform sampling frequency in Hz
    pub fs: f64,
    /// Voltage samples
    pub data: Vec<f64>,
}

impl TimeSeries {
    pub fn new(fs: f64, data: Vec<f64>) -> Self {
        Self { fs, data }
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 / self.fs
    }
}

/// Detected R-peak sample indices, ascending and deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Events {
    pub indices: Vec<usize>,
}

impl Events {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// RR intervals in seconds, derived from consecutive beat events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RRSeries {
    pub rr: Vec<f64>,
}

impl RRSeries {
    pub fn from_events(events: &Events, fs: f64) -> Self {
        let rr = events
            .indices
            .windows(2)
            .map(|w| (w[1] as f64 - w[0] as f64) / fs)
            .collect();
        Self { rr }
    }

    pub fn mean(&self) -> f64 {
        if self.rr.is_empty() {
            return 0.0;
        }
        self.rr.iter().sum::<f64>() / self.rr.len() as f64
    }

    /// Population standard deviation of the intervals.
    pub fn stddev(&self) -> f64 {
        if self.rr.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var =
            self.rr.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / self.rr.len() as f64;
        var.sqrt()
    }
}
