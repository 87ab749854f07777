pub mod envelope;
pub mod threshold;

pub use envelope::{energy_envelope, EnvelopeDetector};
pub use threshold::SimpleThresholdDetector;

use crate::config::EngineConfig;
use crate::signal::{Events, TimeSeries};

/// Strategy interface for R-peak detection. Implementations never fail:
/// insufficient data degrades to an empty event list.
pub trait PeakDetector: Send + Sync {
    fn detect(&self, ts: &TimeSeries, cfg: &EngineConfig) -> Events;
}

/// Selector for the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorKind {
    /// Differentiate/square/integrate envelope with adaptive threshold.
    #[default]
    Envelope,
    /// Baseline-residual local maxima. Cruder, but has no warm-up needs.
    Threshold,
}

impl DetectorKind {
    pub fn build(self) -> Box<dyn PeakDetector> {
        match self {
            DetectorKind::Envelope => Box::new(EnvelopeDetector),
            DetectorKind::Threshold => Box::new(SimpleThresholdDetector),
        }
    }
}

/// Detect R-peaks with the default envelope strategy.
pub fn detect_r_peaks(ts: &TimeSeries, cfg: &EngineConfig) -> Events {
    EnvelopeDetector.detect(ts, cfg)
}
