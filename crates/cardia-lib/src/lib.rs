pub mod analysis;
pub mod classify;
pub mod config;
pub mod detectors;
pub mod fiducials;
pub mod io;
pub mod metrics;
pub mod record;
pub mod signal;

pub use analysis::{analyze, AnalysisReport};
pub use classify::{
    ClassificationResult, ClassifierFusion, Condition, Confidence, Diagnosis, ExternalClassifier,
    ModelError, ProcessClassifier,
};
pub use config::EngineConfig;
pub use detectors::{detect_r_peaks, DetectorKind, PeakDetector};
pub use fiducials::{locate_fiducials, FiducialCounts, FiducialPointSet, Peak};
pub use record::{WaveformRecord, LEAD_NAMES};
pub use signal::{Events, RRSeries, TimeSeries};
