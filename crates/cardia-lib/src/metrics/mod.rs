pub mod beats;
pub mod quality;

pub use beats::{
    abnormal_beat_count, heart_rate, hrv_sdnn_ms, rr_interval_ms, rr_summary, RrSummary,
};
pub use quality::signal_quality;
