use std::time::Duration;

/// Tuning constants for the whole engine. Immutable once built; every entry
/// point takes it by reference so thresholds can be overridden per invocation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Moving window integration length for the beat-energy envelope (seconds).
    pub integration_window_s: f64,
    /// Minimum enforced spacing between accepted beats (seconds).
    pub refractory_s: f64,
    /// Half-width of the raw-signal search around an envelope crossing (seconds).
    pub search_radius_s: f64,
    /// Envelope threshold = mean + envelope_k * stddev.
    pub envelope_k: f64,
    /// Half-width of the Q/S search window around each R peak (seconds).
    pub qs_window_s: f64,
    /// Heart-rate band treated as normal sinus range (bpm, inclusive).
    pub normal_hr_low: u32,
    pub normal_hr_high: u32,
    /// SDNN below this (ms) supports a normal-rhythm call.
    pub normal_sdnn_bound: f64,
    /// SDNN above this (ms) elevates the irregular-rhythm probability.
    pub afib_sdnn_bound: f64,
    /// Probability above this buckets as High confidence.
    pub high_confidence: f64,
    /// Probability above this (and at most high_confidence) buckets as Medium.
    pub medium_confidence: f64,
    /// External path: a record is judged normal only when every label
    /// probability stays below this.
    pub normal_threshold: f64,
    /// Wall-clock bound on one external classifier invocation.
    pub model_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            integration_window_s: 0.150,
            refractory_s: 0.300,
            search_radius_s: 0.100,
            envelope_k: 0.5,
            qs_window_s: 0.080,
            normal_hr_low: 60,
            normal_hr_high: 100,
            normal_sdnn_bound: 50.0,
            afib_sdnn_bound: 100.0,
            high_confidence: 0.7,
            medium_confidence: 0.4,
            normal_threshold: 0.5,
            model_timeout: Duration::from_secs(30),
        }
    }
}
