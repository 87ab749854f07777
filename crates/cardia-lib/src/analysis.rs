//! One-call analysis pipeline: beat detection, fiducial location, and the
//! derived metrics, reported as one plain serializable structure. Pure
//! function of its inputs; re-running it on the same record yields identical
//! output.

use crate::config::EngineConfig;
use crate::detectors::DetectorKind;
use crate::fiducials::{locate_fiducials, FiducialCounts};
use crate::metrics::{
    abnormal_beat_count, heart_rate, hrv_sdnn_ms, rr_interval_ms, rr_summary, signal_quality,
    RrSummary,
};
use crate::record::WaveformRecord;
use crate::signal::RRSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub heart_rate: u32,
    pub rr_interval_ms: u32,
    pub hrv_sdnn_ms: u32,
    pub signal_quality: u32,
    pub total_beats: usize,
    pub abnormal_beats: usize,
    pub fiducial_counts: FiducialCounts,
    pub rr: RrSummary,
    pub sampling_rate: u32,
    pub samples_per_lead: usize,
    pub duration_s: f64,
}

pub fn analyze(
    record: &WaveformRecord,
    cfg: &EngineConfig,
    detector: DetectorKind,
) -> AnalysisReport {
    let ts = record.analysis_series();
    let events = detector.build().detect(&ts, cfg);
    let fiducials = locate_fiducials(&ts, &events, cfg);
    let rr = RRSeries::from_events(&events, ts.fs.max(1.0));
    AnalysisReport {
        heart_rate: heart_rate(&ts, cfg, detector),
        rr_interval_ms: rr_interval_ms(&ts, cfg, detector),
        hrv_sdnn_ms: hrv_sdnn_ms(&ts, cfg, detector),
        signal_quality: signal_quality(record),
        total_beats: events.len(),
        abnormal_beats: abnormal_beat_count(&ts, cfg, detector),
        fiducial_counts: fiducials.counts(),
        rr: rr_summary(&rr),
        sampling_rate: record.sampling_rate,
        samples_per_lead: record.samples_per_lead,
        duration_s: record.duration(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10 seconds at 360 Hz with an R-like spike every 0.8 s.
    fn ten_second_record() -> WaveformRecord {
        let fs = 360.0;
        let mut lead_ii = vec![0.0; 3600];
        let spacing = 288;
        let mut i = spacing;
        while i < lead_ii.len() {
            lead_ii[i] = 1.0;
            i += spacing;
        }
        let mut leads = vec![Vec::new(); 12];
        leads[1] = lead_ii;
        WaveformRecord::from_canonical(leads, fs as u32).unwrap()
    }

    #[test]
    fn end_to_end_uniform_rhythm() {
        let record = ten_second_record();
        let cfg = EngineConfig::default();
        let report = analyze(&record, &cfg, DetectorKind::Envelope);
        assert_eq!(report.heart_rate, 75);
        assert_eq!(report.rr_interval_ms, 800);
        assert_eq!(report.hrv_sdnn_ms, 0);
        assert_eq!(report.abnormal_beats, 0);
        // 3600 / 288 leaves 12 possible beats; the scan stops one refractory
        // window short of the end, so the last one is clipped.
        assert!(report.total_beats >= 11 && report.total_beats <= 12);
        assert_eq!(report.fiducial_counts.r, report.total_beats);
        assert!(report.fiducial_counts.q <= report.fiducial_counts.r);
        assert_eq!(report.fiducial_counts.p, 0);
        assert_eq!(report.fiducial_counts.t, 0);
        assert_eq!(report.sampling_rate, 360);
        assert_eq!(report.samples_per_lead, 3600);
        assert!((report.duration_s - 10.0).abs() < 1e-12);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let record = ten_second_record();
        let cfg = EngineConfig::default();
        let first = serde_json::to_string(&analyze(&record, &cfg, DetectorKind::Envelope)).unwrap();
        let second =
            serde_json::to_string(&analyze(&record, &cfg, DetectorKind::Envelope)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn alternate_detector_produces_a_report_too() {
        let record = ten_second_record();
        let cfg = EngineConfig::default();
        let report = analyze(&record, &cfg, DetectorKind::Threshold);
        assert!(report.total_beats > 0);
        assert_eq!(report.fiducial_counts.r, report.total_beats);
    }
}
