use crate::signal::TimeSeries;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Canonical 12-lead order shared by ingest, analysis, and the model payload.
pub const LEAD_NAMES: [&str; 12] = [
    "I", "II", "III", "aVR", "aVL", "aVF", "V1", "V2", "V3", "V4", "V5", "V6",
];

/// Slot of a lead name in the canonical order, matched case-insensitively.
pub fn canonical_index(name: &str) -> Option<usize> {
    let trimmed = name.trim();
    LEAD_NAMES
        .iter()
        .position(|lead| lead.eq_ignore_ascii_case(trimmed))
}

/// Normalized multi-lead input: 12 leads in canonical order, equal length.
/// Leads absent from the source are all-zero; shorter leads are zero-padded
/// to the longest raw lead. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformRecord {
    pub leads: Vec<Vec<f64>>,
    pub sampling_rate: u32,
    pub samples_per_lead: usize,
}

impl WaveformRecord {
    /// Build a record from leads already arranged in canonical order. Short
    /// or missing trailing leads are zero-filled. Fails only when the input
    /// cannot yield an analysis lead at all: zero sampling rate, more than 12
    /// leads, or no samples in any lead.
    pub fn from_canonical(mut leads: Vec<Vec<f64>>, sampling_rate: u32) -> Result<Self> {
        if sampling_rate == 0 {
            bail!("sampling rate must be positive");
        }
        if leads.len() > LEAD_NAMES.len() {
            bail!(
                "expected at most {} leads, got {}",
                LEAD_NAMES.len(),
                leads.len()
            );
        }
        leads.resize(LEAD_NAMES.len(), Vec::new());
        let samples_per_lead = leads.iter().map(Vec::len).max().unwrap_or(0);
        if samples_per_lead == 0 {
            bail!("waveform contains no samples");
        }
        for lead in &mut leads {
            lead.resize(samples_per_lead, 0.0);
        }
        Ok(Self {
            leads,
            sampling_rate,
            samples_per_lead,
        })
    }

    pub fn lead(&self, name: &str) -> Option<&[f64]> {
        canonical_index(name).map(|slot| self.leads[slot].as_slice())
    }

    pub fn series(&self, name: &str) -> Option<TimeSeries> {
        self.lead(name)
            .map(|data| TimeSeries::new(self.sampling_rate as f64, data.to_vec()))
    }

    /// The canonical analysis lead: lead II, usually the clearest.
    pub fn analysis_lead(&self) -> &[f64] {
        &self.leads[1]
    }

    pub fn analysis_series(&self) -> TimeSeries {
        TimeSeries::new(self.sampling_rate as f64, self.analysis_lead().to_vec())
    }

    pub fn duration(&self) -> f64 {
        self.samples_per_lead as f64 / self.sampling_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_and_missing_leads() {
        let record = WaveformRecord::from_canonical(
            vec![vec![0.1, 0.2, 0.3], vec![1.0]],
            360,
        )
        .unwrap();
        assert_eq!(record.samples_per_lead, 3);
        assert_eq!(record.leads.len(), 12);
        for lead in &record.leads {
            assert_eq!(lead.len(), 3);
        }
        assert_eq!(record.leads[1], vec![1.0, 0.0, 0.0]);
        assert!(record.leads[5].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rejects_unusable_input() {
        assert!(WaveformRecord::from_canonical(vec![vec![1.0]], 0).is_err());
        assert!(WaveformRecord::from_canonical(vec![Vec::new(); 12], 360).is_err());
        assert!(WaveformRecord::from_canonical(vec![Vec::new(); 13], 360).is_err());
    }

    #[test]
    fn canonical_index_is_case_insensitive() {
        assert_eq!(canonical_index("II"), Some(1));
        assert_eq!(canonical_index("avr"), Some(3));
        assert_eq!(canonical_index(" v6 "), Some(11));
        assert_eq!(canonical_index("X1"), None);
    }

    #[test]
    fn analysis_lead_is_lead_ii() {
        let mut leads = vec![Vec::new(); 12];
        leads[1] = vec![0.5, 0.6];
        let record = WaveformRecord::from_canonical(leads, 360).unwrap();
        assert_eq!(record.analysis_lead(), &[0.5, 0.6]);
        assert_eq!(record.lead("ii").unwrap(), &[0.5, 0.6]);
    }
}
