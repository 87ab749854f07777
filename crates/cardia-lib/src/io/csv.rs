//! 12-lead CSV ingest and the payload writer for the external classifier.
//! Header names are matched case-insensitively against the canonical lead
//! order; unknown columns are ignored, missing leads zero-filled, ragged
//! rows and non-numeric cells dropped.

use crate::record::{canonical_index, WaveformRecord, LEAD_NAMES};
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;

/// Acquisition rate assumed when the caller does not supply one.
pub const DEFAULT_SAMPLING_RATE: u32 = 360;

pub fn read_record<R: Read>(reader: R, sampling_rate: u32) -> Result<WaveformRecord> {
    let mut csv = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv.headers().context("reading CSV header row")?.clone();

    // (csv column, canonical slot); first occurrence of a name wins.
    let mut columns: Vec<(usize, usize)> = Vec::new();
    for (col, name) in headers.iter().enumerate() {
        if let Some(slot) = canonical_index(name) {
            if !columns.iter().any(|&(_, taken)| taken == slot) {
                columns.push((col, slot));
            }
        }
    }
    if columns.is_empty() {
        bail!("no recognized lead columns in header {:?}", headers);
    }

    let mut leads: Vec<Vec<f64>> = vec![Vec::new(); LEAD_NAMES.len()];
    for (idx, row) in csv.records().enumerate() {
        let row = row.with_context(|| format!("reading CSV row {}", idx + 2))?;
        for &(col, slot) in &columns {
            let Some(cell) = row.get(col) else { continue };
            if cell.is_empty() {
                continue;
            }
            if let Ok(value) = cell.parse::<f64>() {
                leads[slot].push(value);
            }
        }
    }
    WaveformRecord::from_canonical(leads, sampling_rate)
}

pub fn read_record_from_path(path: &Path, sampling_rate: u32) -> Result<WaveformRecord> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_record(file, sampling_rate).with_context(|| format!("parsing ECG CSV {}", path.display()))
}

/// Write the canonical-header 12-column CSV consumed by the external
/// classifier (and produced by the `synth` tool).
pub fn write_payload<W: Write>(record: &WaveformRecord, writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(LEAD_NAMES)
        .context("writing payload header")?;
    for i in 0..record.samples_per_lead {
        let row: Vec<String> = record
            .leads
            .iter()
            .map(|lead| lead[i].to_string())
            .collect();
        csv.write_record(&row)
            .with_context(|| format!("writing payload row {}", i + 1))?;
    }
    csv.flush().context("flushing payload")?;
    Ok(())
}
