//! External classifier capability. The engine treats the model as a black
//! box behind a trait so fusion can be tested without a process and so the
//! model technology can change without touching fusion.

use crate::io::csv::write_payload;
use crate::record::WaveformRecord;
use log::debug;
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Probabilities keyed by the model's own label names.
pub type LabelProbs = Vec<(String, f64)>;

/// Recoverable failures of an external classifier invocation. Fusion never
/// surfaces these to the caller; it falls back to the rule-based path.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("classifier unavailable: {0}")]
    Unavailable(#[source] std::io::Error),
    #[error("failed to stage classifier payload: {0}")]
    Payload(String),
    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),
    #[error("classifier exited with {0}")]
    NonZeroExit(ExitStatus),
    #[error("classifier output contained no label probabilities")]
    MalformedOutput,
}

pub trait ExternalClassifier: Send + Sync {
    /// Produce a probability per model label for the given record.
    fn predict(&self, record: &WaveformRecord) -> Result<LabelProbs, ModelError>;
}

/// Process-backed classifier: stages the record as a temporary 12-column CSV,
/// invokes a predictor program with the path as its final argument, and
/// parses `<label>: <probability>` lines from stdout. Bounded by a wall-clock
/// timeout; the payload file is removed on every exit path.
#[derive(Debug, Clone)]
pub struct ProcessClassifier {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    poll_interval: Duration,
}

impl ProcessClassifier {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Arguments inserted before the payload path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl ExternalClassifier for ProcessClassifier {
    fn predict(&self, record: &WaveformRecord) -> Result<LabelProbs, ModelError> {
        // Dropped on every return below, which unlinks the file.
        let payload = tempfile::Builder::new()
            .prefix("cardia-payload-")
            .suffix(".csv")
            .tempfile()
            .map_err(|e| ModelError::Payload(e.to_string()))?;
        write_payload(record, payload.as_file())
            .map_err(|e| ModelError::Payload(format!("{e:#}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(payload.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(ModelError::Unavailable)?;
        debug!(
            "external classifier started: {} {}",
            self.program,
            payload.path().display()
        );

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ModelError::Timeout(self.timeout));
                    }
                    std::thread::sleep(self.poll_interval);
                }
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ModelError::Unavailable(err));
                }
            }
        };

        // Model output is a handful of label lines, well within the pipe
        // buffer, so reading after exit is safe.
        let mut stdout = String::new();
        if let Some(mut pipe) = child.stdout.take() {
            pipe.read_to_string(&mut stdout)
                .map_err(ModelError::Unavailable)?;
        }
        if !status.success() {
            return Err(ModelError::NonZeroExit(status));
        }
        let probs = parse_label_probs(&stdout);
        if probs.is_empty() {
            return Err(ModelError::MalformedOutput);
        }
        Ok(probs)
    }
}

/// Parse `<label>: <probability>` lines. Lines that do not match, or whose
/// probability is not a real number in [0, 1], are ignored.
pub fn parse_label_probs(output: &str) -> LabelProbs {
    let mut probs = Vec::new();
    for line in output.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let label = label.trim();
        let Ok(p) = value.trim().parse::<f64>() else {
            continue;
        };
        if label.is_empty() || !p.is_finite() || !(0.0..=1.0).contains(&p) {
            continue;
        }
        probs.push((label.to_string(), p));
    }
    probs
}
