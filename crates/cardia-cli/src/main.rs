use anyhow::{anyhow, Context, Result};
use cardia_lib::{
    analysis::analyze,
    classify::{ClassifierFusion, ProcessClassifier},
    config::EngineConfig,
    detectors::DetectorKind,
    io::csv as csv_io,
    record::WaveformRecord,
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cardia", version, about = "Cardia: ECG analysis engine tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DetectorArg {
    Envelope,
    Threshold,
}

impl From<DetectorArg> for DetectorKind {
    fn from(arg: DetectorArg) -> Self {
        match arg {
            DetectorArg::Envelope => DetectorKind::Envelope,
            DetectorArg::Threshold => DetectorKind::Threshold,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a 12-lead CSV and print the analysis report as JSON
    Analyze {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = csv_io::DEFAULT_SAMPLING_RATE)]
        fs: u32,
        #[arg(long, value_enum, default_value_t = DetectorArg::Envelope)]
        detector: DetectorArg,
    },
    /// Classify a 12-lead CSV, optionally through an external model command
    Classify {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = csv_io::DEFAULT_SAMPLING_RATE)]
        fs: u32,
        /// Predictor program invoked with the payload CSV path
        #[arg(long)]
        model_cmd: Option<String>,
        #[arg(long, default_value_t = 30)]
        model_timeout_s: u64,
    },
    /// Print detected R-peak sample indices, one per line
    FindRpeaks {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = csv_io::DEFAULT_SAMPLING_RATE)]
        fs: u32,
        #[arg(long, value_enum, default_value_t = DetectorArg::Envelope)]
        detector: DetectorArg,
        #[arg(long, default_value = "II")]
        lead: String,
    },
    /// Generate a deterministic synthetic 12-lead recording
    Synth {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = csv_io::DEFAULT_SAMPLING_RATE)]
        fs: u32,
        #[arg(long, default_value_t = 10.0)]
        duration: f64,
        #[arg(long, default_value_t = 75.0)]
        bpm: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            input,
            fs,
            detector,
        } => {
            let record = csv_io::read_record_from_path(&input, fs)?;
            let report = analyze(&record, &EngineConfig::default(), detector.into());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Classify {
            input,
            fs,
            model_cmd,
            model_timeout_s,
        } => {
            let record = csv_io::read_record_from_path(&input, fs)?;
            let config = EngineConfig {
                model_timeout: Duration::from_secs(model_timeout_s),
                ..EngineConfig::default()
            };
            let timeout = config.model_timeout;
            let mut fusion = ClassifierFusion::new(config);
            if let Some(program) = model_cmd {
                fusion = fusion.with_model(Box::new(ProcessClassifier::new(program, timeout)));
            }
            let result = fusion.classify(&record);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::FindRpeaks {
            input,
            fs,
            detector,
            lead,
        } => {
            let record = csv_io::read_record_from_path(&input, fs)?;
            let ts = record
                .series(&lead)
                .ok_or_else(|| anyhow!("unknown lead name: {lead}"))?;
            let kind: DetectorKind = detector.into();
            let events = kind.build().detect(&ts, &EngineConfig::default());
            for index in events.indices {
                println!("{index}");
            }
        }
        Commands::Synth {
            out,
            fs,
            duration,
            bpm,
            seed,
        } => {
            let record = synth_record(fs, duration, bpm, seed)?;
            let file = File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            csv_io::write_payload(&record, file)?;
            eprintln!(
                "wrote {} samples per lead at {} Hz to {}",
                record.samples_per_lead,
                record.sampling_rate,
                out.display()
            );
        }
    }
    Ok(())
}

/// Relative R-wave amplitude per canonical lead; aVR is inverted as on a
/// real 12-lead recording.
const LEAD_GAIN: [f64; 12] = [
    0.6, 1.0, 0.4, -0.5, 0.3, 0.5, 0.2, 0.4, 0.7, 0.9, 0.8, 0.7,
];

fn synth_record(fs: u32, duration: f64, bpm: f64, seed: u64) -> Result<WaveformRecord> {
    if bpm <= 0.0 || duration <= 0.0 {
        anyhow::bail!("duration and bpm must be positive");
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let period = 60.0 / bpm;
    let mut beats = Vec::new();
    let mut t = 0.5;
    while t < duration {
        beats.push(t);
        t += period;
    }
    let samples = (duration * fs as f64) as usize;
    let mut leads = Vec::with_capacity(LEAD_GAIN.len());
    for gain in LEAD_GAIN {
        let mut data = Vec::with_capacity(samples);
        for i in 0..samples {
            let time = i as f64 / fs as f64;
            // Baseline wander plus a narrow Gaussian bump per beat.
            let mut v = 0.05 * (2.0 * std::f64::consts::PI * time).sin();
            for &beat in &beats {
                let width = 0.02;
                v += gain * 1.2 * (-0.5 * ((time - beat) / width).powi(2)).exp();
            }
            v += rng.gen_range(-0.01..0.01);
            data.push(v);
        }
        leads.push(data);
    }
    WaveformRecord::from_canonical(leads, fs)
}
