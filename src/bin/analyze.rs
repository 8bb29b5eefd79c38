// src/bin/analyze.rs
//! Process a recorded EMG CSV: filter, rectify, extract the envelope, and
//! write the derived columns next to the original data.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use emg_pipeline::config::load_or_default;
use emg_pipeline::processing::pipeline::EmgPipeline;
use emg_pipeline::processing::AmplitudeSpectrum;
use emg_pipeline::storage::{load_recording, processed_path, save_processed};

#[derive(Parser)]
#[command(name = "emg-analyze", about = "Process an EMG recording into a muscle-activation envelope")]
struct Args {
    /// Recording CSV produced by emg-record
    input: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sample rate override in Hz
    #[arg(long)]
    rate: Option<f64>,

    /// Bandpass low cutoff override in Hz
    #[arg(long)]
    low: Option<f64>,

    /// Bandpass high cutoff override in Hz
    #[arg(long)]
    high: Option<f64>,

    /// Envelope window override in milliseconds
    #[arg(long)]
    window: Option<f64>,

    /// Output CSV path (defaults to <input>_processed.csv)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    println!();
    println!("==================================================");
    println!("  EMG Signal Analyzer");
    println!("==================================================");

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(rate) = args.rate {
        config.processing.sample_rate_hz = rate;
    }
    if let Some(low) = args.low {
        config.processing.bandpass_low_hz = low;
    }
    if let Some(high) = args.high {
        config.processing.bandpass_high_hz = high;
    }
    if let Some(window) = args.window {
        config.processing.envelope_window_ms = window;
    }
    if let Err(errors) = config.validate_consistency() {
        for error in &errors {
            eprintln!("  config: {error}");
        }
        return Err("invalid configuration".into());
    }
    let processing = config.processing;

    println!("  Loading {}...", args.input.display());
    let recording = load_recording(&args.input)?;
    println!("  Loaded {} samples", recording.len());

    println!();
    println!("  Sample rate: {} Hz", processing.sample_rate_hz);
    println!(
        "  Bandpass: {}-{} Hz",
        processing.bandpass_low_hz, processing.bandpass_high_hz
    );
    println!("  Envelope window: {} ms", processing.envelope_window_ms);

    let raw = recording.to_signal(processing.sample_rate_hz)?;
    let sample_rate_hz = raw.sample_rate_hz();
    let pipeline = EmgPipeline::new(processing);
    let bundle = pipeline.process(&raw)?;

    let (raw_min, raw_max) = min_max(raw.samples());
    let (env_min, env_max) = min_max(bundle.envelope.samples());
    println!();
    println!("  Signal Statistics:");
    println!(
        "    Raw - Min: {raw_min:.0}, Max: {raw_max:.0}, Range: {:.0}",
        raw_max - raw_min
    );
    println!("    Envelope - Min: {env_min:.1}, Max: {env_max:.1}");
    if let Some((freq, _)) =
        AmplitudeSpectrum::compute(bundle.filtered.samples(), sample_rate_hz).dominant_frequency()
    {
        println!("    Dominant frequency (filtered): {freq:.1} Hz");
    }

    let output = args
        .output
        .unwrap_or_else(|| processed_path(&args.input));
    save_processed(&output, &recording, &bundle)?;
    println!();
    println!("  Processed data saved to: {}", output.display());
    println!("==================================================");
    println!();

    Ok(())
}

fn min_max(samples: &[f64]) -> (f64, f64) {
    samples.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}
