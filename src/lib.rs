//! emg-pipeline: offline EMG signal processing for movement analysis
//!
//! This library turns a raw electromyography (EMG) amplitude time series into
//! a smoothed muscle-activation envelope. It provides:
//!
//! - An offline processing pipeline: DC-offset removal, zero-phase Butterworth
//!   bandpass filtering, full-wave rectification, envelope extraction
//! - Serial acquisition with port auto-detection and line framing
//! - CSV persistence for recordings and processed output
//! - A deterministic synthetic EMG source for tests and demos
//!
//! # Quick Start
//!
//! ```rust
//! use emg_pipeline::processing::pipeline::{EmgPipeline, PipelineConfig};
//! use emg_pipeline::signal::Signal;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let samples: Vec<f64> = (0..2000)
//!         .map(|i| (2.0 * std::f64::consts::PI * 100.0 * i as f64 / 1000.0).sin())
//!         .collect();
//!     let raw = Signal::new(samples, 1000.0)?;
//!
//!     let pipeline = EmgPipeline::new(PipelineConfig::default());
//!     let bundle = pipeline.process(&raw)?;
//!
//!     let peak = bundle.envelope.samples().iter().cloned().fold(f64::MIN, f64::max);
//!     println!("envelope peak: {peak}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod processing;
pub mod signal;
pub mod simulation;
pub mod storage;

// Re-export commonly used types for convenience
pub use error::{EmgError, EmgResult};
pub use processing::pipeline::{EmgPipeline, PipelineConfig};
pub use processing::ProcessingError;
pub use signal::{ProcessedBundle, Signal};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
