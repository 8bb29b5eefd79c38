// src/processing/pipeline.rs
//! Pipeline orchestration: center -> filter -> rectify -> smooth

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::envelope::{envelope_window_samples, moving_average};
use super::filter_design::{design_bandpass, FilterSpec};
use super::rectify::rectify;
use super::zero_phase::filtfilt;
use super::ProcessingError;
use crate::signal::{ProcessedBundle, Signal};

/// Processing parameters with the standard EMG defaults.
///
/// The sample rate here is the configured default for signals that arrive
/// without one (CSV files); a [`Signal`]'s own rate always wins during
/// processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Default sample rate in Hz for recordings that do not carry one.
    #[serde(default = "defaults::sample_rate_hz")]
    pub sample_rate_hz: f64,

    /// Bandpass low cutoff in Hz (removes motion artifacts).
    #[serde(default = "defaults::bandpass_low_hz")]
    pub bandpass_low_hz: f64,

    /// Bandpass high cutoff in Hz (removes high-frequency noise).
    #[serde(default = "defaults::bandpass_high_hz")]
    pub bandpass_high_hz: f64,

    /// Butterworth prototype order.
    #[serde(default = "defaults::filter_order")]
    pub filter_order: usize,

    /// Envelope moving-average window in milliseconds.
    #[serde(default = "defaults::envelope_window_ms")]
    pub envelope_window_ms: f64,
}

mod defaults {
    use crate::config::constants::{envelope, filters, signal};

    pub fn sample_rate_hz() -> f64 {
        signal::DEFAULT_SAMPLE_RATE_HZ
    }
    pub fn bandpass_low_hz() -> f64 {
        filters::DEFAULT_BANDPASS_LOW_HZ
    }
    pub fn bandpass_high_hz() -> f64 {
        filters::DEFAULT_BANDPASS_HIGH_HZ
    }
    pub fn filter_order() -> usize {
        filters::DEFAULT_FILTER_ORDER
    }
    pub fn envelope_window_ms() -> f64 {
        envelope::DEFAULT_WINDOW_MS
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: defaults::sample_rate_hz(),
            bandpass_low_hz: defaults::bandpass_low_hz(),
            bandpass_high_hz: defaults::bandpass_high_hz(),
            filter_order: defaults::filter_order(),
            envelope_window_ms: defaults::envelope_window_ms(),
        }
    }
}

/// The offline EMG processing pipeline.
///
/// Stateless between invocations: every call designs its filter from the
/// signal's sample rate and the configured cutoffs, so one pipeline can serve
/// recordings captured at different rates.
#[derive(Debug, Clone)]
pub struct EmgPipeline {
    config: PipelineConfig,
}

impl EmgPipeline {
    /// Pipeline with the given parameters.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Pipeline parameters.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the four stages over a complete recording.
    ///
    /// Strictly ordered: DC-offset removal, zero-phase bandpass filtering,
    /// full-wave rectification, envelope smoothing. All four signals come
    /// back so callers can inspect the intermediates.
    ///
    /// # Errors
    ///
    /// `EmptySignal` for zero-length input, `InvalidSpec` if the configured
    /// band is unusable at the signal's sample rate, `SignalTooShort` if the
    /// recording cannot support the zero-phase padding.
    pub fn process(&self, raw: &Signal) -> Result<ProcessedBundle, ProcessingError> {
        if raw.is_empty() {
            return Err(ProcessingError::EmptySignal);
        }
        let fs = raw.sample_rate_hz();

        let mean = raw.samples().iter().sum::<f64>() / raw.len() as f64;
        let centered: Vec<f64> = raw.samples().iter().map(|&x| x - mean).collect();

        let spec = FilterSpec::new(
            self.config.bandpass_low_hz,
            self.config.bandpass_high_hz,
            fs,
            self.config.filter_order,
        );
        let coeffs = design_bandpass(&spec)?;
        debug!(
            samples = raw.len(),
            sample_rate_hz = fs,
            low_hz = spec.low_cutoff_hz,
            high_hz = spec.high_cutoff_hz,
            "bandpass designed"
        );

        let filtered = filtfilt(&coeffs, &centered)?;
        let rectified = rectify(&filtered);

        let window = envelope_window_samples(self.config.envelope_window_ms, fs);
        let envelope = moving_average(&rectified, window)?;

        Ok(ProcessedBundle {
            centered: Signal::from_validated(centered, fs),
            filtered: Signal::from_validated(filtered, fs),
            rectified: Signal::from_validated(rectified, fs),
            envelope: Signal::from_validated(envelope, fs),
        })
    }

    /// Process independent recordings in parallel.
    ///
    /// Each invocation is side-effect-free, so recordings fan out across a
    /// thread pool; results come back in input order.
    pub fn process_batch(&self, signals: &[Signal]) -> Vec<Result<ProcessedBundle, ProcessingError>> {
        signals.par_iter().map(|s| self.process(s)).collect()
    }
}
