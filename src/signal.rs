// src/signal.rs
//! Core signal types shared across the pipeline

use serde::{Deserialize, Serialize};

use crate::processing::ProcessingError;

/// An ordered, finite sequence of samples with an associated sample rate.
///
/// The sample rate is validated at construction and is the only invariant the
/// type enforces; zero-length signals are representable (the pipeline rejects
/// them at its entry point instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate_hz: f64,
}

impl Signal {
    /// Create a signal, rejecting non-finite or non-positive sample rates.
    pub fn new(samples: Vec<f64>, sample_rate_hz: f64) -> Result<Self, ProcessingError> {
        if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
            return Err(ProcessingError::InvalidSpec(format!(
                "sample rate must be positive and finite, got {sample_rate_hz}"
            )));
        }
        Ok(Self {
            samples,
            sample_rate_hz,
        })
    }

    /// Build a signal from parts already known to satisfy the invariants.
    pub(crate) fn from_validated(samples: Vec<f64>, sample_rate_hz: f64) -> Self {
        Self {
            samples,
            sample_rate_hz,
        }
    }

    /// Sample values in acquisition order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the signal holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Recording duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate_hz
    }

    /// Time axis in seconds (`index / sample_rate`), as consumed by plotting
    /// collaborators.
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.samples.len())
            .map(|i| i as f64 / self.sample_rate_hz)
            .collect()
    }

    /// Consume the signal, returning the sample buffer.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// The four parallel signals produced by one pipeline invocation.
///
/// All four have the same length as the input. Intermediates are kept because
/// downstream inspection and plotting need them, not just the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBundle {
    /// Input with its DC offset removed.
    pub centered: Signal,
    /// Zero-phase bandpass-filtered signal.
    pub filtered: Signal,
    /// Full-wave rectified signal.
    pub rectified: Signal,
    /// Smoothed muscle-activation envelope.
    pub envelope: Signal,
}

impl ProcessedBundle {
    /// Length of each contained signal.
    pub fn len(&self) -> usize {
        self.centered.len()
    }

    /// True when the bundle holds zero-length signals.
    pub fn is_empty(&self) -> bool {
        self.centered.is_empty()
    }
}
