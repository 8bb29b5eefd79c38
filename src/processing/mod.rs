// src/processing/mod.rs
//! Offline signal processing pipeline for EMG data

pub mod envelope;
pub mod filter_design;
pub mod pipeline;
pub mod rectify;
pub mod spectrum;
pub mod zero_phase;

pub use envelope::{envelope_window_samples, moving_average};
pub use filter_design::{design_bandpass, FilterCoefficients, FilterSpec};
pub use rectify::rectify;
pub use spectrum::AmplitudeSpectrum;
pub use zero_phase::{filtfilt, lfilter};

use thiserror::Error;

/// Errors raised by the processing stages.
///
/// Every stage is all-or-nothing: on failure, no caller-owned data has been
/// mutated and no partial result is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    /// Cutoff/sample-rate combination cannot produce a valid normalized band.
    #[error("invalid filter spec: {0}")]
    InvalidSpec(String),

    /// Input shorter than the zero-phase filter's padding requirement.
    #[error("signal too short for zero-phase filtering: {len} samples, need at least {min_len}")]
    SignalTooShort {
        /// Length of the offending signal.
        len: usize,
        /// Minimum length the padding strategy requires.
        min_len: usize,
    },

    /// Zero-length input; the DC-offset mean is undefined.
    #[error("empty signal: mean over zero samples is undefined")]
    EmptySignal,
}
