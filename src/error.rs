// src/error.rs
//! Unified error handling for the EMG pipeline
//!
//! Every subsystem defines its own error enum next to the code that raises it;
//! this module ties them together so callers that cross subsystem boundaries
//! (the binaries, mostly) can hold a single error type.

use thiserror::Error;

use crate::acquisition::AcquisitionError;
use crate::config::ConfigError;
use crate::processing::ProcessingError;
use crate::storage::StorageError;

/// Unified error type spanning all subsystems.
#[derive(Debug, Error)]
pub enum EmgError {
    /// Signal processing failure (invalid filter spec, short or empty signal).
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// Serial acquisition failure.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// Recording persistence failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration loading failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for operations that may cross subsystem boundaries.
pub type EmgResult<T> = Result<T, EmgError>;
