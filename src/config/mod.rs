// src/config/mod.rs
//! Configuration management
//!
//! One explicit record per subsystem, merged into [`EmgConfig`]. Everything
//! has a serde default so a partial TOML file (or none at all) yields the
//! standard EMG parameters from [`constants`].

pub mod constants;
pub mod loader;

pub use loader::{load_config, load_or_default, ConfigError};

use serde::{Deserialize, Serialize};

use crate::acquisition::RecorderConfig;
use crate::processing::pipeline::PipelineConfig;

/// Complete tool configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmgConfig {
    /// Processing pipeline parameters.
    #[serde(default)]
    pub processing: PipelineConfig,

    /// Serial recorder parameters.
    #[serde(default)]
    pub recording: RecorderConfig,
}

impl EmgConfig {
    /// Validate cross-field consistency, returning every problem found.
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let p = &self.processing;

        if p.sample_rate_hz <= 0.0 {
            errors.push(format!(
                "sample rate must be positive, got {}",
                p.sample_rate_hz
            ));
        }
        if p.bandpass_low_hz >= p.bandpass_high_hz {
            errors.push(format!(
                "bandpass low cutoff ({} Hz) must be below high cutoff ({} Hz)",
                p.bandpass_low_hz, p.bandpass_high_hz
            ));
        }
        let nyquist = p.sample_rate_hz / 2.0;
        if p.bandpass_high_hz >= nyquist {
            errors.push(format!(
                "bandpass high cutoff ({} Hz) must be below the Nyquist frequency ({} Hz)",
                p.bandpass_high_hz, nyquist
            ));
        }
        if p.filter_order == 0 || p.filter_order > constants::filters::MAX_FILTER_ORDER {
            errors.push(format!(
                "filter order must be 1-{}, got {}",
                constants::filters::MAX_FILTER_ORDER,
                p.filter_order
            ));
        }
        if p.envelope_window_ms <= 0.0 {
            errors.push(format!(
                "envelope window must be positive, got {} ms",
                p.envelope_window_ms
            ));
        }
        if self.recording.baud_rate == 0 {
            errors.push("baud rate must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_consistent() {
        assert!(EmgConfig::default().validate_consistency().is_ok());
    }

    #[test]
    fn test_inverted_band_flagged() {
        let mut config = EmgConfig::default();
        config.processing.bandpass_low_hz = 500.0;
        let errors = config.validate_consistency().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("below high cutoff")));
    }

    #[test]
    fn test_cutoff_above_nyquist_flagged() {
        let mut config = EmgConfig::default();
        config.processing.sample_rate_hz = 500.0;
        let errors = config.validate_consistency().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Nyquist")));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EmgConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: EmgConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: EmgConfig = toml::from_str(
            "[processing]\nbandpass_high_hz = 400.0\n",
        )
        .unwrap();
        assert_eq!(parsed.processing.bandpass_high_hz, 400.0);
        assert_eq!(parsed.processing.bandpass_low_hz, 20.0);
        assert_eq!(parsed.processing.sample_rate_hz, 1000.0);
    }
}
