// src/simulation/mod.rs
//! Synthetic EMG source
//!
//! Generates an EMG-like amplitude trace without hardware: a carrier burst
//! that gates on and off like repeated contractions, a slow baseline drift
//! standing in for motion artifact, and broadband noise. Seeded, so tests
//! and benches get identical traces on every run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::config::constants::signal::DEFAULT_SAMPLE_RATE_HZ;
use crate::processing::ProcessingError;
use crate::signal::Signal;

/// Parameters of the synthetic trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Sample rate in Hz.
    pub sample_rate_hz: f64,
    /// Carrier frequency inside the EMG band, in Hz.
    pub burst_frequency_hz: f64,
    /// Carrier amplitude during a contraction.
    pub burst_amplitude: f64,
    /// Contraction cycle length in seconds.
    pub burst_period_s: f64,
    /// Fraction of each cycle spent contracted, in `(0, 1]`.
    pub burst_duty: f64,
    /// Baseline drift amplitude.
    pub drift_amplitude: f64,
    /// Baseline drift frequency in Hz, well below the EMG band.
    pub drift_frequency_hz: f64,
    /// Peak amplitude of the uniform broadband noise.
    pub noise_amplitude: f64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            burst_frequency_hz: 110.0,
            burst_amplitude: 800.0,
            burst_period_s: 2.0,
            burst_duty: 0.4,
            drift_amplitude: 300.0,
            drift_frequency_hz: 0.2,
            noise_amplitude: 25.0,
            seed: 0x454d47,
        }
    }
}

/// Deterministic generator of synthetic EMG samples.
pub struct SyntheticEmg {
    config: SyntheticConfig,
    rng: StdRng,
    index: u64,
}

impl SyntheticEmg {
    /// Generator seeded from the config.
    pub fn new(config: SyntheticConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            index: 0,
        }
    }

    /// Generator with default parameters.
    pub fn with_defaults() -> Self {
        Self::new(SyntheticConfig::default())
    }

    /// Produce the next sample.
    pub fn next_sample(&mut self) -> f64 {
        let c = &self.config;
        let t = self.index as f64 / c.sample_rate_hz;
        self.index += 1;

        let phase_in_cycle = (t / c.burst_period_s).fract();
        let contracted = phase_in_cycle < c.burst_duty;
        let carrier = if contracted {
            c.burst_amplitude * (2.0 * PI * c.burst_frequency_hz * t).sin()
        } else {
            0.0
        };

        let drift = c.drift_amplitude * (2.0 * PI * c.drift_frequency_hz * t).sin();
        let noise = self.rng.gen_range(-c.noise_amplitude..=c.noise_amplitude);

        carrier + drift + noise
    }

    /// Produce `n` samples.
    pub fn generate(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.next_sample()).collect()
    }

    /// Produce `n` samples wrapped as a [`Signal`].
    pub fn generate_signal(&mut self, n: usize) -> Result<Signal, ProcessingError> {
        let rate = self.config.sample_rate_hz;
        Signal::new(self.generate(n), rate)
    }

    /// Render `n` samples the way the device would frame them on the wire:
    /// one rounded integer per line. Lets acquisition tests run the full
    /// decode path without hardware.
    pub fn generate_wire_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(n * 6);
        for _ in 0..n {
            let value = self.next_sample().round() as i64;
            bytes.extend_from_slice(value.to_string().as_bytes());
            bytes.push(b'\n');
        }
        bytes
    }
}
