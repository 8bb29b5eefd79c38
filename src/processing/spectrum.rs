// src/processing/spectrum.rs
//! One-sided FFT amplitude spectrum
//!
//! Supporting analysis for statistics output and passband verification; the
//! pipeline itself never consults the spectrum.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// One-sided amplitude spectrum of a real signal.
#[derive(Debug, Clone)]
pub struct AmplitudeSpectrum {
    frequencies: Vec<f64>,
    amplitudes: Vec<f64>,
}

impl AmplitudeSpectrum {
    /// Compute the spectrum of `samples` captured at `sample_rate_hz`.
    ///
    /// Amplitudes are scaled so a pure sinusoid of amplitude A reports ~A at
    /// its bin. Empty input yields an empty spectrum.
    pub fn compute(samples: &[f64], sample_rate_hz: f64) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self {
                frequencies: Vec::new(),
                amplitudes: Vec::new(),
            };
        }

        let mut buffer: Vec<Complex<f64>> =
            samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let bins = n / 2 + 1;
        let mut frequencies = Vec::with_capacity(bins);
        let mut amplitudes = Vec::with_capacity(bins);
        for (k, value) in buffer.iter().take(bins).enumerate() {
            let scale = if k == 0 || (n % 2 == 0 && k == n / 2) {
                1.0
            } else {
                2.0
            };
            frequencies.push(k as f64 * sample_rate_hz / n as f64);
            amplitudes.push(scale * value.norm() / n as f64);
        }

        Self {
            frequencies,
            amplitudes,
        }
    }

    /// Bin center frequencies in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Amplitude per bin.
    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    /// `(frequency, amplitude)` of the strongest non-DC bin.
    pub fn dominant_frequency(&self) -> Option<(f64, f64)> {
        self.peak_in_band(f64::EPSILON, f64::INFINITY)
    }

    /// `(frequency, amplitude)` of the strongest bin within `[low_hz, high_hz]`.
    pub fn peak_in_band(&self, low_hz: f64, high_hz: f64) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(&self.amplitudes)
            .filter(|&(&f, _)| f >= low_hz && f <= high_hz)
            .max_by(|x, y| x.1.total_cmp(y.1))
            .map(|(&f, &a)| (f, a))
    }
}
