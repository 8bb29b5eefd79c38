// src/processing/filter_design.rs
//! Butterworth bandpass filter design
//!
//! Owned implementation of the classical digital Butterworth bandpass
//! construction: analog lowpass prototype poles, lowpass-to-bandpass
//! transform, bilinear transform, polynomial expansion. Coefficients come out
//! in transfer-function form (`b`, `a`), ready for [`crate::processing::zero_phase`].

use std::f64::consts::PI;

use num_complex::Complex64;

use super::ProcessingError;
use crate::config::constants::filters::{
    DEFAULT_BANDPASS_HIGH_HZ, DEFAULT_BANDPASS_LOW_HZ, DEFAULT_FILTER_ORDER, MAX_FILTER_ORDER,
};
use crate::config::constants::signal::DEFAULT_SAMPLE_RATE_HZ;

/// Bandpass design parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Low cutoff in Hz.
    pub low_cutoff_hz: f64,
    /// High cutoff in Hz.
    pub high_cutoff_hz: f64,
    /// Sample rate in Hz.
    pub sample_rate_hz: f64,
    /// Prototype order; the bandpass ends up at twice this order.
    pub order: usize,
}

impl FilterSpec {
    /// Spec with the given cutoffs at the configured sample rate.
    pub fn new(low_cutoff_hz: f64, high_cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> Self {
        Self {
            low_cutoff_hz,
            high_cutoff_hz,
            sample_rate_hz,
            order,
        }
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            low_cutoff_hz: DEFAULT_BANDPASS_LOW_HZ,
            high_cutoff_hz: DEFAULT_BANDPASS_HIGH_HZ,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            order: DEFAULT_FILTER_ORDER,
        }
    }
}

/// Transfer-function coefficients of the designed filter.
///
/// Feedforward `b` and feedback `a`, both of length `2 * order + 1`, with
/// `a[0] == 1`. Produced once per [`FilterSpec`], immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    /// Feedforward (numerator) coefficients.
    pub b: Vec<f64>,
    /// Feedback (denominator) coefficients, `a[0] == 1`.
    pub a: Vec<f64>,
}

impl FilterCoefficients {
    /// Magnitude of the frequency response at `freq_hz`.
    ///
    /// Evaluates `H(e^{jw})` on the unit circle; used for design diagnostics
    /// and passband verification.
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate_hz: f64) -> f64 {
        let w = 2.0 * PI * freq_hz / sample_rate_hz;
        let num = evaluate_at(&self.b, w);
        let den = evaluate_at(&self.a, w);
        (num / den).norm()
    }
}

fn evaluate_at(coeffs: &[f64], w: f64) -> Complex64 {
    coeffs
        .iter()
        .enumerate()
        .map(|(k, &c)| Complex64::from_polar(1.0, -w * k as f64) * c)
        .sum()
}

/// Design a stable Butterworth bandpass filter for the given spec.
///
/// Cutoffs are normalized to the Nyquist frequency and clamped before design:
/// low into `[0.001, 0.99]`, then high into `[low + 0.01, 0.99]`. Clamping in
/// this order keeps the band valid for degenerate-but-orderable inputs; a
/// spec whose clamped band still collapses is rejected.
///
/// # Errors
///
/// `InvalidSpec` when `low >= high` before clamping, the sample rate is not
/// positive, or the order is outside 1..=8.
pub fn design_bandpass(spec: &FilterSpec) -> Result<FilterCoefficients, ProcessingError> {
    let (zeros, poles, gain) = design_bandpass_zpk(spec)?;

    let b: Vec<f64> = polynomial_from_roots(&zeros)
        .into_iter()
        .map(|c| c * gain)
        .collect();
    let a = polynomial_from_roots(&poles);

    Ok(FilterCoefficients { b, a })
}

/// Z-plane pole locations of the designed filter.
///
/// All poles of a valid design lie strictly inside the unit circle; exposed
/// so callers (and the stability tests) can verify that directly.
pub fn bandpass_poles(spec: &FilterSpec) -> Result<Vec<Complex64>, ProcessingError> {
    design_bandpass_zpk(spec).map(|(_, poles, _)| poles)
}

/// Zero/pole/gain form of the design, before polynomial expansion.
fn design_bandpass_zpk(
    spec: &FilterSpec,
) -> Result<(Vec<Complex64>, Vec<Complex64>, f64), ProcessingError> {
    if !spec.sample_rate_hz.is_finite() || spec.sample_rate_hz <= 0.0 {
        return Err(ProcessingError::InvalidSpec(format!(
            "sample rate must be positive, got {}",
            spec.sample_rate_hz
        )));
    }
    if spec.order == 0 || spec.order > MAX_FILTER_ORDER {
        return Err(ProcessingError::InvalidSpec(format!(
            "filter order must be 1-{MAX_FILTER_ORDER}, got {}",
            spec.order
        )));
    }
    if !spec.low_cutoff_hz.is_finite()
        || !spec.high_cutoff_hz.is_finite()
        || spec.low_cutoff_hz >= spec.high_cutoff_hz
    {
        return Err(ProcessingError::InvalidSpec(format!(
            "low cutoff ({} Hz) must be below high cutoff ({} Hz)",
            spec.low_cutoff_hz, spec.high_cutoff_hz
        )));
    }

    let nyquist = spec.sample_rate_hz / 2.0;
    let low = (spec.low_cutoff_hz / nyquist).min(0.99).max(0.001);
    let high = (spec.high_cutoff_hz / nyquist).min(0.99).max(low + 0.01);

    // Only reachable when the low edge lands on the 0.99 rail.
    if high >= 1.0 {
        return Err(ProcessingError::InvalidSpec(format!(
            "band [{:.4}, {:.4}] collapses against the Nyquist frequency",
            low, high
        )));
    }

    let n = spec.order;

    // Analog Butterworth lowpass prototype: n poles equally spaced on the
    // left half of the unit circle, no finite zeros, unit gain.
    let prototype: Vec<Complex64> = (0..n)
        .map(|k| {
            let m = 2.0 * k as f64 - (n as f64 - 1.0);
            -Complex64::from_polar(1.0, PI * m / (2.0 * n as f64))
        })
        .collect();

    // Pre-warp the band edges for the bilinear transform (internal rate 2).
    let fs = 2.0;
    let warped_low = 2.0 * fs * (PI * low / fs).tan();
    let warped_high = 2.0 * fs * (PI * high / fs).tan();
    let bandwidth = warped_high - warped_low;
    let center = (warped_low * warped_high).sqrt();

    // Lowpass-to-bandpass transform: each prototype pole splits into a
    // conjugate pair around the center frequency; n zeros land at s = 0.
    let center_sq = Complex64::new(center * center, 0.0);
    let mut analog_poles = Vec::with_capacity(2 * n);
    for &p in &prototype {
        let scaled = p * (bandwidth / 2.0);
        let offset = (scaled * scaled - center_sq).sqrt();
        analog_poles.push(scaled + offset);
        analog_poles.push(scaled - offset);
    }
    let analog_zeros = vec![Complex64::new(0.0, 0.0); n];
    let analog_gain = bandwidth.powi(n as i32);

    // Bilinear transform into the z-plane. Left-half-plane poles map strictly
    // inside the unit circle, which is what makes the design stable.
    let fs2 = Complex64::new(2.0 * fs, 0.0);
    let mut num = Complex64::new(1.0, 0.0);
    let mut den = Complex64::new(1.0, 0.0);
    for &z in &analog_zeros {
        num *= fs2 - z;
    }
    for &p in &analog_poles {
        den *= fs2 - p;
    }
    let gain = analog_gain * (num / den).re;

    let mut zeros: Vec<Complex64> = analog_zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    // Analog zeros at infinity map to z = -1.
    zeros.resize(analog_poles.len(), Complex64::new(-1.0, 0.0));
    let poles: Vec<Complex64> = analog_poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();

    Ok((zeros, poles, gain))
}

/// Expand a monic polynomial from its roots, keeping the real parts.
///
/// Roots arrive in conjugate pairs, so the imaginary residue is numerical
/// noise only.
fn polynomial_from_roots(roots: &[Complex64]) -> Vec<f64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let lower = coeffs[i - 1];
            coeffs[i] -= root * lower;
        }
    }
    coeffs.into_iter().map(|c| c.re).collect()
}
