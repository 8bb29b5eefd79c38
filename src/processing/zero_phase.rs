// src/processing/zero_phase.rs
//! Zero-phase IIR filtering
//!
//! A single causal IIR pass delays every frequency by a different amount,
//! smearing the timing of muscle-activation onsets. Running the filter
//! forward, then again over the time-reversed output, cancels the phase of
//! the two passes; the net magnitude response is the design's response
//! squared.
//!
//! Edge transients are mitigated by odd-reflection padding: the signal is
//! extended at each end with `3 * (2 * order + 1)` samples mirrored through
//! the edge value (27 samples at the default order 4), filtered, and trimmed
//! back to the input length.

use super::filter_design::FilterCoefficients;
use super::ProcessingError;

/// Padding length the reflection strategy needs on each side.
pub fn pad_len(coeffs: &FilterCoefficients) -> usize {
    3 * coeffs.b.len().max(coeffs.a.len())
}

/// Single causal pass of the filter (Direct Form II transposed).
///
/// Introduces the filter's full phase delay; use [`filtfilt`] for the
/// phase-neutral variant. Public so callers can compare the two.
pub fn lfilter(coeffs: &FilterCoefficients, input: &[f64]) -> Vec<f64> {
    let n = coeffs.b.len().max(coeffs.a.len());
    let a0 = coeffs.a.first().copied().unwrap_or(1.0);
    let b: Vec<f64> = (0..n)
        .map(|i| coeffs.b.get(i).copied().unwrap_or(0.0) / a0)
        .collect();
    let a: Vec<f64> = (0..n)
        .map(|i| coeffs.a.get(i).copied().unwrap_or(0.0) / a0)
        .collect();

    if n < 2 {
        return input.iter().map(|&x| x * b[0]).collect();
    }

    let mut state = vec![0.0; n - 1];
    let mut output = Vec::with_capacity(input.len());
    for &x in input {
        let y = b[0] * x + state[0];
        for k in 1..n - 1 {
            state[k - 1] = b[k] * x + state[k] - a[k] * y;
        }
        state[n - 2] = b[n - 1] * x - a[n - 1] * y;
        output.push(y);
    }
    output
}

/// Apply the filter forward and backward, cancelling its phase delay.
///
/// Output length equals input length.
///
/// # Errors
///
/// `SignalTooShort` when the input is not strictly longer than the padding
/// requirement ([`pad_len`]).
pub fn filtfilt(coeffs: &FilterCoefficients, input: &[f64]) -> Result<Vec<f64>, ProcessingError> {
    let pad = pad_len(coeffs);
    if input.len() <= pad {
        return Err(ProcessingError::SignalTooShort {
            len: input.len(),
            min_len: pad + 1,
        });
    }

    let extended = odd_reflect_pad(input, pad);

    let forward = lfilter(coeffs, &extended);
    let reversed: Vec<f64> = forward.into_iter().rev().collect();
    let backward = lfilter(coeffs, &reversed);

    let mut output: Vec<f64> = backward.into_iter().rev().skip(pad).collect();
    output.truncate(input.len());
    Ok(output)
}

/// Extend the signal by `pad` samples at each end, mirroring through the edge
/// value so the extension is continuous in both value and slope.
fn odd_reflect_pad(input: &[f64], pad: usize) -> Vec<f64> {
    let n = input.len();
    debug_assert!(pad < n);
    let first = input[0];
    let last = input[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * pad);
    for i in (1..=pad).rev() {
        extended.push(2.0 * first - input[i]);
    }
    extended.extend_from_slice(input);
    for i in 1..=pad {
        extended.push(2.0 * last - input[n - 1 - i]);
    }
    extended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::filter_design::{design_bandpass, FilterSpec};
    use std::f64::consts::PI;

    fn coeffs() -> FilterCoefficients {
        design_bandpass(&FilterSpec::new(20.0, 450.0, 1000.0, 4)).unwrap()
    }

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * freq * i as f64 / fs).sin()).collect()
    }

    #[test]
    fn test_length_preserved() {
        let c = coeffs();
        for n in [28, 100, 1000, 2001] {
            let x = sine(100.0, 1000.0, n);
            assert_eq!(filtfilt(&c, &x).unwrap().len(), n);
        }
    }

    #[test]
    fn test_too_short_rejected() {
        let c = coeffs();
        let pad = pad_len(&c);
        assert_eq!(pad, 27);
        let x = vec![0.0; pad];
        match filtfilt(&c, &x) {
            Err(ProcessingError::SignalTooShort { len, min_len }) => {
                assert_eq!(len, pad);
                assert_eq!(min_len, pad + 1);
            }
            other => panic!("expected SignalTooShort, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_phase_on_passband_sine() {
        // Peak positions of a passband sinusoid must line up between input
        // and output; a causal pass of the same filter must not.
        let c = coeffs();
        let fs = 1000.0;
        let x = sine(100.0, fs, 2000);

        let zero_phase = filtfilt(&c, &x).unwrap();
        let causal = lfilter(&c, &x);

        let peak_of = |s: &[f64], from: usize, to: usize| {
            (from..to)
                .max_by(|&i, &j| s[i].partial_cmp(&s[j]).unwrap())
                .unwrap()
        };

        // Look inside one period around a mid-signal crest (period = 10
        // samples at 100 Hz / 1000 Hz).
        let input_peak = peak_of(&x, 998, 1008);
        let filtered_peak = peak_of(&zero_phase, 998, 1008);
        assert!(
            (input_peak as i64 - filtered_peak as i64).abs() <= 1,
            "zero-phase output lagged: {input_peak} vs {filtered_peak}"
        );

        // The causal pass shifts energy later; correlate against the input to
        // show a nonzero lag where filtfilt has none.
        let lag_corr = |s: &[f64], lag: usize| -> f64 {
            (0..s.len() - lag).map(|i| x[i] * s[i + lag]).sum()
        };
        assert!(lag_corr(&zero_phase, 0) > lag_corr(&causal, 0));
    }

    #[test]
    fn test_passband_amplitude_roughly_preserved() {
        let c = coeffs();
        let x = sine(100.0, 1000.0, 2000);
        let y = filtfilt(&c, &x).unwrap();
        let peak = y[500..1500].iter().cloned().fold(f64::MIN, f64::max);
        assert!((peak - 1.0).abs() < 0.05, "passband peak {peak}");
    }

    #[test]
    fn test_stopband_drift_removed() {
        let c = coeffs();
        let fs = 1000.0;
        let n = 2000;
        let x: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 0.1 * i as f64 / fs).sin() * 5000.0)
            .collect();
        let y = filtfilt(&c, &x).unwrap();
        let peak = y[200..1800].iter().cloned().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(peak < 50.0, "drift survived filtering: {peak}");
    }

    #[test]
    fn test_odd_reflect_pad_shape() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ext = odd_reflect_pad(&x, 2);
        assert_eq!(ext, vec![-1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    proptest::proptest! {
        #[test]
        fn test_filtfilt_preserves_length_for_any_signal(
            xs in proptest::collection::vec(-1e4f64..1e4, 28..400),
        ) {
            let c = coeffs();
            let y = filtfilt(&c, &xs).unwrap();
            proptest::prop_assert_eq!(y.len(), xs.len());
        }
    }
}
