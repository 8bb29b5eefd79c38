// src/processing/envelope.rs
//! Envelope extraction via centered moving average
//!
//! Edge policy: windows that overhang the signal boundary are truncated and
//! the remaining samples averaged, so edge positions carry real (if noisier)
//! values instead of being biased toward zero. This intentionally diverges
//! from zero-fill behavior, which drags the envelope down over the first and
//! last half-window of every recording.

use super::ProcessingError;

/// Envelope window length in samples: `round(window_ms * fs / 1000)`, at
/// least 1.
pub fn envelope_window_samples(window_ms: f64, sample_rate_hz: f64) -> usize {
    ((window_ms * sample_rate_hz / 1000.0).round() as usize).max(1)
}

/// Centered moving average with truncated edge windows.
///
/// For window width `w`, position `i` averages `signal[i - w/2 ..= i + (w-1)/2]`
/// clipped to the signal bounds (even widths put the extra sample on the
/// left, matching centered-rolling conventions). A window of 1 is the
/// identity. Output length equals input length.
///
/// # Errors
///
/// `InvalidSpec` when `window` is zero.
pub fn moving_average(input: &[f64], window: usize) -> Result<Vec<f64>, ProcessingError> {
    if window == 0 {
        return Err(ProcessingError::InvalidSpec(
            "envelope window must be at least 1 sample".to_string(),
        ));
    }
    if window == 1 || input.is_empty() {
        return Ok(input.to_vec());
    }

    let n = input.len();
    let left = window / 2;
    let right = window - 1 - left;

    // Prefix sums make every window O(1) regardless of width.
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut running = 0.0;
    for &v in input {
        running += v;
        prefix.push(running);
    }

    let mut output = Vec::with_capacity(n);
    for i in 0..n {
        let lo = i.saturating_sub(left);
        let hi = (i + right).min(n - 1);
        let count = (hi - lo + 1) as f64;
        output.push((prefix[hi + 1] - prefix[lo]) / count);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_window_samples_rounds() {
        assert_eq!(envelope_window_samples(100.0, 1000.0), 100);
        assert_eq!(envelope_window_samples(100.0, 1015.0), 102); // 101.5 rounds up
        assert_eq!(envelope_window_samples(0.1, 1000.0), 1); // 0.1 -> min 1
        assert_eq!(envelope_window_samples(2.0, 250.0), 1); // 0.5 rounds to 1
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(moving_average(&[1.0, 2.0], 0).is_err());
    }

    #[test]
    fn test_window_one_is_identity() {
        let x = vec![3.0, -1.0, 4.0, -1.5];
        assert_eq!(moving_average(&x, 1).unwrap(), x);
    }

    #[test]
    fn test_odd_window_interior() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = moving_average(&x, 3).unwrap();
        assert_eq!(y[1], 2.0);
        assert_eq!(y[2], 3.0);
        assert_eq!(y[3], 4.0);
    }

    #[test]
    fn test_edges_are_truncated_not_zeroed() {
        let x = vec![4.0, 4.0, 4.0, 4.0, 4.0];
        let y = moving_average(&x, 5).unwrap();
        // Constant input stays constant everywhere, including the edges; a
        // zero-fill policy would report 2.4 and 3.2 at the ends.
        assert!(y.iter().all(|&v| (v - 4.0).abs() < 1e-12));
    }

    #[test]
    fn test_even_window_puts_extra_sample_left() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = moving_average(&x, 4).unwrap();
        // Position 3 averages indices 1..=4.
        assert!((y[3] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_length_preserved_window_larger_than_signal() {
        let x = vec![1.0, 2.0, 3.0];
        let y = moving_average(&x, 10).unwrap();
        assert_eq!(y.len(), 3);
        // Every window truncates to the whole signal.
        assert!(y.iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    proptest! {
        #[test]
        fn test_output_length_matches(
            xs in prop::collection::vec(-1e6f64..1e6, 0..128),
            window in 1usize..32,
        ) {
            let y = moving_average(&xs, window).unwrap();
            prop_assert_eq!(y.len(), xs.len());
        }

        #[test]
        fn test_average_bounded_by_extremes(
            xs in prop::collection::vec(-1e6f64..1e6, 1..128),
            window in 1usize..32,
        ) {
            let lo = xs.iter().cloned().fold(f64::MAX, f64::min);
            let hi = xs.iter().cloned().fold(f64::MIN, f64::max);
            let y = moving_average(&xs, window).unwrap();
            prop_assert!(y.iter().all(|&v| v >= lo - 1e-6 && v <= hi + 1e-6));
        }
    }
}
