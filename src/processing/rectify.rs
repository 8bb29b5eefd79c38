// src/processing/rectify.rs
//! Full-wave rectification

/// Fold negative excursions positive (elementwise absolute value).
///
/// Total and pure: never fails, output length equals input length, and
/// applying it twice changes nothing.
pub fn rectify(input: &[f64]) -> Vec<f64> {
    input.iter().map(|x| x.abs()).collect()
}
