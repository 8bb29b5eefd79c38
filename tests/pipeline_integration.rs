// tests/pipeline_integration.rs
//! End-to-end pipeline scenarios over synthesized recordings.

use std::f64::consts::PI;

use emg_pipeline::processing::pipeline::{EmgPipeline, PipelineConfig};
use emg_pipeline::processing::{AmplitudeSpectrum, ProcessingError};
use emg_pipeline::signal::Signal;
use emg_pipeline::simulation::SyntheticEmg;

/// 2 s at 1000 Hz: a 100 Hz "muscle" tone of amplitude 1000, a 0.1 Hz drift
/// of amplitude 5000 standing in for motion artifact, and a 600 Hz tone of
/// amplitude 50 as out-of-band noise (which folds to 400 Hz at this rate).
fn scenario_signal() -> Signal {
    let fs = 1000.0;
    let samples: Vec<f64> = (0..2000)
        .map(|i| {
            let t = i as f64 / fs;
            1000.0 * (2.0 * PI * 100.0 * t).sin()
                + 5000.0 * (2.0 * PI * 0.1 * t).sin()
                + 50.0 * (2.0 * PI * 600.0 * t).sin()
        })
        .collect();
    Signal::new(samples, fs).unwrap()
}

#[test]
fn centered_signal_has_zero_mean() {
    let bundle = EmgPipeline::new(PipelineConfig::default())
        .process(&scenario_signal())
        .unwrap();
    let centered = bundle.centered.samples();
    let mean: f64 = centered.iter().sum::<f64>() / centered.len() as f64;
    assert!(mean.abs() < 1e-6, "residual mean {mean}");
}

#[test]
fn out_of_band_components_attenuated_20_db() {
    let bundle = EmgPipeline::new(PipelineConfig::default())
        .process(&scenario_signal())
        .unwrap();
    let spectrum = AmplitudeSpectrum::compute(bundle.filtered.samples(), 1000.0);

    let (_, tone) = spectrum.peak_in_band(95.0, 105.0).unwrap();
    let (_, drift) = spectrum.peak_in_band(0.01, 5.0).unwrap();
    let (_, noise) = spectrum.peak_in_band(395.0, 405.0).unwrap();

    assert!(tone > 900.0, "passband tone lost: {tone}");
    // At least 20 dB down relative to the 100 Hz component.
    assert!(drift / tone < 0.1, "drift survived: {drift} vs {tone}");
    assert!(noise / tone < 0.1, "noise survived: {noise} vs {tone}");
}

#[test]
fn rectified_signal_is_nonnegative() {
    let bundle = EmgPipeline::new(PipelineConfig::default())
        .process(&scenario_signal())
        .unwrap();
    assert!(bundle.rectified.samples().iter().all(|&v| v >= 0.0));
}

#[test]
fn envelope_tracks_rectified_sine_mean() {
    let bundle = EmgPipeline::new(PipelineConfig::default())
        .process(&scenario_signal())
        .unwrap();
    // Away from the edges, the 100 ms window averages 20 half-cycles of the
    // 100 Hz tone, so the envelope sits near the rectified-sine mean
    // 2/pi * 1000. Tolerance 10%.
    let expected = 2.0 / PI * 1000.0;
    let mid = bundle.envelope.samples()[1000];
    assert!(
        (mid - expected).abs() / expected < 0.1,
        "envelope {mid} vs expected {expected}"
    );
}

#[test]
fn all_signals_match_input_length() {
    let raw = scenario_signal();
    let bundle = EmgPipeline::new(PipelineConfig::default()).process(&raw).unwrap();
    assert_eq!(bundle.centered.len(), raw.len());
    assert_eq!(bundle.filtered.len(), raw.len());
    assert_eq!(bundle.rectified.len(), raw.len());
    assert_eq!(bundle.envelope.len(), raw.len());
}

#[test]
fn pipeline_is_deterministic() {
    let pipeline = EmgPipeline::new(PipelineConfig::default());
    let raw = scenario_signal();
    let first = pipeline.process(&raw).unwrap();
    let second = pipeline.process(&raw).unwrap();
    assert_eq!(first, second);
}

#[test]
fn boundary_errors() {
    let pipeline = EmgPipeline::new(PipelineConfig::default());

    let empty = Signal::new(Vec::new(), 1000.0).unwrap();
    assert_eq!(pipeline.process(&empty), Err(ProcessingError::EmptySignal));

    let short = Signal::new(vec![1.0; 20], 1000.0).unwrap();
    assert!(matches!(
        pipeline.process(&short),
        Err(ProcessingError::SignalTooShort { .. })
    ));

    assert!(matches!(
        Signal::new(vec![1.0; 100], 0.0),
        Err(ProcessingError::InvalidSpec(_))
    ));
}

#[test]
fn envelope_separates_contraction_from_rest() {
    // Synthetic contraction bursts: the envelope must ride high mid-burst
    // and collapse between bursts despite drift and noise in the raw trace.
    let mut source = SyntheticEmg::with_defaults();
    let raw = source.generate_signal(4000).unwrap();
    let bundle = EmgPipeline::new(PipelineConfig::default()).process(&raw).unwrap();
    let envelope = bundle.envelope.samples();

    // Default config: 2 s cycle, 40% duty, so samples 0..800 and 2000..2800
    // are contracted at 1000 Hz.
    let mid_burst = envelope[400];
    let mid_rest = envelope[1400];
    assert!(
        mid_burst > 5.0 * mid_rest,
        "burst {mid_burst} not separated from rest {mid_rest}"
    );
}
