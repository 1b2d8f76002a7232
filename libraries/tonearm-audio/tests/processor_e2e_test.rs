//! End-to-end tests for the byte-level processor contract
//!
//! Raw PCM in, raw PCM out: sizing, encodings, lifecycle and error paths.

//!
//! Run with: cargo test -p tonearm-audio --features test-utils --test processor_e2e_test

use std::sync::Arc;
use tonearm_audio::test_utils::*;
use tonearm_audio::{
    AudioError, LevelMeter, ProcessOutcome, ProcessorParameters, StereoProcessor,
};
use tonearm_core::{AudioFormat, SampleEncoding, SampleRate};

const LSB: f32 = 1.0 / 32_768.0;

// ============================================================================
// HELPERS
// ============================================================================

fn format(rate: u32, channels: u16, encoding: SampleEncoding) -> AudioFormat {
    AudioFormat::new(SampleRate::new(rate), channels, encoding)
}

fn configured(input: AudioFormat) -> StereoProcessor {
    let mut processor = StereoProcessor::new().with_dither_seed(0x5EED);
    processor.configure(input).expect("supported format");
    processor
}

/// `frames` stereo frames of a sine on both channels
fn sine(freq: f32, rate: u32, frames: usize, amplitude: f32) -> Vec<f32> {
    let mut samples = generate_sine_wave(freq, rate, (frames + 1) as f32 / rate as f32, amplitude);
    samples.truncate(frames * 2);
    samples
}

// ============================================================================
// SILENCE AND SIZING
// ============================================================================

#[test]
fn silence_in_silence_out_for_every_encoding() {
    let encodings = [
        SampleEncoding::Int16,
        SampleEncoding::Int24Packed,
        SampleEncoding::Int32,
        SampleEncoding::Float32,
    ];

    for encoding in encodings {
        for channels in [1, 2] {
            let input_format = format(44_100, channels, encoding);
            let mut processor = configured(input_format);
            let out_encoding = processor.output_format().unwrap().encoding;

            let input = vec![0u8; 512 * input_format.frame_size()];
            let output = processor.process_to_vec(&input).unwrap();

            for sample in unto_pcm(&output, out_encoding) {
                if out_encoding == SampleEncoding::Int16 {
                    assert!(sample.abs() <= 1.0 / 32_767.0, "{encoding} {channels}ch: {sample}");
                } else {
                    assert_eq!(sample, 0.0, "{encoding} {channels}ch");
                }
            }
        }
    }
}

#[test]
fn thousand_frames_of_int16_silence() {
    let mut processor = configured(format(44_100, 2, SampleEncoding::Int16));
    let input = vec![0u8; 4_000];
    let mut output = vec![0u8; 4_000];

    let outcome = processor.process(&input, &mut output).unwrap();

    assert_eq!(
        outcome,
        ProcessOutcome {
            frames: 1_000,
            bytes_written: 4_000,
            dropped_bytes: 0,
        }
    );
    let levels = processor.meter().report();
    assert!(levels.left_peak <= LSB);
    assert!(levels.right_peak <= LSB);
}

#[test]
fn output_size_follows_encoding_and_layout() {
    let cases = [
        (1, SampleEncoding::Int16, 200, 400),
        (2, SampleEncoding::Int16, 400, 400),
        (1, SampleEncoding::Int24Packed, 300, 800),
        (2, SampleEncoding::Int24Packed, 600, 800),
        (2, SampleEncoding::Int32, 800, 800),
        (1, SampleEncoding::Float32, 400, 800),
    ];

    for (channels, encoding, input_len, expected) in cases {
        let mut processor = configured(format(48_000, channels, encoding));
        assert_eq!(processor.output_len(input_len), expected);
        let output = processor.process_to_vec(&vec![0u8; input_len]).unwrap();
        assert_eq!(output.len(), expected, "{encoding} {channels}ch");
    }
}

#[test]
fn only_int16_stays_int16() {
    for (encoding, expected) in [
        (SampleEncoding::Int16, SampleEncoding::Int16),
        (SampleEncoding::Int24Packed, SampleEncoding::Float32),
        (SampleEncoding::Int32, SampleEncoding::Float32),
        (SampleEncoding::Float32, SampleEncoding::Float32),
    ] {
        let mut processor = StereoProcessor::new();
        let output = processor.configure(format(44_100, 1, encoding)).unwrap();
        assert_eq!(output.encoding, expected);
        assert_eq!(output.channels, 2);
        assert_eq!(output.sample_rate.as_hz(), 44_100);
    }
}

#[test]
fn trailing_partial_frame_is_dropped_and_reported() {
    let mut processor = configured(format(44_100, 2, SampleEncoding::Int16));
    let input = vec![0u8; 4_003];
    let mut output = vec![0u8; 4_000];

    let outcome = processor.process(&input, &mut output).unwrap();

    assert_eq!(outcome.frames, 1_000);
    assert_eq!(outcome.bytes_written, 4_000);
    assert_eq!(outcome.dropped_bytes, 3);
}

#[test]
fn empty_input_leaves_meter_untouched() {
    let mut processor = configured(format(44_100, 2, SampleEncoding::Float32));
    let loud = to_pcm(&sine(1_000.0, 44_100, 2_048, 0.5), SampleEncoding::Float32);
    processor.process_to_vec(&loud).unwrap();
    let before = processor.meter().report();
    assert!(before.max_peak() > 0.4);

    let outcome = processor.process(&[], &mut []).unwrap();
    assert_eq!(outcome, ProcessOutcome::default());

    let outcome = processor.process(&[0u8; 7], &mut []).unwrap();
    assert_eq!(outcome.frames, 0);
    assert_eq!(outcome.dropped_bytes, 7);

    assert_eq!(processor.meter().report(), before);
}

// ============================================================================
// SIGNAL BEHAVIOR
// ============================================================================

#[test]
fn flat_settings_preserve_magnitude() {
    let rate = 44_100;
    let mut processor = configured(format(rate, 2, SampleEncoding::Float32));
    let input = sine(1_000.0, rate, 44_100, 0.5);

    let output = from_pcm(
        &processor
            .process_to_vec(&to_pcm(&input, SampleEncoding::Float32))
            .unwrap(),
        SampleEncoding::Float32,
    );

    // Skip the first 100 ms while the filters settle
    let settled = 4_410 * 2;
    let ratio = calculate_rms(&output[settled..]) / calculate_rms(&input[settled..]);
    assert!((ratio - 1.0).abs() < 0.01, "flat gain = {ratio}");
}

#[test]
fn mono_input_gives_identical_channels() {
    let mut processor = configured(format(48_000, 1, SampleEncoding::Int24Packed));
    let params = processor.params();
    params.set_width(1.8);
    params.set_clarity(0.7);
    params.set_crossfeed(0.4);
    params.set_sub_bass_depth(0.6);
    params.set_warmth(0.3);

    let mono = extract_mono(&sine(220.0, 48_000, 4_800, 0.8), 0);
    let output = from_pcm(
        &processor
            .process_to_vec(&to_pcm(&mono, SampleEncoding::Int24Packed))
            .unwrap(),
        SampleEncoding::Float32,
    );

    for frame in output.chunks_exact(2) {
        assert_eq!(frame[0], frame[1]);
    }
}

#[test]
fn int16_dither_is_identical_on_both_channels() {
    for channels in [1, 2] {
        let mut processor = configured(format(44_100, channels, SampleEncoding::Int16));
        processor.params().set_width(1.6);
        processor.params().set_clarity(0.4);
        processor.params().set_crossfeed(0.3);

        let stereo = sine(330.0, 44_100, 4_410, 0.3);
        let input = if channels == 1 {
            to_pcm(&extract_mono(&stereo, 0), SampleEncoding::Int16)
        } else {
            to_pcm(&stereo, SampleEncoding::Int16)
        };
        let output = processor.process_to_vec(&input).unwrap();

        assert_eq!(output.len(), 4_410 * 4);
        for frame in output.chunks_exact(4) {
            assert_eq!(frame[..2], frame[2..], "{channels}ch");
        }
        // Filter tail plus dither
        let silence = vec![0u8; 1_024 * usize::from(channels) * 2];
        let tail = processor.process_to_vec(&silence).unwrap();
        for frame in tail.chunks_exact(4) {
            assert_eq!(frame[..2], frame[2..], "{channels}ch tail");
        }
    }
}

#[test]
fn float_overs_pass_through_before_gain() {
    let mut processor = configured(format(44_100, 2, SampleEncoding::Float32));
    processor.params().set_pre_gain(0.1);
    assert_eq!(processor.params().pre_gain(), 0.1);

    let input = to_pcm(&[8.0_f32; 64], SampleEncoding::Float32);
    let output = from_pcm(
        &processor.process_to_vec(&input).unwrap(),
        SampleEncoding::Float32,
    );

    // 8.0 * 0.1 = 0.8 reaches the limiter knee; a clamp to 4.0 would give about 0.39
    assert!(output[0] > 0.7 && output[0] < 1.0, "first sample = {}", output[0]);
    assert_eq!(output[0], output[1]);
}

#[test]
fn pre_gain_above_four_is_kept() {
    let processor = configured(format(44_100, 2, SampleEncoding::Float32));
    processor.params().set_pre_gain(6.0);
    assert_eq!(processor.params().pre_gain(), 6.0);
}

#[test]
fn hard_balance_silences_opposite_channel() {
    for (balance, silent) in [(-1.0, 1), (1.0, 0)] {
        let mut processor = configured(format(44_100, 2, SampleEncoding::Float32));
        processor.params().set_balance(balance);

        let input = to_pcm(&sine(440.0, 44_100, 4_410, 0.5), SampleEncoding::Float32);
        let output = from_pcm(
            &processor.process_to_vec(&input).unwrap(),
            SampleEncoding::Float32,
        );

        assert!(extract_mono(&output, silent).iter().all(|&x| x == 0.0));
        assert!(calculate_rms(&extract_mono(&output, 1 - silent)) > 0.1);
    }
}

#[test]
fn hot_float_input_stays_finite_and_below_full_scale() {
    let mut processor = configured(format(44_100, 2, SampleEncoding::Float32));
    processor.params().set_pre_gain(4.0);
    processor.params().set_warmth(1.0);

    let mut bytes = Vec::new();
    for n in 0..4_096 {
        let x = match n % 4 {
            0 => f32::NAN,
            1 => f32::INFINITY,
            2 => 1.0e30,
            _ => -8.0,
        };
        bytes.extend_from_slice(&x.to_le_bytes());
    }

    let output = from_pcm(
        &processor.process_to_vec(&bytes).unwrap(),
        SampleEncoding::Float32,
    );
    assert!(output.iter().all(|x| x.is_finite() && x.abs() < 1.0));
    assert!(processor.meter().report().max_peak() < 1.0);
}

#[test]
fn meter_tracks_output_peak() {
    let meter = Arc::new(LevelMeter::new());
    let mut processor = StereoProcessor::with_shared(Arc::new(ProcessorParameters::new()), meter.clone());
    processor
        .configure(format(44_100, 2, SampleEncoding::Float32))
        .unwrap();

    let input = to_pcm(&sine(1_000.0, 44_100, 8_820, 0.5), SampleEncoding::Float32);
    processor.process_to_vec(&input).unwrap();

    let levels = meter.report();
    assert!((0.45..0.56).contains(&levels.left_peak), "{levels:?}");
    assert!((0.45..0.56).contains(&levels.right_peak), "{levels:?}");
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Process a loud bass burst, renegotiate, then feed silence and return it
fn tail_after_renegotiation(second: AudioFormat) -> Vec<f32> {
    let first = format(44_100, 2, SampleEncoding::Float32);
    let mut processor = configured(first);
    processor
        .process_to_vec(&to_pcm(&sine(80.0, 44_100, 2_000, 0.6), SampleEncoding::Float32))
        .unwrap();

    processor.configure(second).unwrap();
    let silence = vec![0u8; 256 * second.frame_size()];
    from_pcm(
        &processor.process_to_vec(&silence).unwrap(),
        SampleEncoding::Float32,
    )
}

#[test]
fn same_rate_renegotiation_keeps_filter_tails() {
    let tail = tail_after_renegotiation(format(44_100, 1, SampleEncoding::Int32));
    assert!(tail.iter().any(|&x| x != 0.0), "tail should ring out");
}

#[test]
fn rate_change_clears_filter_state() {
    let tail = tail_after_renegotiation(format(48_000, 2, SampleEncoding::Float32));
    assert!(tail.iter().all(|&x| x == 0.0));
}

fn lifecycle_params(p: &ProcessorParameters) {
    p.set_clarity(0.5);
    p.set_spatial_enabled(true);
    p.set_spatial_rotation_hz(0.8);
}

#[test]
fn flush_makes_processing_deterministic() {
    // Int32 in, Float32 out: no dither involved
    let input_format = format(44_100, 2, SampleEncoding::Int32);
    let warmup = to_pcm(&sine(60.0, 44_100, 3_000, 0.9), SampleEncoding::Int32);
    let burst = to_pcm(&sine(3_000.0, 44_100, 1_000, 0.4), SampleEncoding::Int32);

    let mut used = configured(input_format);
    lifecycle_params(used.params());
    used.process_to_vec(&warmup).unwrap();
    used.flush();
    assert!(used.is_active());
    let after_flush = used.process_to_vec(&burst).unwrap();

    let mut fresh = configured(input_format);
    lifecycle_params(fresh.params());
    let from_fresh = fresh.process_to_vec(&burst).unwrap();

    assert_eq!(after_flush, from_fresh);
}

#[test]
fn flush_keeps_dither_running_and_reset_rewinds_it() {
    let input_format = format(44_100, 2, SampleEncoding::Int16);
    let warmup = to_pcm(&sine(60.0, 44_100, 3_000, 0.9), SampleEncoding::Int16);
    let burst = to_pcm(&sine(3_000.0, 44_100, 1_000, 0.4), SampleEncoding::Int16);

    let mut fresh = configured(input_format);
    lifecycle_params(fresh.params());
    let from_fresh = fresh.process_to_vec(&burst).unwrap();

    let mut used = configured(input_format);
    lifecycle_params(used.params());
    used.process_to_vec(&warmup).unwrap();
    used.flush();
    let after_flush = used.process_to_vec(&burst).unwrap();
    assert_ne!(after_flush, from_fresh, "flush must not replay the dither noise");

    used.reset();
    used.configure(input_format).unwrap();
    let after_reset = used.process_to_vec(&burst).unwrap();
    assert_eq!(after_reset, from_fresh);
}

#[test]
fn fixed_dither_seed_reproduces_output() {
    let input_format = format(44_100, 2, SampleEncoding::Int16);
    let input = to_pcm(&sine(997.0, 44_100, 4_096, 0.3), SampleEncoding::Int16);

    let render = |seed: u64| {
        let mut processor = StereoProcessor::new().with_dither_seed(seed);
        processor.configure(input_format).unwrap();
        processor.params().set_width(1.3);
        processor.process_to_vec(&input).unwrap()
    };

    assert_eq!(render(1), render(1));
    assert_ne!(render(1), render(2));
}

#[test]
fn process_to_vec_matches_process() {
    let input_format = format(96_000, 2, SampleEncoding::Int32);
    let input = to_pcm(&sine(500.0, 96_000, 1_024, 0.5), SampleEncoding::Int32);

    let mut a = configured(input_format);
    let mut b = configured(input_format);

    let mut output = vec![0u8; a.output_len(input.len())];
    a.process(&input, &mut output).unwrap();
    assert_eq!(output, b.process_to_vec(&input).unwrap());
}

#[test]
fn larger_output_buffer_is_accepted() {
    let mut processor = configured(format(44_100, 2, SampleEncoding::Int16));
    let mut output = vec![0xAAu8; 64];
    let outcome = processor.process(&[0u8; 16], &mut output).unwrap();
    assert_eq!(outcome.bytes_written, 16);
    assert!(output[16..].iter().all(|&b| b == 0xAA));
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn process_before_configure_is_rejected() {
    let mut processor = StereoProcessor::new();
    let err = processor.process_to_vec(&[0u8; 16]).unwrap_err();
    assert!(matches!(err, AudioError::NotConfigured));
}

#[test]
fn short_output_buffer_is_rejected() {
    let mut processor = configured(format(44_100, 1, SampleEncoding::Float32));
    let mut output = vec![0u8; 15];
    let err = processor.process(&[0u8; 8], &mut output).unwrap_err();
    assert!(matches!(
        err,
        AudioError::OutputTooSmall {
            needed: 16,
            actual: 15
        }
    ));
}

#[test]
fn unsupported_formats_are_rejected() {
    let mut processor = StereoProcessor::new();
    for bad in [
        format(44_100, 3, SampleEncoding::Int16),
        format(4_000, 2, SampleEncoding::Int16),
        format(1_000_000, 2, SampleEncoding::Float32),
    ] {
        assert!(matches!(
            processor.configure(bad),
            Err(AudioError::UnsupportedFormat(_))
        ));
        assert!(!processor.is_active());
    }

    assert!(AudioFormat::from_pcm(44_100, 2, 8, false).is_err());
    assert!(AudioFormat::from_pcm(44_100, 2, 64, true).is_err());
}

#[test]
fn reset_requires_reconfiguration() {
    let mut processor = configured(format(44_100, 2, SampleEncoding::Int16));
    processor.reset();
    assert!(processor.input_format().is_none());
    assert!(matches!(
        processor.process_to_vec(&[0u8; 4]),
        Err(AudioError::NotConfigured)
    ));
}
