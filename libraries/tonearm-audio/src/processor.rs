//! Stereo processor entry point
//!
//! A `StereoProcessor` is one audio session: negotiate a format with
//! [`configure`](StereoProcessor::configure), then feed raw PCM buffers to
//! [`process`](StereoProcessor::process) from the audio thread. The parameter
//! surface and level meter are shared through `Arc` with the control side.
//!
//! `process` does not allocate, lock, log or block.

use std::sync::Arc;
use tonearm_core::AudioFormat;
use tracing::debug;

use crate::codec;
use crate::effects::TpdfDither;
use crate::error::{AudioError, Result};
use crate::format::{self, NegotiatedFormat};
use crate::meter::LevelMeter;
use crate::params::ProcessorParameters;
use crate::pipeline::DspPipeline;

/// Sample rate the pipeline is designed for before the first negotiation
const INITIAL_SAMPLE_RATE: f64 = 44_100.0;

/// What one `process` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Whole frames processed
    pub frames: usize,
    /// Bytes written to the output slice
    pub bytes_written: usize,
    /// Trailing bytes of a partial input frame that were ignored
    pub dropped_bytes: usize,
}

/// Real-time stereo processor
#[derive(Debug)]
pub struct StereoProcessor {
    params: Arc<ProcessorParameters>,
    meter: Arc<LevelMeter>,
    format: Option<NegotiatedFormat>,
    pipeline: DspPipeline,
}

impl StereoProcessor {
    /// Create a processor with its own parameters and meter
    pub fn new() -> Self {
        Self::with_shared(
            Arc::new(ProcessorParameters::new()),
            Arc::new(LevelMeter::new()),
        )
    }

    /// Create a processor driven by externally owned parameters and meter
    pub fn with_shared(params: Arc<ProcessorParameters>, meter: Arc<LevelMeter>) -> Self {
        Self {
            params,
            meter,
            format: None,
            pipeline: DspPipeline::new(INITIAL_SAMPLE_RATE, TpdfDither::new()),
        }
    }

    /// Use a fixed dither seed so 16-bit renders are reproducible
    #[must_use]
    pub fn with_dither_seed(mut self, seed: u64) -> Self {
        self.pipeline.replace_dither(TpdfDither::with_seed(seed));
        self
    }

    pub fn params(&self) -> &Arc<ProcessorParameters> {
        &self.params
    }

    pub fn meter(&self) -> &Arc<LevelMeter> {
        &self.meter
    }

    /// Negotiate an input format and return the output format
    ///
    /// Filter history is cleared only when the sample rate changes. On error
    /// the processor is left unconfigured.
    pub fn configure(&mut self, input: AudioFormat) -> Result<AudioFormat> {
        let negotiated = match format::negotiate(input) {
            Ok(negotiated) => negotiated,
            Err(e) => {
                self.format = None;
                return Err(e);
            }
        };

        let sample_rate = negotiated.sample_rate_hz();
        if sample_rate == self.pipeline.sample_rate() {
            debug!(input = %input, "Renegotiated at the same rate, keeping filter state");
        } else {
            debug!(
                from_hz = self.pipeline.sample_rate(),
                to_hz = sample_rate,
                "Sample rate changed, redesigning filters"
            );
            self.pipeline.set_sample_rate(sample_rate);
            self.pipeline.flush();
        }

        self.format = Some(negotiated);
        debug!(input = %input, output = %negotiated.output(), "Format negotiated");
        Ok(negotiated.output())
    }

    /// True once a format has been negotiated
    pub fn is_active(&self) -> bool {
        self.format.is_some()
    }

    pub fn input_format(&self) -> Option<AudioFormat> {
        self.format.map(|f| f.input())
    }

    pub fn output_format(&self) -> Option<AudioFormat> {
        self.format.map(|f| f.output())
    }

    /// Output bytes produced for `input_len` input bytes (0 when unconfigured)
    pub fn output_len(&self, input_len: usize) -> usize {
        self.format.map_or(0, |f| f.output_len(input_len))
    }

    /// Process one input buffer into `output`
    ///
    /// # Arguments
    /// * `input` - Raw PCM in the negotiated input format
    /// * `output` - Destination for stereo PCM in the output format
    ///
    /// `output` must hold at least [`output_len`](Self::output_len) bytes.
    /// A trailing partial frame is ignored and reported in the outcome. An
    /// input without a whole frame leaves the meter untouched.
    pub fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<ProcessOutcome> {
        let format = self.format.ok_or(AudioError::NotConfigured)?;
        let needed = format.output_len(input.len());
        if output.len() < needed {
            return Err(AudioError::OutputTooSmall {
                needed,
                actual: output.len(),
            });
        }

        let input_format = format.input();
        let frames = codec::frames(input, input_format.encoding, format.layout());
        let dropped_bytes = frames.dropped_bytes();
        let frame_count = frames.len();
        if frame_count == 0 {
            return Ok(ProcessOutcome {
                frames: 0,
                bytes_written: 0,
                dropped_bytes,
            });
        }

        let snapshot = self.params.snapshot();
        let out_encoding = format.output().encoding;
        let out_frame_size = format.output().frame_size();
        let dithered = format.is_dithered();

        let mut peak_left = 0.0_f64;
        let mut peak_right = 0.0_f64;

        for ((left, right), out) in frames.zip(output[..needed].chunks_exact_mut(out_frame_size)) {
            let (mut l, mut r) = self.pipeline.process_frame(left, right, &snapshot);

            peak_left = peak_left.max(l.abs());
            peak_right = peak_right.max(r.abs());

            if dithered {
                let dither = self.pipeline.dither();
                l += dither;
                r += dither;
            }

            codec::encode_frame(out, out_encoding, l, r);
        }

        self.meter.publish(peak_left, peak_right);

        Ok(ProcessOutcome {
            frames: frame_count,
            bytes_written: needed,
            dropped_bytes,
        })
    }

    /// Process into a freshly allocated buffer (offline hosts)
    pub fn process_to_vec(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = vec![0u8; self.output_len(input.len())];
        let outcome = self.process(input, &mut output)?;
        output.truncate(outcome.bytes_written);
        Ok(output)
    }

    /// Zero all DSP state but keep the negotiated format (e.g. after a seek)
    ///
    /// The dither generator is not rewound, so 16-bit noise does not repeat.
    pub fn flush(&mut self) {
        self.pipeline.flush();
        debug!("Processor flushed");
    }

    /// Flush, rewind the dither seed, forget the negotiated format and zero the meter
    pub fn reset(&mut self) {
        self.pipeline.reset();
        self.format = None;
        self.meter.reset();
        debug!("Processor reset");
    }
}

impl Default for StereoProcessor {
    fn default() -> Self {
        Self::new()
    }
}
