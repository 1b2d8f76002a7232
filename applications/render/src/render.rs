//! WAV file rendering through the stereo processor
//!
//! The input WAV is read back into its raw little-endian PCM form so the
//! processor sees exactly what a playback pipeline would hand it.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tonearm_audio::{AudioError, LevelTelemetry, ParameterSnapshot, StereoProcessor};
use tonearm_core::{AudioFormat, SampleEncoding};
use tracing::{debug, info, warn};

use crate::config::RenderSettings;
use crate::error::Result;

/// Summary of one render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub input_format: AudioFormat,
    pub output_format: AudioFormat,
    /// Frames written to the output file
    pub frames: usize,
    /// Processor calls made
    pub blocks: usize,
    /// Bytes of partial frames the processor ignored
    pub dropped_bytes: usize,
    /// Loudest per-block peaks seen by the meter
    pub peak: LevelTelemetry,
}

/// Raw PCM reader over a WAV file
struct PcmSource {
    reader: WavReader<BufReader<File>>,
    format: AudioFormat,
}

impl PcmSource {
    fn open(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path)?;
        let spec = reader.spec();
        let format = AudioFormat::from_pcm(
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            spec.sample_format == SampleFormat::Float,
        )?;
        Ok(Self { reader, format })
    }

    /// Refill `block` with up to `samples` interleaved samples, returns the count read
    fn fill(&mut self, block: &mut Vec<u8>, samples: usize) -> Result<usize> {
        block.clear();
        let mut read = 0;
        match self.format.encoding {
            SampleEncoding::Int16 => {
                for sample in self.reader.samples::<i16>().take(samples) {
                    block.extend_from_slice(&sample?.to_le_bytes());
                    read += 1;
                }
            }
            SampleEncoding::Int24Packed => {
                for sample in self.reader.samples::<i32>().take(samples) {
                    block.extend_from_slice(&sample?.to_le_bytes()[..3]);
                    read += 1;
                }
            }
            SampleEncoding::Int32 => {
                for sample in self.reader.samples::<i32>().take(samples) {
                    block.extend_from_slice(&sample?.to_le_bytes());
                    read += 1;
                }
            }
            SampleEncoding::Float32 => {
                for sample in self.reader.samples::<f32>().take(samples) {
                    block.extend_from_slice(&sample?.to_le_bytes());
                    read += 1;
                }
            }
        }
        Ok(read)
    }
}

/// Stereo WAV writer for processor output
struct PcmSink {
    writer: WavWriter<BufWriter<File>>,
    encoding: SampleEncoding,
}

impl PcmSink {
    fn create(path: &Path, format: AudioFormat) -> Result<Self> {
        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate.as_hz(),
            bits_per_sample: format.encoding.bits_per_sample(),
            sample_format: if format.encoding.is_float() {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        };
        Ok(Self {
            writer: WavWriter::create(path, spec)?,
            encoding: format.encoding,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        match self.encoding {
            SampleEncoding::Int16 => {
                for chunk in bytes.chunks_exact(2) {
                    self.writer
                        .write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
                }
            }
            SampleEncoding::Float32 => {
                for chunk in bytes.chunks_exact(4) {
                    self.writer.write_sample(f32::from_le_bytes([
                        chunk[0], chunk[1], chunk[2], chunk[3],
                    ]))?;
                }
            }
            other => {
                return Err(AudioError::UnsupportedFormat(format!("{other} output")).into());
            }
        }
        Ok(())
    }

    fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

/// Render `input` to `output` with the given knob values
pub fn render_file(
    input: &Path,
    output: &Path,
    params: &ParameterSnapshot,
    settings: &RenderSettings,
) -> Result<RenderReport> {
    settings.validate()?;
    let mut source = PcmSource::open(input)?;
    let input_format = source.format;

    let mut processor = StereoProcessor::new();
    if let Some(seed) = settings.dither_seed {
        processor = processor.with_dither_seed(seed);
    }
    processor.params().apply(params);
    let output_format = processor.configure(input_format)?;

    info!(
        input = %input.display(),
        input_format = %input_format,
        output_format = %output_format,
        block_frames = settings.block_frames,
        "Rendering"
    );

    let mut sink = PcmSink::create(output, output_format)?;

    let samples_per_block = settings.block_frames * usize::from(input_format.channels);
    let mut block = Vec::with_capacity(samples_per_block * input_format.encoding.bytes_per_sample());
    let mut out = vec![0u8; processor.output_len(block.capacity())];

    let mut report = RenderReport {
        input_format,
        output_format,
        frames: 0,
        blocks: 0,
        dropped_bytes: 0,
        peak: LevelTelemetry::default(),
    };

    while source.fill(&mut block, samples_per_block)? > 0 {
        let outcome = processor.process(&block, &mut out)?;
        sink.write(&out[..outcome.bytes_written])?;

        let levels = processor.meter().report();
        report.peak.left_peak = report.peak.left_peak.max(levels.left_peak);
        report.peak.right_peak = report.peak.right_peak.max(levels.right_peak);
        report.frames += outcome.frames;
        report.blocks += 1;
        report.dropped_bytes += outcome.dropped_bytes;
        if outcome.dropped_bytes > 0 {
            warn!(
                block = report.blocks,
                bytes = outcome.dropped_bytes,
                "Dropped trailing partial frame"
            );
        }
    }

    sink.finalize()?;
    debug!(blocks = report.blocks, "Output finalized");

    info!(
        output = %output.display(),
        frames = report.frames,
        peak_db = report.peak.max_peak_db(),
        "Render complete"
    );

    Ok(report)
}
