/// Tonearm Render - run a WAV file through the stereo processor
use clap::Parser;
use std::path::PathBuf;
use tonearm_audio::{ParameterSnapshot, Preset};
use tonearm_render::{render_file, RenderConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tonearm-render")]
#[command(about = "Render a WAV file through the Tonearm stereo processor", long_about = None)]
struct Cli {
    /// Input WAV file (16/24/32-bit integer or 32-bit float, mono or stereo)
    input: PathBuf,

    /// Output WAV file (always stereo)
    output: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a named preset (flat, headphone, warm, wide, spatial)
    #[arg(short, long)]
    preset: Option<Preset>,

    /// Frames per processor call
    #[arg(long)]
    block_frames: Option<usize>,

    /// Dither seed for reproducible 16-bit output
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    pre_gain: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    balance: Option<f64>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    crossfeed: Option<f64>,

    #[arg(long)]
    clarity: Option<f64>,

    #[arg(long)]
    warmth: Option<f64>,

    #[arg(long)]
    sub_bass: Option<f64>,

    #[arg(long)]
    air: Option<f64>,

    #[arg(long)]
    loudness: Option<f64>,

    /// Enable the rotating spatial stage
    #[arg(long)]
    spatial: bool,

    /// Spatial rotation speed in Hz
    #[arg(long)]
    rotation_hz: Option<f64>,
}

impl Cli {
    /// Apply individual knob flags on top of `params`
    fn override_knobs(&self, params: &mut ParameterSnapshot) {
        let knobs = [
            (self.pre_gain, &mut params.pre_gain),
            (self.balance, &mut params.balance),
            (self.width, &mut params.width),
            (self.crossfeed, &mut params.crossfeed),
            (self.clarity, &mut params.clarity),
            (self.warmth, &mut params.warmth),
            (self.sub_bass, &mut params.sub_bass_depth),
            (self.air, &mut params.hifi_air),
            (self.loudness, &mut params.adaptive_loudness),
            (self.rotation_hz, &mut params.spatial_rotation_hz),
        ];
        for (flag, knob) in knobs {
            if let Some(value) = flag {
                *knob = value;
            }
        }
        if self.spatial {
            params.spatial_enabled = true;
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tonearm_render=info,tonearm_audio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = RenderConfig::load(cli.config.as_deref())?;
    if let Some(preset) = cli.preset {
        config.select_preset(preset);
    }
    if let Some(block_frames) = cli.block_frames {
        config.render.block_frames = block_frames;
    }
    if cli.seed.is_some() {
        config.render.dither_seed = cli.seed;
    }
    config.validate()?;

    let mut params = config.parameters();
    cli.override_knobs(&mut params);

    let report = render_file(&cli.input, &cli.output, &params, &config.render)?;

    println!(
        "{} -> {}: {} frames, {} -> {}, peak {:.1} dBFS",
        cli.input.display(),
        cli.output.display(),
        report.frames,
        report.input_format,
        report.output_format,
        report.peak.max_peak_db(),
    );
    if report.dropped_bytes > 0 {
        println!("dropped {} bytes of partial frames", report.dropped_bytes);
    }

    Ok(())
}
