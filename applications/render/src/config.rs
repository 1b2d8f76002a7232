/// Render host configuration
use crate::error::{RenderError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tonearm_audio::{ParameterSnapshot, Preset};
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tonearm.toml";

/// Largest block handed to the processor in one call
pub const MAX_BLOCK_FRAMES: usize = 1 << 20;

/// Environment variable prefix (`TONEARM_RENDER__BLOCK_FRAMES=512`)
pub const ENV_PREFIX: &str = "TONEARM";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Explicit knob values; takes precedence over `render.preset`
    #[serde(default)]
    pub processor: Option<ParameterSnapshot>,

    #[serde(default)]
    pub render: RenderSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderSettings {
    /// Frames handed to the processor per call
    #[serde(default = "default_block_frames")]
    pub block_frames: usize,

    /// Fixed dither seed for reproducible 16-bit output
    #[serde(default)]
    pub dither_seed: Option<u64>,

    /// Named starting point for the knobs
    #[serde(default)]
    pub preset: Option<Preset>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            block_frames: default_block_frames(),
            dither_seed: None,
            preset: None,
        }
    }
}

fn default_block_frames() -> usize {
    1024
}

impl RenderSettings {
    /// Validate block sizing
    pub fn validate(&self) -> Result<()> {
        if self.block_frames == 0 || self.block_frames > MAX_BLOCK_FRAMES {
            return Err(RenderError::Config(format!(
                "render.block_frames must be between 1 and {MAX_BLOCK_FRAMES}, got {}",
                self.block_frames
            )));
        }

        Ok(())
    }
}

impl RenderConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `tonearm.toml` is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    debug!(path = %default_path.display(), "Loading default configuration file");
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with TONEARM_)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.render.validate()
    }

    /// Knob values to start rendering with
    ///
    /// `[processor]` wins over `render.preset`, which wins over flat defaults.
    pub fn parameters(&self) -> ParameterSnapshot {
        match (self.processor, self.render.preset) {
            (Some(snapshot), _) => snapshot,
            (None, Some(preset)) => preset.snapshot(),
            (None, None) => ParameterSnapshot::default(),
        }
    }

    /// Switch to a preset, discarding any `[processor]` table
    pub fn select_preset(&mut self, preset: Preset) {
        self.processor = None;
        self.render.preset = Some(preset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.render.block_frames, 1024);
        assert!(config.render.dither_seed.is_none());
        assert!(config.parameters().is_flat());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_sections_from_toml() {
        let file = write_config(
            r#"
[processor]
width = 1.4
crossfeed = 0.5

[render]
block_frames = 256
dither_seed = 99
"#,
        );
        let config = RenderConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.render.block_frames, 256);
        assert_eq!(config.render.dither_seed, Some(99));
        let params = config.parameters();
        assert_eq!(params.width, 1.4);
        assert_eq!(params.crossfeed, 0.5);
        assert_eq!(params.pre_gain, 1.0);
    }

    #[test]
    fn preset_applies_without_processor_table() {
        let file = write_config("[render]\npreset = \"warm\"\n");
        let config = RenderConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.render.preset, Some(Preset::Warm));
        assert_eq!(config.parameters(), Preset::Warm.snapshot());
    }

    #[test]
    fn processor_table_wins_over_preset() {
        let file = write_config("[processor]\nwarmth = 0.1\n\n[render]\npreset = \"wide\"\n");
        let mut config = RenderConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.parameters().warmth, 0.1);
        assert_eq!(config.parameters().width, 1.0);

        config.select_preset(Preset::Wide);
        assert_eq!(config.parameters(), Preset::Wide.snapshot());
    }

    #[test]
    fn zero_block_frames_rejected() {
        let file = write_config("[render]\nblock_frames = 0\n");
        let config = RenderConfig::load(Some(file.path())).unwrap();
        assert!(matches!(config.validate(), Err(RenderError::Config(_))));
    }

    #[test]
    fn oversized_block_frames_rejected() {
        let file = write_config("[render]\nblock_frames = 4294967296\n");
        let config = RenderConfig::load(Some(file.path())).unwrap();
        assert!(matches!(config.validate(), Err(RenderError::Config(_))));

        let mut config = RenderConfig::default();
        config.render.block_frames = MAX_BLOCK_FRAMES;
        assert!(config.validate().is_ok());
        config.render.block_frames = MAX_BLOCK_FRAMES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = RenderConfig::load(Some(Path::new("/nonexistent/tonearm.toml"))).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }
}
