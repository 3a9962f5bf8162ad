use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::apng::builder::{CanvasSizing, MalformedFramePolicy};
use crate::assets::color::Rgba8;
use crate::encode::still::PngCompression;
use crate::foundation::error::{AnimpackError, AnimpackResult};
use crate::schedule::ScheduleOpts;

/// Settings for one conversion. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Number of plays; 0 loops forever.
    pub repeat: u32,
    /// Frame rate of the input sequence.
    pub fps: f64,
    /// Output frame rate ceiling.
    pub max_fps: f64,
    /// Playback speed multiplier.
    pub speed: f64,
    /// Raster width for vector inputs.
    pub width: Option<u32>,
    /// Raster height for vector inputs.
    pub height: Option<u32>,
    /// Background composited under vector inputs.
    pub background: Option<Rgba8>,
    /// Fail on the first malformed input frame instead of emitting it empty.
    pub strict: bool,
    /// IHDR canvas sizing.
    pub canvas: CanvasSizing,
    /// zlib effort when vector inputs are encoded to PNG.
    pub compression: PngCompression,
    /// Replace an existing output file.
    pub overwrite: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            repeat: 0,
            fps: 30.0,
            max_fps: 60.0,
            speed: 1.0,
            width: None,
            height: None,
            background: None,
            strict: false,
            canvas: CanvasSizing::default(),
            compression: PngCompression::default(),
            overwrite: true,
        }
    }
}

impl ConvertConfig {
    pub fn from_json_str(s: &str) -> AnimpackResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| AnimpackError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AnimpackResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> AnimpackResult<()> {
        fn positive(name: &str, v: f64) -> AnimpackResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(AnimpackError::validation(format!(
                    "{name} must be finite and > 0 (got {v})"
                )));
            }
            Ok(())
        }
        positive("fps", self.fps)?;
        positive("max_fps", self.max_fps)?;
        positive("speed", self.speed)?;
        if self.width == Some(0) || self.height == Some(0) {
            return Err(AnimpackError::validation("width/height must be non-zero"));
        }
        Ok(())
    }

    pub fn malformed_policy(&self) -> MalformedFramePolicy {
        if self.strict {
            MalformedFramePolicy::Abort
        } else {
            MalformedFramePolicy::Skip
        }
    }

    pub fn schedule_opts(&self) -> ScheduleOpts {
        ScheduleOpts {
            max_fps: self.max_fps,
            speed: self.speed,
        }
    }
}
