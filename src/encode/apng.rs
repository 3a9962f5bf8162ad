use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::apng::builder::{ApngBuilder, ApngOptions, CanvasSizing, MalformedFramePolicy};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::encode::still::StillEncoder;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{AnimpackError, AnimpackResult};
use crate::render::FrameRGBA;

/// Options for [`ApngSink`].
#[derive(Clone, Debug, Default)]
pub struct ApngSinkOpts {
    /// Where to write the file on `end`; `None` keeps the bytes in memory only.
    pub out_path: Option<PathBuf>,
    /// Overwrite `out_path` if it already exists.
    pub overwrite: bool,
    /// `acTL.num_plays`; 0 loops forever.
    pub loop_count: u32,
    pub malformed: MalformedFramePolicy,
    pub canvas: CanvasSizing,
}

impl ApngSinkOpts {
    /// Write to `out_path`, replacing any existing file, looping forever.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: Some(out_path.into()),
            overwrite: true,
            ..Self::default()
        }
    }
}

/// Sink that still-encodes each frame and packs the results into one APNG.
pub struct ApngSink<E> {
    opts: ApngSinkOpts,
    encoder: E,
    builder: Option<ApngBuilder>,
    canvas: Option<Canvas>,
    last_idx: Option<FrameIndex>,
    output: Option<Vec<u8>>,
}

impl<E: StillEncoder> ApngSink<E> {
    pub fn new(opts: ApngSinkOpts, encoder: E) -> Self {
        Self {
            opts,
            encoder,
            builder: None,
            canvas: None,
            last_idx: None,
            output: None,
        }
    }

    /// Serialized APNG, available after `end`.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    /// Push an already-encoded still PNG, bypassing the still encoder.
    pub fn push_encoded(&mut self, idx: FrameIndex, png: &[u8]) -> AnimpackResult<()> {
        self.check_order(idx)?;
        let builder = self
            .builder
            .as_mut()
            .ok_or_else(|| AnimpackError::validation("apng sink used before begin"))?;
        builder.add_frame(png)?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn check_order(&self, idx: FrameIndex) -> AnimpackResult<()> {
        if let Some(prev) = self.last_idx
            && idx <= prev
        {
            return Err(AnimpackError::validation(format!(
                "frames must be pushed in increasing order (got {} after {})",
                idx.0, prev.0
            )));
        }
        Ok(())
    }
}

impl<E: StillEncoder> FrameSink for ApngSink<E> {
    fn begin(&mut self, cfg: SinkConfig) -> AnimpackResult<()> {
        if let Some(path) = &self.opts.out_path
            && !self.opts.overwrite
            && path.exists()
        {
            return Err(AnimpackError::validation(format!(
                "output file '{}' already exists",
                path.display()
            )));
        }

        self.builder = Some(ApngBuilder::new(ApngOptions {
            loop_count: self.opts.loop_count,
            delay: cfg.delay,
            malformed: self.opts.malformed,
            canvas: self.opts.canvas,
        }));
        self.canvas = cfg.canvas;
        self.last_idx = None;
        self.output = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> AnimpackResult<()> {
        if let Some(c) = self.canvas
            && (frame.width, frame.height) != (c.width, c.height)
        {
            return Err(AnimpackError::validation(format!(
                "frame {} is {}x{}, expected {}x{}",
                idx.0, frame.width, frame.height, c.width, c.height
            )));
        }
        let png = self.encoder.encode(frame)?;
        self.push_encoded(idx, &png)
    }

    fn end(&mut self) -> AnimpackResult<()> {
        let builder = self
            .builder
            .take()
            .ok_or_else(|| AnimpackError::validation("apng sink ended before begin"))?;
        let bytes = builder.finalize();

        if let Some(path) = &self.opts.out_path {
            ensure_parent_dir(path)?;
            std::fs::write(path, &bytes)
                .with_context(|| format!("write apng '{}'", path.display()))?;
            tracing::info!(
                path = %path.display(),
                frames = builder.frame_count(),
                bytes = bytes.len(),
                "apng written"
            );
        }

        self.output = Some(bytes);
        Ok(())
    }
}

pub fn ensure_parent_dir(path: &Path) -> AnimpackResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
