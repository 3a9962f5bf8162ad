use std::path::Path;

use crate::config::ConvertConfig;
use crate::encode::apng::{ApngSink, ApngSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::encode::still::PngStillEncoder;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{AnimpackError, AnimpackResult};
use crate::schedule::{FrameSchedule, Timeline};
use crate::source::{FrameSource, SourceFrame};

/// Counters reported by a conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Frames available in the source.
    pub frames_total: u64,
    /// Frames written to the container.
    pub frames_written: u64,
    /// Source frames skipped by the fps ceiling.
    pub frames_dropped: u64,
}

/// Convert a frame source into APNG bytes.
pub fn convert_to_apng(
    source: &mut dyn FrameSource,
    cfg: &ConvertConfig,
) -> AnimpackResult<(Vec<u8>, ConvertStats)> {
    let mut sink = ApngSink::new(sink_opts(cfg, None), PngStillEncoder::new(cfg.compression));
    let stats = run(source, cfg, &mut sink)?;
    let bytes = sink
        .bytes()
        .ok_or_else(|| AnimpackError::encode("apng sink produced no output"))?
        .to_vec();
    Ok((bytes, stats))
}

/// Convert a frame source and write the APNG to `out_path`.
pub fn write_apng(
    source: &mut dyn FrameSource,
    cfg: &ConvertConfig,
    out_path: &Path,
) -> AnimpackResult<ConvertStats> {
    let mut sink = ApngSink::new(
        sink_opts(cfg, Some(out_path)),
        PngStillEncoder::new(cfg.compression),
    );
    run(source, cfg, &mut sink)
}

fn sink_opts(cfg: &ConvertConfig, out_path: Option<&Path>) -> ApngSinkOpts {
    ApngSinkOpts {
        out_path: out_path.map(Path::to_path_buf),
        overwrite: cfg.overwrite,
        loop_count: cfg.repeat,
        malformed: cfg.malformed_policy(),
        canvas: cfg.canvas,
    }
}

#[tracing::instrument(skip_all, fields(frames = source.len()))]
fn run(
    source: &mut dyn FrameSource,
    cfg: &ConvertConfig,
    sink: &mut ApngSink<PngStillEncoder>,
) -> AnimpackResult<ConvertStats> {
    cfg.validate()?;
    let total = u32::try_from(source.len())
        .map_err(|_| AnimpackError::validation("too many input frames"))?;
    let schedule = FrameSchedule::plan(Timeline::from_fps(total, cfg.fps)?, cfg.schedule_opts())?;
    let canvas = source.nominal_size()?;

    sink.begin(SinkConfig {
        canvas,
        delay: schedule.delay()?,
    })?;

    for (k, &src_idx) in schedule.frames.iter().enumerate() {
        let idx = FrameIndex(k as u32);
        match source.frame(src_idx)? {
            SourceFrame::Encoded(png) => sink.push_encoded(idx, &png)?,
            SourceFrame::Raster(frame) => sink.push_frame(idx, &frame)?,
        }
    }
    sink.end()?;

    let written = schedule.len() as u64;
    Ok(ConvertStats {
        frames_total: u64::from(total),
        frames_written: written,
        frames_dropped: u64::from(total) - written,
    })
}
