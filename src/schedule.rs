//! Choosing which source frames make it into the output and how long each is shown.

use crate::foundation::core::Delay;
use crate::foundation::error::{AnimpackError, AnimpackResult};

/// Source animation timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    pub total_frames: u32,
    pub duration_secs: f64,
}

impl Timeline {
    /// Timeline of `total_frames` frames played back at `fps`.
    pub fn from_fps(total_frames: u32, fps: f64) -> AnimpackResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnimpackError::validation("fps must be finite and > 0"));
        }
        Ok(Self {
            total_frames,
            duration_secs: f64::from(total_frames) / fps,
        })
    }
}

/// Playback adjustments applied on top of a [`Timeline`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleOpts {
    /// Output frame rate ceiling. Faster animations drop frames to stay under it.
    pub max_fps: f64,
    /// Playback speed multiplier.
    pub speed: f64,
}

impl Default for ScheduleOpts {
    fn default() -> Self {
        Self {
            max_fps: 60.0,
            speed: 1.0,
        }
    }
}

/// Source frame indices to emit, in order, and the rate they are shown at.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSchedule {
    /// Frame rate of the source after `speed` is applied.
    pub source_fps: f64,
    /// Output frame rate, `min(source_fps, max_fps)`.
    pub fps: f64,
    pub frames: Vec<u32>,
}

impl FrameSchedule {
    pub fn plan(timeline: Timeline, opts: ScheduleOpts) -> AnimpackResult<Self> {
        if timeline.total_frames == 0 {
            return Err(AnimpackError::validation("animation has no frames"));
        }
        if !timeline.duration_secs.is_finite() || timeline.duration_secs <= 0.0 {
            return Err(AnimpackError::validation(
                "animation duration must be finite and > 0",
            ));
        }
        if !opts.speed.is_finite() || opts.speed <= 0.0 {
            return Err(AnimpackError::validation("speed must be finite and > 0"));
        }
        if !opts.max_fps.is_finite() || opts.max_fps <= 0.0 {
            return Err(AnimpackError::validation("max fps must be finite and > 0"));
        }

        let total = timeline.total_frames;
        let source_fps = f64::from(total) / (timeline.duration_secs / opts.speed);
        let fps = source_fps.min(opts.max_fps);

        if source_fps > fps {
            tracing::warn!(
                source_fps,
                max_fps = opts.max_fps,
                dropped_pct = (1.0 - fps / source_fps) * 100.0,
                "animation is faster than the fps ceiling; frames will be dropped"
            );
        }

        let increment = if source_fps > fps {
            source_fps / fps
        } else {
            1.0
        };

        let mut frames = Vec::new();
        let mut k = 0u32;
        loop {
            let rel = f64::from(k) * increment;
            if rel >= f64::from(total) {
                break;
            }
            frames.push((rel.round() as u32).min(total - 1));
            k += 1;
        }

        Ok(Self {
            source_fps,
            fps,
            frames,
        })
    }

    /// Delay shared by every emitted frame.
    pub fn delay(&self) -> AnimpackResult<Delay> {
        Delay::from_fps(self.fps)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
