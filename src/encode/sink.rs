use crate::foundation::core::{Canvas, Delay, FrameIndex};
use crate::foundation::error::AnimpackResult;
use crate::render::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy)]
pub struct SinkConfig {
    /// Size every pushed raster frame must have; `None` when frames carry their own geometry.
    pub canvas: Option<Canvas>,
    /// Display time of every frame.
    pub delay: Delay,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> AnimpackResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> AnimpackResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> AnimpackResult<()>;
}
