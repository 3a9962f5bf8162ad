//! Animpack packs frame sequences of a vector animation into animated PNG (APNG) files.
//!
//! Frames arrive as complete still PNGs (or as SVGs that are rasterized and encoded first) and
//! are spliced into one container without recompressing pixel data:
//!
//! - Collect inputs into a [`FrameSource`]
//! - Plan which frames to keep with a [`FrameSchedule`]
//! - Feed an [`ApngBuilder`] (directly or through an [`ApngSink`]) and finalize
#![forbid(unsafe_code)]

pub mod apng;
pub mod assets;
pub mod config;
pub mod encode;
mod foundation;
pub mod pipeline;
pub mod render;
pub mod schedule;
pub mod source;

pub use crate::apng::builder::{
    ApngBuilder, ApngOptions, CanvasSizing, Frame, FrameStore, MalformedFramePolicy,
};
pub use crate::apng::chunk::{ExtractedImage, ImageHeader, StillImageChunk, extract};
pub use crate::apng::record::{BlendOp, ChunkType, DisposeOp, FrameControl, PixelFormat};
pub use crate::assets::color::Rgba8;
pub use crate::config::ConvertConfig;
pub use crate::encode::apng::{ApngSink, ApngSinkOpts};
pub use crate::encode::sink::{FrameSink, SinkConfig};
pub use crate::encode::still::{PngCompression, PngStillEncoder, StillEncoder};
pub use crate::foundation::core::{Canvas, Delay, FrameIndex};
pub use crate::foundation::error::{AnimpackError, AnimpackResult, DecodeError};
pub use crate::pipeline::{ConvertStats, convert_to_apng, write_apng};
pub use crate::render::FrameRGBA;
pub use crate::schedule::{FrameSchedule, ScheduleOpts, Timeline};
pub use crate::source::{
    FrameSource, InputKind, PngSequence, SourceFrame, SvgSequence, collect_inputs,
};
