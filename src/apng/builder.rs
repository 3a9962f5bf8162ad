//! Frame store and APNG serializer.

use crate::apng::chunk::{self, ExtractedImage, StillImageChunk};
use crate::apng::record::{
    AnimationControl, FrameControl, HeaderRecord, PNG_SIGNATURE, PixelFormat, TRAILER_LEN,
    continuation_len, continuation_record, trailer,
};
use crate::foundation::core::Delay;
use crate::foundation::error::{AnimpackError, AnimpackResult};

/// What `add_frame` does with an input that cannot be split into records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedFramePolicy {
    /// Record the frame with no pixel data. It still counts toward `acTL.num_frames`.
    #[default]
    Skip,
    /// Return the decode error and leave the store untouched.
    Abort,
}

/// How the IHDR canvas size is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasSizing {
    /// Largest width and largest height over all ingested frames.
    #[default]
    RunningMax,
    /// Size of the first frame whose header was read.
    FirstFrame,
}

/// Builder configuration. Fixed for the builder's lifetime, so it applies to every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApngOptions {
    /// `acTL.num_plays`; 0 loops forever.
    pub loop_count: u32,
    /// Delay written into every `fcTL`.
    pub delay: Delay,
    pub malformed: MalformedFramePolicy,
    pub canvas: CanvasSizing,
}

/// Pixel-data records of one `add_frame` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    chunks: Vec<StillImageChunk>,
}

impl Frame {
    pub fn chunks(&self) -> &[StillImageChunk] {
        &self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Ingested frames in insertion order plus the geometry gathered from their headers.
#[derive(Clone, Debug, Default)]
pub struct FrameStore {
    frames: Vec<Frame>,
    max_width: u32,
    max_height: u32,
    first_size: Option<(u32, u32)>,
    format: Option<PixelFormat>,
}

impl FrameStore {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Running maximum of width and height over every header seen so far.
    pub fn max_size(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    /// Size from the first header seen, if any.
    pub fn first_size(&self) -> Option<(u32, u32)> {
        self.first_size
    }

    /// Pixel format of the first ingested frame, or 8-bit RGBA when it had none.
    pub fn format(&self) -> PixelFormat {
        self.format.unwrap_or_default()
    }

    fn push(&mut self, image: ExtractedImage) {
        if let Some(h) = image.header {
            self.max_width = self.max_width.max(h.width);
            self.max_height = self.max_height.max(h.height);
            self.first_size.get_or_insert((h.width, h.height));
            if self.frames.is_empty() {
                self.format = Some(h.format);
            }
        }
        self.frames.push(Frame {
            chunks: image.chunks,
        });
    }

    fn push_empty(&mut self) {
        self.frames.push(Frame::default());
    }
}

/// Global fcTL/fdAT sequence numbering: starts at 0, one value per emitted record.
#[derive(Debug, Default)]
struct SequenceCounter(u32);

impl SequenceCounter {
    fn next(&mut self) -> u32 {
        let v = self.0;
        self.0 = self.0.wrapping_add(1);
        v
    }
}

/// `acTL.num_frames` is a u32 field; counts past it are pinned to the maximum.
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// How a frame's pixel records are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PixelEmission {
    /// Default image: the captured IDAT records, untouched.
    Verbatim,
    /// Later frames: fdAT records with a sequence number.
    Continuation,
}

impl PixelEmission {
    fn for_frame(index: usize) -> Self {
        if index == 0 {
            Self::Verbatim
        } else {
            Self::Continuation
        }
    }
}

/// Assembles independently encoded still PNGs into one animated PNG.
///
/// Frames must be added in display order. `finalize` can be called any number of times and
/// returns the same bytes for the same state.
#[derive(Debug, Default)]
pub struct ApngBuilder {
    opts: ApngOptions,
    store: FrameStore,
}

impl ApngBuilder {
    pub fn new(opts: ApngOptions) -> Self {
        Self {
            opts,
            store: FrameStore::default(),
        }
    }

    pub fn options(&self) -> &ApngOptions {
        &self.opts
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Number of `add_frame` calls that recorded a frame, saturating at `u32::MAX`.
    pub fn frame_count(&self) -> u32 {
        saturating_u32(self.store.len())
    }

    /// Split one encoded still PNG into records and append it as the next frame.
    ///
    /// Under [`MalformedFramePolicy::Skip`] a malformed buffer is recorded as an empty frame
    /// and `Ok(())` is returned.
    #[tracing::instrument(skip_all, fields(frame = self.store.len(), len = png.len()))]
    pub fn add_frame(&mut self, png: &[u8]) -> AnimpackResult<()> {
        match chunk::extract(png) {
            Ok(image) => {
                tracing::debug!(
                    chunks = image.chunks.len(),
                    width = image.header.map(|h| h.width),
                    height = image.header.map(|h| h.height),
                    "frame extracted"
                );
                self.store.push(image);
                Ok(())
            }
            Err(err) => match self.opts.malformed {
                MalformedFramePolicy::Skip => {
                    tracing::warn!(error = %err, "malformed frame recorded without pixel data");
                    self.store.push_empty();
                    Ok(())
                }
                MalformedFramePolicy::Abort => Err(AnimpackError::Decode(err)),
            },
        }
    }

    /// IHDR width/height that `finalize` will write.
    pub fn canvas_size(&self) -> (u32, u32) {
        match self.opts.canvas {
            CanvasSizing::RunningMax => self.store.max_size(),
            CanvasSizing::FirstFrame => self
                .store
                .first_size()
                .unwrap_or_else(|| self.store.max_size()),
        }
    }

    /// Exact byte length of the `finalize` output.
    pub fn encoded_len(&self) -> usize {
        let fixed = PNG_SIGNATURE.len() + HeaderRecord::LEN + AnimationControl::LEN + TRAILER_LEN;
        let frames: usize = self
            .store
            .frames()
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_empty())
            .map(|(i, f)| {
                let emission = PixelEmission::for_frame(i);
                let pixels: usize = f
                    .chunks()
                    .iter()
                    .map(|c| match emission {
                        PixelEmission::Verbatim => c.record.len(),
                        PixelEmission::Continuation => continuation_len(c.record.len()),
                    })
                    .sum();
                FrameControl::LEN + pixels
            })
            .sum();
        fixed + frames
    }

    /// Serialize the animated PNG.
    ///
    /// Layout: signature, IHDR, acTL, then per frame an fcTL followed by its pixel records,
    /// then IEND. A frame without pixel records emits nothing and consumes no sequence number.
    #[tracing::instrument(skip_all, fields(frames = self.store.len()))]
    pub fn finalize(&self) -> Vec<u8> {
        let len = self.encoded_len();
        let mut out = Vec::with_capacity(len);
        let (width, height) = self.canvas_size();

        out.extend_from_slice(&PNG_SIGNATURE);
        out.extend_from_slice(
            &HeaderRecord {
                width,
                height,
                format: self.store.format(),
            }
            .to_bytes(),
        );
        out.extend_from_slice(
            &AnimationControl {
                num_frames: self.frame_count(),
                num_plays: self.opts.loop_count,
            }
            .to_bytes(),
        );

        let mut seq = SequenceCounter::default();
        for (i, frame) in self.store.frames().iter().enumerate() {
            let Some(first) = frame.chunks().first() else {
                continue;
            };
            let fctl = FrameControl::new(seq.next(), first.width, first.height, self.opts.delay);
            out.extend_from_slice(&fctl.to_bytes());

            match PixelEmission::for_frame(i) {
                PixelEmission::Verbatim => {
                    for c in frame.chunks() {
                        out.extend_from_slice(&c.record);
                    }
                }
                PixelEmission::Continuation => {
                    for c in frame.chunks() {
                        out.extend_from_slice(&continuation_record(&c.record, seq.next()));
                    }
                }
            }
        }

        out.extend_from_slice(&trailer());
        debug_assert_eq!(out.len(), len);
        tracing::debug!(bytes = out.len(), width, height, "apng serialized");
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/apng/builder.rs"]
mod tests;
