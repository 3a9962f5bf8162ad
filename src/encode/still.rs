use std::io::Cursor;

use image::ImageEncoder as _;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::foundation::error::{AnimpackError, AnimpackResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::FrameRGBA;

/// Turns one rendered frame into a complete single-image file.
pub trait StillEncoder {
    fn encode(&mut self, frame: &FrameRGBA) -> AnimpackResult<Vec<u8>>;
}

/// zlib effort for [`PngStillEncoder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

/// RGBA8 PNG encoder backed by the `image` crate.
#[derive(Debug, Default)]
pub struct PngStillEncoder {
    compression: PngCompression,
    scratch: Vec<u8>,
}

impl PngStillEncoder {
    pub fn new(compression: PngCompression) -> Self {
        Self {
            compression,
            scratch: Vec::new(),
        }
    }
}

impl StillEncoder for PngStillEncoder {
    fn encode(&mut self, frame: &FrameRGBA) -> AnimpackResult<Vec<u8>> {
        frame.validate()?;

        let pixels: &[u8] = if frame.premultiplied {
            self.scratch.clear();
            self.scratch.extend_from_slice(&frame.data);
            unpremultiply_rgba8_in_place(&mut self.scratch);
            &self.scratch
        } else {
            &frame.data
        };

        let compression = match self.compression {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        };

        let mut out = Vec::new();
        PngEncoder::new_with_quality(Cursor::new(&mut out), compression, FilterType::Adaptive)
            .write_image(
                pixels,
                frame.width,
                frame.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| AnimpackError::encode(format!("png encode failed: {e}")))?;
        Ok(out)
    }
}
