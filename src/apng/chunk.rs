//! Splitting a single still PNG into the records the container reuses.

use crate::apng::record::{ChunkType, PixelFormat, RECORD_OVERHEAD, read_u32};
use crate::foundation::error::DecodeError;

/// The two leading signature bytes checked before any record is parsed.
const SIGNATURE_PREFIX: [u8; 2] = [0x89, 0x50];

/// Records start right after the 8-byte signature.
const FIRST_RECORD_OFFSET: usize = 8;

/// Minimum IHDR data length (width, height, five format bytes).
const IHDR_DATA_LEN: usize = 13;

/// One pixel-data record captured verbatim from an input image.
///
/// `width`/`height` come from the IHDR record that preceded it in the same image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StillImageChunk {
    pub width: u32,
    pub height: u32,
    /// Complete record bytes: `length | IDAT | data | crc`.
    pub record: Vec<u8>,
}

impl StillImageChunk {
    /// Compressed pixel bytes without the record framing.
    pub fn data(&self) -> &[u8] {
        &self.record[8..self.record.len() - 4]
    }
}

/// IHDR fields of an input image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

/// Everything the container needs from one input image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedImage {
    /// Most recently seen IHDR, if any.
    pub header: Option<ImageHeader>,
    pub chunks: Vec<StillImageChunk>,
}

/// Walk the records of a still PNG and capture its header and pixel data.
///
/// Only IHDR, IDAT and IEND are interpreted; other records are skipped. Input checksums are
/// trusted and never recomputed. Scanning stops at IEND or at the end of the buffer. Every
/// declared record length is checked against the bytes that remain.
pub fn extract(bytes: &[u8]) -> Result<ExtractedImage, DecodeError> {
    if bytes.len() < SIGNATURE_PREFIX.len() || bytes[..2] != SIGNATURE_PREFIX {
        return Err(DecodeError::BadSignature);
    }
    if bytes.len() < FIRST_RECORD_OFFSET {
        return Err(DecodeError::Truncated {
            offset: 0,
            needed: FIRST_RECORD_OFFSET,
            available: bytes.len(),
        });
    }

    let mut out = ExtractedImage::default();
    let mut offset = FIRST_RECORD_OFFSET;

    while offset < bytes.len() {
        let available = bytes.len() - offset;
        if available < RECORD_OVERHEAD {
            return Err(DecodeError::Truncated {
                offset,
                needed: RECORD_OVERHEAD,
                available,
            });
        }

        let data_len = read_u32(bytes, offset);
        let needed = (data_len as usize)
            .checked_add(RECORD_OVERHEAD)
            .unwrap_or(usize::MAX);
        if needed > available {
            return Err(DecodeError::Truncated {
                offset,
                needed,
                available,
            });
        }

        let record = &bytes[offset..offset + needed];
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&record[4..8]);

        match ChunkType(tag) {
            ChunkType::IHDR => {
                if (data_len as usize) < IHDR_DATA_LEN {
                    return Err(DecodeError::ShortHeader {
                        offset,
                        len: data_len,
                    });
                }
                let data = &record[8..8 + IHDR_DATA_LEN];
                out.header = Some(ImageHeader {
                    width: read_u32(data, 0),
                    height: read_u32(data, 4),
                    format: PixelFormat::from_ihdr_data(data),
                });
            }
            ChunkType::IDAT => {
                let Some(header) = out.header else {
                    return Err(DecodeError::PixelDataBeforeHeader { offset });
                };
                out.chunks.push(StillImageChunk {
                    width: header.width,
                    height: header.height,
                    record: record.to_vec(),
                });
            }
            ChunkType::IEND => return Ok(out),
            _ => {}
        }

        offset += needed;
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/apng/chunk.rs"]
mod tests;
