//! Fixed-layout record templates and big-endian field access.
//!
//! Every structural record is rebuilt from a `const` template on each emission; nothing is
//! shared between two emitted records.

use std::fmt;

use crate::apng::crc;
use crate::foundation::core::Delay;

/// 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// `length(4) | type(4) | crc(4)` around every record's data.
pub const RECORD_OVERHEAD: usize = 12;

/// 4-byte ASCII record type tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    pub const ACTL: Self = Self(*b"acTL");
    pub const FCTL: Self = Self(*b"fcTL");
    pub const FDAT: Self = Self(*b"fdAT");
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

pub(crate) fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_be_bytes(b)
}

pub(crate) fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

pub(crate) fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

pub(crate) fn write_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

pub(crate) fn write_u8(buf: &mut [u8], offset: usize, value: u8) {
    buf[offset] = value;
}

/// Image-header fields that describe how pixel data is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelFormat {
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl PixelFormat {
    /// 8-bit RGBA, non-interlaced.
    pub const RGBA8: Self = Self {
        bit_depth: 8,
        color_type: 6,
        compression: 0,
        filter: 0,
        interlace: 0,
    };

    /// Read the five format bytes that follow width/height in IHDR data.
    pub(crate) fn from_ihdr_data(data: &[u8]) -> Self {
        Self {
            bit_depth: data[8],
            color_type: data[9],
            compression: data[10],
            filter: data[11],
            interlace: data[12],
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::RGBA8
    }
}

/// Frame area disposal applied after a frame is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DisposeOp {
    None = 0,
    #[default]
    Background = 1,
    Previous = 2,
}

/// How a frame is combined with the output buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum BlendOp {
    #[default]
    Source = 0,
    Over = 1,
}

impl DisposeOp {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Background),
            2 => Some(Self::Previous),
            _ => None,
        }
    }
}

impl BlendOp {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Source),
            1 => Some(Self::Over),
            _ => None,
        }
    }
}

const IHDR_TEMPLATE: [u8; HeaderRecord::LEN] = [
    0x00, 0x00, 0x00, 0x0d, b'I', b'H', b'D', b'R', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0,
];
const IHDR_WIDTH: usize = 8;
const IHDR_HEIGHT: usize = 12;
const IHDR_BIT_DEPTH: usize = 16;

const ACTL_TEMPLATE: [u8; AnimationControl::LEN] = [
    0x00, 0x00, 0x00, 0x08, b'a', b'c', b'T', b'L', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];
const ACTL_NUM_FRAMES: usize = 8;
const ACTL_NUM_PLAYS: usize = 12;

const FCTL_TEMPLATE: [u8; FrameControl::LEN] = [
    0x00, 0x00, 0x00, 0x1a, b'f', b'c', b'T', b'L', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];
const FCTL_SEQUENCE: usize = 8;
const FCTL_WIDTH: usize = 12;
const FCTL_HEIGHT: usize = 16;
const FCTL_X_OFFSET: usize = 20;
const FCTL_Y_OFFSET: usize = 24;
const FCTL_DELAY_NUM: usize = 28;
const FCTL_DELAY_DEN: usize = 30;
const FCTL_DISPOSE: usize = 32;
const FCTL_BLEND: usize = 33;

const IEND_TEMPLATE: [u8; TRAILER_LEN] = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0, 0, 0, 0];

/// Length of the zero-data IEND record.
pub const TRAILER_LEN: usize = 12;

/// IHDR record contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderRecord {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl HeaderRecord {
    pub const LEN: usize = 25;

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut rec = IHDR_TEMPLATE;
        write_u32(&mut rec, IHDR_WIDTH, self.width);
        write_u32(&mut rec, IHDR_HEIGHT, self.height);
        let f = self.format;
        rec[IHDR_BIT_DEPTH..IHDR_BIT_DEPTH + 5].copy_from_slice(&[
            f.bit_depth,
            f.color_type,
            f.compression,
            f.filter,
            f.interlace,
        ]);
        crc::stamp(&mut rec);
        rec
    }
}

/// acTL record contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationControl {
    pub num_frames: u32,
    /// 0 loops forever.
    pub num_plays: u32,
}

impl AnimationControl {
    pub const LEN: usize = 20;

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut rec = ACTL_TEMPLATE;
        write_u32(&mut rec, ACTL_NUM_FRAMES, self.num_frames);
        write_u32(&mut rec, ACTL_NUM_PLAYS, self.num_plays);
        crc::stamp(&mut rec);
        rec
    }
}

/// fcTL record contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameControl {
    pub sequence: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    pub delay: Delay,
    pub dispose: DisposeOp,
    pub blend: BlendOp,
}

impl FrameControl {
    pub const LEN: usize = 38;

    /// Full-canvas frame at the origin, cleared to background and drawn with source-replace.
    pub fn new(sequence: u32, width: u32, height: u32, delay: Delay) -> Self {
        Self {
            sequence,
            width,
            height,
            x_offset: 0,
            y_offset: 0,
            delay,
            dispose: DisposeOp::Background,
            blend: BlendOp::Source,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut rec = FCTL_TEMPLATE;
        write_u32(&mut rec, FCTL_SEQUENCE, self.sequence);
        write_u32(&mut rec, FCTL_WIDTH, self.width);
        write_u32(&mut rec, FCTL_HEIGHT, self.height);
        write_u32(&mut rec, FCTL_X_OFFSET, self.x_offset);
        write_u32(&mut rec, FCTL_Y_OFFSET, self.y_offset);
        write_u16(&mut rec, FCTL_DELAY_NUM, self.delay.num);
        write_u16(&mut rec, FCTL_DELAY_DEN, self.delay.den);
        write_u8(&mut rec, FCTL_DISPOSE, self.dispose as u8);
        write_u8(&mut rec, FCTL_BLEND, self.blend as u8);
        crc::stamp(&mut rec);
        rec
    }

    /// Read the fields back out of an encoded fcTL record.
    ///
    /// Returns `None` if `rec` is not a 38-byte fcTL record with known dispose/blend values.
    pub fn from_bytes(rec: &[u8]) -> Option<Self> {
        if rec.len() != Self::LEN || rec[4..8] != ChunkType::FCTL.0 {
            return None;
        }
        Some(Self {
            sequence: read_u32(rec, FCTL_SEQUENCE),
            width: read_u32(rec, FCTL_WIDTH),
            height: read_u32(rec, FCTL_HEIGHT),
            x_offset: read_u32(rec, FCTL_X_OFFSET),
            y_offset: read_u32(rec, FCTL_Y_OFFSET),
            delay: Delay::new(read_u16(rec, FCTL_DELAY_NUM), read_u16(rec, FCTL_DELAY_DEN)),
            dispose: DisposeOp::from_u8(rec[FCTL_DISPOSE])?,
            blend: BlendOp::from_u8(rec[FCTL_BLEND])?,
        })
    }
}

/// Zero-length IEND record.
pub fn trailer() -> [u8; TRAILER_LEN] {
    let mut rec = IEND_TEMPLATE;
    crc::stamp(&mut rec);
    rec
}

/// Encoded size of the fdAT record built from a pixel-data record of `pixel_record_len` bytes.
pub fn continuation_len(pixel_record_len: usize) -> usize {
    pixel_record_len + 4
}

/// Rewrap a complete IDAT record as an fdAT record carrying `sequence`.
///
/// The data bytes are reused unchanged; the length grows by 4 for the sequence number and the
/// checksum is recomputed.
pub fn continuation_record(pixel_record: &[u8], sequence: u32) -> Vec<u8> {
    debug_assert!(pixel_record.len() >= RECORD_OVERHEAD);
    let data = &pixel_record[8..pixel_record.len() - 4];
    let data_len = (data.len() as u32).wrapping_add(4);

    let mut rec = Vec::with_capacity(continuation_len(pixel_record.len()));
    rec.extend_from_slice(&data_len.to_be_bytes());
    rec.extend_from_slice(&ChunkType::FDAT.0);
    rec.extend_from_slice(&sequence.to_be_bytes());
    rec.extend_from_slice(data);
    rec.extend_from_slice(&[0; 4]);
    crc::stamp(&mut rec);
    rec
}

#[cfg(test)]
#[path = "../../tests/unit/apng/record.rs"]
mod tests;
