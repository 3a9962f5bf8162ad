//! Animated PNG container assembly.
//!
//! Input frames are complete still PNGs produced elsewhere. Their pixel-data records are reused
//! as-is: the first frame's IDAT records become the default image, later frames are rewrapped
//! as fdAT records. No pixel data is decoded or recompressed.

/// Frame store and serializer.
pub mod builder;
/// Still PNG record extraction.
pub mod chunk;
/// CRC-32 stamping.
pub mod crc;
/// Record templates and field codec.
pub mod record;
