//! Record checksums.
//!
//! PNG stamps every record with CRC-32/ISO-HDLC (reflected, polynomial `0xEDB88320`,
//! initial value and final xor `0xFFFFFFFF`) over the type tag and data bytes.

/// CRC-32/ISO-HDLC of `bytes`.
pub fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// Recompute the trailing checksum of a complete record in place.
///
/// `record` is laid out as `length(4) | type(4) | data | crc(4)`; the checksum covers
/// everything between the length prefix and the checksum field.
pub fn stamp(record: &mut [u8]) {
    debug_assert!(record.len() >= 12, "record shorter than its framing");
    let end = record.len() - 4;
    let crc = checksum(&record[4..end]);
    record[end..].copy_from_slice(&crc.to_be_bytes());
}
