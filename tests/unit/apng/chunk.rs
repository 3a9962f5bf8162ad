use std::io::Cursor;

use super::*;
use crate::apng::crc;
use crate::apng::record::PNG_SIGNATURE;

fn record(tag: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut rec = Vec::with_capacity(data.len() + 12);
    rec.extend_from_slice(&(data.len() as u32).to_be_bytes());
    rec.extend_from_slice(tag);
    rec.extend_from_slice(data);
    rec.extend_from_slice(&[0; 4]);
    crc::stamp(&mut rec);
    rec
}

fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
    record(b"IHDR", &data)
}

fn png(records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    for r in records {
        out.extend_from_slice(r);
    }
    out
}

#[test]
fn captures_header_and_split_pixel_data() {
    let idat_a = record(b"IDAT", &[1, 2, 3]);
    let idat_b = record(b"IDAT", &[4, 5]);
    let bytes = png(&[
        ihdr(3, 2, 8, 6),
        record(b"tEXt", b"k\0v"),
        idat_a.clone(),
        idat_b.clone(),
        record(b"IEND", &[]),
    ]);

    let img = extract(&bytes).unwrap();
    let header = img.header.unwrap();
    assert_eq!((header.width, header.height), (3, 2));
    assert_eq!(header.format, PixelFormat::RGBA8);
    assert_eq!(img.chunks.len(), 2);
    assert_eq!(img.chunks[0].record, idat_a);
    assert_eq!(img.chunks[1].record, idat_b);
    assert_eq!(img.chunks[1].data(), &[4, 5]);
    assert!(img.chunks.iter().all(|c| c.width == 3 && c.height == 2));
}

#[test]
fn stops_at_iend() {
    let bytes = png(&[
        ihdr(1, 1, 8, 6),
        record(b"IDAT", &[9]),
        record(b"IEND", &[]),
        record(b"IDAT", &[7]),
    ]);
    assert_eq!(extract(&bytes).unwrap().chunks.len(), 1);
}

#[test]
fn missing_iend_returns_what_was_collected() {
    let bytes = png(&[ihdr(1, 1, 8, 6), record(b"IDAT", &[9])]);
    assert_eq!(extract(&bytes).unwrap().chunks.len(), 1);
}

#[test]
fn input_checksums_are_trusted() {
    let mut idat = record(b"IDAT", &[1, 2, 3]);
    let end = idat.len() - 4;
    idat[end..].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let bytes = png(&[ihdr(1, 1, 8, 6), idat.clone(), record(b"IEND", &[])]);

    let img = extract(&bytes).unwrap();
    assert_eq!(img.chunks[0].record, idat);
}

#[test]
fn rejects_bad_signature_prefix() {
    let mut bytes = png(&[ihdr(1, 1, 8, 6), record(b"IEND", &[])]);
    bytes[1] = b'X';
    assert_eq!(extract(&bytes), Err(DecodeError::BadSignature));
    assert_eq!(extract(&[]), Err(DecodeError::BadSignature));
}

#[test]
fn only_the_two_byte_prefix_is_checked() {
    let mut bytes = png(&[ihdr(1, 1, 8, 6), record(b"IEND", &[])]);
    bytes[2..8].copy_from_slice(&[0; 6]);
    assert!(extract(&bytes).is_ok());
}

#[test]
fn rejects_record_longer_than_buffer() {
    let mut bytes = png(&[ihdr(1, 1, 8, 6), record(b"IDAT", &[1, 2, 3, 4])]);
    bytes.truncate(bytes.len() - 3);
    assert_eq!(
        extract(&bytes),
        Err(DecodeError::Truncated {
            offset: 33,
            needed: 16,
            available: 13,
        })
    );
}

#[test]
fn rejects_trailing_partial_framing() {
    let mut bytes = png(&[ihdr(1, 1, 8, 6)]);
    bytes.extend_from_slice(&[0, 0, 0]);
    assert!(matches!(
        extract(&bytes),
        Err(DecodeError::Truncated { needed: 12, available: 3, .. })
    ));
}

#[test]
fn rejects_huge_declared_length() {
    let mut bytes = png(&[ihdr(1, 1, 8, 6)]);
    bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
    bytes.extend_from_slice(b"IDAT");
    bytes.extend_from_slice(&[0; 8]);
    assert!(matches!(extract(&bytes), Err(DecodeError::Truncated { .. })));
}

#[test]
fn rejects_short_header_and_orphan_pixel_data() {
    let bytes = png(&[record(b"IHDR", &[0; 8])]);
    assert_eq!(
        extract(&bytes),
        Err(DecodeError::ShortHeader { offset: 8, len: 8 })
    );

    let bytes = png(&[record(b"IDAT", &[1])]);
    assert_eq!(
        extract(&bytes),
        Err(DecodeError::PixelDataBeforeHeader { offset: 8 })
    );
}

#[test]
fn extracts_from_image_crate_png() {
    let img = image::RgbaImage::from_pixel(5, 3, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let out = extract(&buf).unwrap();
    let header = out.header.unwrap();
    assert_eq!((header.width, header.height), (5, 3));
    assert_eq!(header.format.bit_depth, 8);
    assert_eq!(header.format.color_type, 6);
    assert!(!out.chunks.is_empty());
}
