use std::io::Cursor;

use super::*;
use crate::apng::crc;
use crate::apng::record::{ChunkType, read_u32};

fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Split the first IDAT record in two at `at` data bytes.
fn split_idat(png: &[u8], at: usize) -> Vec<u8> {
    let mut out = png[..8].to_vec();
    let mut off = 8;
    let mut done = false;
    while off < png.len() {
        let len = read_u32(png, off) as usize;
        let rec = &png[off..off + len + 12];
        if &rec[4..8] == b"IDAT" && !done && len > at {
            for part in [&rec[8..8 + at], &rec[8 + at..8 + len]] {
                let mut r = (part.len() as u32).to_be_bytes().to_vec();
                r.extend_from_slice(b"IDAT");
                r.extend_from_slice(part);
                r.extend_from_slice(&[0; 4]);
                crc::stamp(&mut r);
                out.extend_from_slice(&r);
            }
            done = true;
        } else {
            out.extend_from_slice(rec);
        }
        off += len + 12;
    }
    assert!(done);
    out
}

/// `(type, record bytes)` for every record after the signature.
fn records(apng: &[u8]) -> Vec<(ChunkType, Vec<u8>)> {
    let mut out = Vec::new();
    let mut off = 8;
    while off < apng.len() {
        let len = read_u32(apng, off) as usize;
        let rec = apng[off..off + len + 12].to_vec();
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&rec[4..8]);
        out.push((ChunkType(tag), rec));
        off += len + 12;
    }
    out
}

#[test]
fn frame_store_tracks_running_max() {
    let mut b = ApngBuilder::new(ApngOptions::default());
    b.add_frame(&solid_png(4, 1, [0, 0, 0, 255])).unwrap();
    assert_eq!(b.store().max_size(), (4, 1));
    b.add_frame(&solid_png(2, 3, [0, 0, 0, 255])).unwrap();
    assert_eq!(b.store().max_size(), (4, 3));
    assert_eq!(b.store().first_size(), Some((4, 1)));
    assert_eq!(b.canvas_size(), (4, 3));
}

#[test]
fn first_frame_canvas_sizing_locks_to_first_header() {
    let mut b = ApngBuilder::new(ApngOptions {
        canvas: CanvasSizing::FirstFrame,
        ..ApngOptions::default()
    });
    b.add_frame(&solid_png(2, 2, [0, 0, 0, 255])).unwrap();
    b.add_frame(&solid_png(6, 5, [0, 0, 0, 255])).unwrap();
    assert_eq!(b.canvas_size(), (2, 2));
}

#[test]
fn empty_builder_serializes_fixed_records_only() {
    let b = ApngBuilder::default();
    let out = b.finalize();
    assert_eq!(out.len(), 8 + 25 + 20 + 12);
    let recs = records(&out);
    let tags: Vec<_> = recs.iter().map(|(t, _)| *t).collect();
    assert_eq!(tags, vec![ChunkType::IHDR, ChunkType::ACTL, ChunkType::IEND]);
    assert_eq!(read_u32(&recs[1].1, 8), 0);
}

#[test]
fn sequence_numbers_cover_fctl_and_fdat_without_gaps() {
    let mut b = ApngBuilder::default();
    b.add_frame(&split_idat(&solid_png(3, 3, [1, 2, 3, 255]), 4))
        .unwrap();
    b.add_frame(&split_idat(&solid_png(3, 3, [4, 5, 6, 255]), 4))
        .unwrap();
    b.add_frame(&solid_png(3, 3, [7, 8, 9, 255])).unwrap();
    assert_eq!(b.store().frames()[0].chunks().len(), 2);

    let out = b.finalize();
    let seqs: Vec<u32> = records(&out)
        .iter()
        .filter(|(t, _)| *t == ChunkType::FCTL || *t == ChunkType::FDAT)
        .map(|(_, r)| read_u32(r, 8))
        .collect();
    assert_eq!(seqs, (0..seqs.len() as u32).collect::<Vec<_>>());
    // 3 fcTL + 2 fdAT (frame 1) + 1 fdAT (frame 2)
    assert_eq!(seqs.len(), 6);
}

#[test]
fn first_frame_pixel_records_are_verbatim() {
    let png = split_idat(&solid_png(2, 2, [9, 9, 9, 255]), 3);
    let mut b = ApngBuilder::default();
    b.add_frame(&png).unwrap();
    let captured: Vec<Vec<u8>> = b.store().frames()[0]
        .chunks()
        .iter()
        .map(|c| c.record.clone())
        .collect();

    let out = b.finalize();
    let idats: Vec<Vec<u8>> = records(&out)
        .into_iter()
        .filter(|(t, _)| *t == ChunkType::IDAT)
        .map(|(_, r)| r)
        .collect();
    assert_eq!(idats, captured);
}

#[test]
fn encoded_len_matches_output() {
    let mut b = ApngBuilder::default();
    b.add_frame(&solid_png(2, 2, [0, 0, 0, 255])).unwrap();
    b.add_frame(b"garbage").unwrap();
    b.add_frame(&split_idat(&solid_png(5, 4, [0, 9, 0, 255]), 2))
        .unwrap();
    assert_eq!(b.encoded_len(), b.finalize().len());
}

#[test]
fn finalize_is_repeatable() {
    let mut b = ApngBuilder::default();
    b.add_frame(&solid_png(2, 2, [0, 0, 0, 255])).unwrap();
    b.add_frame(&solid_png(2, 2, [255, 0, 0, 255])).unwrap();
    assert_eq!(b.finalize(), b.finalize());
}

#[test]
fn skip_policy_counts_malformed_frame() {
    let mut b = ApngBuilder::default();
    b.add_frame(&solid_png(2, 2, [0, 0, 0, 255])).unwrap();
    b.add_frame(&[0u8, 1, 2, 3]).unwrap();
    assert_eq!(b.frame_count(), 2);
    assert!(b.store().frames()[1].is_empty());

    let out = b.finalize();
    let recs = records(&out);
    let fctls = recs.iter().filter(|(t, _)| *t == ChunkType::FCTL).count();
    assert_eq!(fctls, 1);
    let actl = &recs.iter().find(|(t, _)| *t == ChunkType::ACTL).unwrap().1;
    assert_eq!(read_u32(actl, 8), 2);
}

#[test]
fn abort_policy_surfaces_decode_error() {
    let mut b = ApngBuilder::new(ApngOptions {
        malformed: MalformedFramePolicy::Abort,
        ..ApngOptions::default()
    });
    let err = b.add_frame(b"\x00\x00not a png").unwrap_err();
    assert!(matches!(
        err,
        AnimpackError::Decode(crate::foundation::error::DecodeError::BadSignature)
    ));
    assert_eq!(b.frame_count(), 0);
}

#[test]
fn format_is_copied_from_first_frame_only() {
    let gray = {
        let img = image::GrayImage::from_pixel(2, 2, image::Luma([7]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    };

    let mut b = ApngBuilder::default();
    b.add_frame(&gray).unwrap();
    b.add_frame(&solid_png(2, 2, [0, 0, 0, 255])).unwrap();
    assert_eq!(b.store().format().color_type, 0);

    let mut b = ApngBuilder::default();
    b.add_frame(b"nope").unwrap();
    b.add_frame(&gray).unwrap();
    assert_eq!(b.store().format(), PixelFormat::RGBA8);
}

#[test]
fn every_output_record_checksum_is_valid() {
    let mut b = ApngBuilder::new(ApngOptions {
        loop_count: 3,
        delay: Delay::new(1, 12),
        ..ApngOptions::default()
    });
    for shade in [0u8, 80, 160, 240] {
        b.add_frame(&solid_png(3, 2, [shade, shade, shade, 255]))
            .unwrap();
    }
    for (_, rec) in records(&b.finalize()) {
        let end = rec.len() - 4;
        assert_eq!(read_u32(&rec, end), crc::checksum(&rec[4..end]));
    }
}

#[test]
fn sequence_counter_wraps() {
    let mut seq = SequenceCounter(u32::MAX);
    assert_eq!(seq.next(), u32::MAX);
    assert_eq!(seq.next(), 0);
}

#[test]
fn frame_count_saturates_at_u32_max() {
    assert_eq!(saturating_u32(7), 7);
    assert_eq!(saturating_u32(u32::MAX as usize), u32::MAX);
    assert_eq!(saturating_u32(usize::MAX), u32::MAX);
}
