use super::*;

#[test]
fn header_record_matches_known_bytes() {
    let rec = HeaderRecord {
        width: 400,
        height: 80,
        format: PixelFormat::RGBA8,
    }
    .to_bytes();
    assert_eq!(
        rec,
        [
            0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x01, 0x90, 0x00, 0x00,
            0x00, 0x50, 0x08, 0x06, 0x00, 0x00, 0x00, 0x37, 0x20, 0x23, 0xcc,
        ]
    );
}

#[test]
fn animation_control_matches_known_bytes() {
    let rec = AnimationControl {
        num_frames: 31,
        num_plays: 0,
    }
    .to_bytes();
    assert_eq!(
        rec,
        [
            0x00, 0x00, 0x00, 0x08, 0x61, 0x63, 0x54, 0x4c, 0x00, 0x00, 0x00, 0x1f, 0x00, 0x00,
            0x00, 0x00, 0x6b, 0xfd, 0xc0, 0x43,
        ]
    );
}

#[test]
fn frame_control_matches_known_bytes() {
    let rec = FrameControl::new(0, 32, 32, Delay::new(100, 1000)).to_bytes();
    assert_eq!(
        rec,
        [
            0x00, 0x00, 0x00, 0x1a, 0x66, 0x63, 0x54, 0x4c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x20, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x64, 0x03, 0xe8, 0x01, 0x00, 0x6a, 0x3d, 0x41, 0xb6,
        ]
    );
}

#[test]
fn frame_control_fields_read_back() {
    let fc = FrameControl::new(7, 640, 480, Delay::new(1, 24));
    let rec = fc.to_bytes();
    assert_eq!(read_u32(&rec, 8), 7);
    assert_eq!(read_u32(&rec, 12), 640);
    assert_eq!(read_u32(&rec, 16), 480);
    assert_eq!(read_u16(&rec, 28), 1);
    assert_eq!(read_u16(&rec, 30), 24);
    assert_eq!(FrameControl::from_bytes(&rec), Some(fc));
    assert_eq!(fc.dispose, DisposeOp::Background);
    assert_eq!(fc.blend, BlendOp::Source);
}

#[test]
fn frame_control_from_bytes_rejects_other_records() {
    assert_eq!(FrameControl::from_bytes(&trailer()), None);

    let mut rec = FrameControl::new(0, 1, 1, Delay::default()).to_bytes();
    rec[32] = 9;
    assert_eq!(FrameControl::from_bytes(&rec), None);
}

#[test]
fn trailer_is_standard_iend() {
    assert_eq!(
        trailer(),
        [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
    );
}

#[test]
fn continuation_record_prefixes_sequence_and_restamps() {
    let mut idat = vec![0, 0, 0, 3, b'I', b'D', b'A', b'T', 0xAA, 0xBB, 0xCC, 0, 0, 0, 0];
    crc::stamp(&mut idat);

    let fdat = continuation_record(&idat, 5);
    assert_eq!(fdat.len(), continuation_len(idat.len()));
    assert_eq!(read_u32(&fdat, 0), 7);
    assert_eq!(&fdat[4..8], b"fdAT");
    assert_eq!(read_u32(&fdat, 8), 5);
    assert_eq!(&fdat[12..15], &[0xAA, 0xBB, 0xCC]);

    let end = fdat.len() - 4;
    assert_eq!(read_u32(&fdat, end), crc::checksum(&fdat[4..end]));
}

#[test]
fn chunk_type_display_escapes_non_ascii() {
    assert_eq!(ChunkType::FDAT.to_string(), "fdAT");
    assert_eq!(ChunkType([b'a', 0, b'b', 0xff]).to_string(), "a\\x00b\\xff");
}
