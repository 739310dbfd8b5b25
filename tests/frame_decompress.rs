//! End-to-end wire-format scenarios, each a complete frame written out
//! byte by byte so the expected decoder behavior is visible in the test.

mod common;

use unlz4::{DecodeError, Decoder};

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 1 — empty-payload frame
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_payload_frame() {
    let frame = [
        0x04, 0x22, 0x4D, 0x18, // magic
        0x40, // flags: version bits only
        0x40, // block max size (ignored)
        0x00, // header checksum (not verified by default)
        0x00, 0x00, 0x00, 0x00, // end mark
    ];
    let mut decoder = Decoder::new();
    let mut out = [0u8; 8];
    let p = decoder.decompress(&frame, &mut out).unwrap();
    assert_eq!(p.consumed, frame.len());
    assert_eq!(p.produced, 0);
    assert!(p.done);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 2 — single literal byte
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn literals_only_block() {
    let frame = [
        0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0x00, // header
        0x02, 0x00, 0x00, 0x00, // block: 2 bytes
        0x10, 0x41, // token (1 literal), "A"
        0x00, 0x00, 0x00, 0x00, // end mark
    ];
    let mut decoder = Decoder::new();
    let mut out = [0u8; 8];
    let p = decoder.decompress(&frame, &mut out).unwrap();
    assert_eq!(p.consumed, frame.len());
    assert_eq!(&out[..p.produced], b"A");
    assert!(p.done);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 3 — run of five bytes through an offset-1 back-reference
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn run_expansion_via_offset_one() {
    let frame = [
        0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0x00, // header
        0x04, 0x00, 0x00, 0x00, // block: 4 bytes
        0x11, // token: 1 literal, match_len 1 + 4 = 5
        0x41, // "A"
        0x01, 0x00, // offset 1
        0x00, 0x00, 0x00, 0x00, // end mark
    ];
    let mut decoder = Decoder::new();
    let mut out = [0u8; 16];
    let p = decoder.decompress(&frame, &mut out).unwrap();
    assert_eq!(&out[..p.produced], b"AAAAAA");
    assert!(p.done);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 4 — extended literal length (280 = 15 + 255 + 10)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn extended_literal_length() {
    let literals: Vec<u8> = (0..280u32).map(|i| (i % 251) as u8).collect();
    let mut block = vec![0xF0, 0xFF, 0x0A];
    block.extend_from_slice(&literals);

    let mut frame = common::frame_header(0x40);
    frame.extend(common::with_descriptor(false, &block));
    frame.extend(common::END_MARK);

    let mut decoder = Decoder::new();
    let mut out = vec![0u8; 512];
    let p = decoder.decompress(&frame, &mut out).unwrap();
    assert_eq!(&out[..p.produced], &literals[..]);
    assert!(p.done);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 5 — scenario 2's frame fed one byte at a time
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn chunked_feed_single_literal() {
    let frame = [
        0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0x00, 0x02, 0x00, 0x00, 0x00, 0x10, 0x41, 0x00, 0x00,
        0x00, 0x00,
    ];
    let out = common::decode_chunked(&frame, 1, 8);
    assert_eq!(out, b"A");
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 6 — bad magic
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bad_magic() {
    let mut decoder = Decoder::new();
    let mut out = [0u8; 8];
    let err = decoder
        .decompress(&[0xDE, 0xAD, 0xBE, 0xEF, 0x11, 0x22], &mut out)
        .unwrap_err();
    assert_eq!(err, DecodeError::InvalidHeader);
}

/// The rejection lands on the fourth byte exactly: three good-prefix bytes
/// are accepted, the fourth ends it.
#[test]
fn bad_magic_consumes_exactly_four_bytes() {
    let mut decoder = Decoder::new();
    let mut out = [0u8; 8];
    let mut consumed = 0;
    for &b in &[0xDEu8, 0xAD, 0xBE] {
        let p = decoder.decompress(&[b], &mut out).unwrap();
        consumed += p.consumed;
        assert!(!p.done);
        assert_eq!(p.produced, 0);
    }
    assert_eq!(consumed, 3);
    assert!(decoder.decompress(&[0xEF], &mut out).is_err());
}
