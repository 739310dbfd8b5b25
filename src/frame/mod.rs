//! LZ4 Frame format — streaming decompression.
//!
//! An LZ4 frame is a self-describing container defined by the [LZ4 Frame
//! Format Specification]: a magic number and flag byte, optional header
//! fields, a run of compressed or raw blocks, and a zero descriptor marking
//! the end. This module decodes that container incrementally; the block
//! payloads themselves are handed to [`crate::block`].
//!
//! # Submodules
//!
//! * [`types`] — constants, [`FrameFlags`], [`Progress`], [`DecodeOptions`],
//!   [`DecodeError`].
//! * [`header`] — byte-order helpers and the header checksum.
//! * [`decompress`] — the [`Decoder`] state machine.
//!
//! [LZ4 Frame Format Specification]: https://github.com/lz4/lz4/blob/dev/doc/lz4_Frame_format.md

pub mod decompress;
pub mod header;
pub mod types;

pub use decompress::Decoder;
pub use types::{DecodeError, DecodeOptions, FrameFlags, Progress};

// ---------------------------------------------------------------------------
// One-shot convenience helper
// ---------------------------------------------------------------------------

/// Decompress a complete LZ4 frame from `compressed` into a freshly
/// allocated `Vec<u8>`.
///
/// Trailing bytes after the end-of-frame marker (such as a content
/// checksum) are ignored. Returns [`DecodeError::TruncatedFrame`] when the
/// input ends before the frame does.
///
/// For incremental decoding under caller-controlled buffers, use
/// [`Decoder`] directly.
pub fn decompress_frame_to_vec(compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = Decoder::new();
    let mut out = Vec::new();
    let mut chunk = vec![0u8; 65_536];
    let mut pos = 0usize;
    loop {
        let progress = decoder.decompress(&compressed[pos..], &mut chunk)?;
        pos += progress.consumed;
        out.extend_from_slice(&chunk[..progress.produced]);
        if progress.done {
            return Ok(out);
        }
        if progress.consumed == 0 && progress.produced == 0 {
            // Input exhausted mid-frame and nothing left to flush.
            return Err(DecodeError::TruncatedFrame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_round() {
        // Single-literal frame with trailing junk after the end mark.
        let frame = [
            0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0x00, // header
            0x02, 0x00, 0x00, 0x00, 0x10, 0x41, // block
            0x00, 0x00, 0x00, 0x00, // end mark
            0xAA, 0xBB, 0xCC, 0xDD, // ignored trailer
        ];
        assert_eq!(decompress_frame_to_vec(&frame).unwrap(), [0x41]);
    }

    #[test]
    fn one_shot_truncated() {
        let frame = [0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0x00, 0x02, 0x00];
        assert_eq!(
            decompress_frame_to_vec(&frame).unwrap_err(),
            DecodeError::TruncatedFrame
        );
    }

    #[test]
    fn one_shot_bad_magic() {
        assert_eq!(
            decompress_frame_to_vec(&[0u8; 16]).unwrap_err(),
            DecodeError::InvalidHeader
        );
    }
}
