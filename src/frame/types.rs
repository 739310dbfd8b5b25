//! LZ4 Frame format constants, flag parsing, and error handling.
//!
//! Field layouts follow the [LZ4 Frame Format Specification]; the flag-bit
//! positions this decoder recognises are listed on [`FrameFlags`].
//!
//! [LZ4 Frame Format Specification]: https://github.com/lz4/lz4/blob/dev/doc/lz4_Frame_format.md

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Frame format constants
// ─────────────────────────────────────────────────────────────────────────────

/// Magic number opening every LZ4 frame (stored little-endian).
pub const LZ4F_MAGICNUMBER: u32 = 0x184D_2204;

/// High bit of a block descriptor: the block payload is stored uncompressed.
pub const BLOCK_UNCOMPRESSED_FLAG: u32 = 0x8000_0000;

/// Block descriptor size in bytes (31-bit payload length + raw flag bit).
pub const BH_SIZE: usize = 4;

/// Block footer (checksum) size in bytes, present when block checksums are
/// enabled in the frame flags.
pub const BF_SIZE: usize = 4;

/// Number of leading header bytes needed before the magic can be judged.
pub const FH_MAGIC_SIZE: usize = 4;

/// Fixed header prefix: magic (4) + flags (1) + block-max-size byte (1).
pub const FH_BASE_SIZE: usize = 6;

/// Largest possible frame header: base (6) + content size (8) +
/// dictionary id (4) + header checksum (1).
pub const MAX_FH_SIZE: usize = 19;

// ─────────────────────────────────────────────────────────────────────────────
// Frame flags
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed frame flag byte (header offset 4).
///
/// Recognised bits:
///
/// | Bit | Meaning |
/// |-----|-------------------------------------------|
/// | 1   | dictionary id field present in the header |
/// | 2   | content checksum trails the frame         |
/// | 3   | content size field present in the header  |
/// | 4   | a 4-byte checksum trails every block      |
///
/// All other bits (including the version field in bits 6-7) are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameFlags(u8);

impl FrameFlags {
    const DICT_ID: u8 = 1 << 1;
    const CONTENT_CHECKSUM: u8 = 1 << 2;
    const CONTENT_SIZE: u8 = 1 << 3;
    const BLOCK_CHECKSUM: u8 = 1 << 4;

    /// Wrap the raw flag byte from the frame header.
    #[inline]
    pub fn from_byte(byte: u8) -> Self {
        FrameFlags(byte)
    }

    /// Raw flag byte as stored on the wire.
    #[inline]
    pub fn as_byte(self) -> u8 {
        self.0
    }

    /// A 4-byte dictionary id follows the fixed header fields.
    #[inline]
    pub fn dict_id(self) -> bool {
        self.0 & Self::DICT_ID != 0
    }

    /// A 4-byte content checksum follows the end-of-frame marker.
    /// This decoder never reads it; see the crate docs.
    #[inline]
    pub fn content_checksum(self) -> bool {
        self.0 & Self::CONTENT_CHECKSUM != 0
    }

    /// An 8-byte uncompressed content size is stored in the header.
    #[inline]
    pub fn content_size(self) -> bool {
        self.0 & Self::CONTENT_SIZE != 0
    }

    /// Every block is trailed by a 4-byte checksum.
    #[inline]
    pub fn block_checksum(self) -> bool {
        self.0 & Self::BLOCK_CHECKSUM != 0
    }

    /// Header bytes that follow the fixed 6-byte prefix: the optional content
    /// size and dictionary id fields plus the mandatory header-checksum byte.
    pub fn extra_header_len(self) -> usize {
        1 + if self.content_size() { 8 } else { 0 } + if self.dict_id() { 4 } else { 0 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode progress
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of one [`Decoder::decompress`](crate::frame::Decoder::decompress)
/// call.
///
/// `consumed` and `produced` report how far the input and output spans
/// advanced. `done` is set exactly when the end-of-frame marker (a zero block
/// descriptor) has been read; once reported, later calls return
/// `Progress { consumed: 0, produced: 0, done: true }` without touching
/// either span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Input bytes consumed by this call.
    pub consumed: usize,
    /// Output bytes produced by this call.
    pub produced: usize,
    /// The frame is fully decoded.
    pub done: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode options
// ─────────────────────────────────────────────────────────────────────────────

/// Opt-in integrity checks.
///
/// Both default to `false`: checksums are then consumed and discarded, which
/// keeps the decoder usable against producers with nonstandard checksum
/// schemes. The content checksum (after the end-of-frame marker) is never
/// read regardless of these options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Verify the single-byte header checksum,
    /// `(XXH32(flags..last-option-byte, 0) >> 8) & 0xFF`.
    pub verify_header_checksum: bool,
    /// Verify each block's trailing XXH32 over its stored payload bytes.
    /// Only consulted when the frame flags announce block checksums.
    pub verify_block_checksums: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors surfaced by frame decoding.
///
/// All variants are terminal: the decoder context must be discarded (or
/// [`reset`](crate::frame::Decoder::reset)) after seeing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The first four input bytes are not the LZ4 frame magic.
    InvalidHeader,
    /// Malformed block contents: zero or out-of-range match offset, overlong
    /// length encoding, or a sequence running past the block boundary.
    InvalidBlockSize,
    /// Header checksum byte mismatch (only with
    /// [`DecodeOptions::verify_header_checksum`]).
    HeaderChecksumInvalid,
    /// Block checksum mismatch (only with
    /// [`DecodeOptions::verify_block_checksums`]).
    BlockChecksumInvalid,
    /// Input ended mid-frame. Produced only by the one-shot
    /// [`decompress_frame_to_vec`](crate::frame::decompress_frame_to_vec)
    /// helper; the streaming API yields instead.
    TruncatedFrame,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidHeader => f.write_str("invalid LZ4 frame magic"),
            DecodeError::InvalidBlockSize => f.write_str("malformed LZ4 block"),
            DecodeError::HeaderChecksumInvalid => f.write_str("frame header checksum mismatch"),
            DecodeError::BlockChecksumInvalid => f.write_str("block checksum mismatch"),
            DecodeError::TruncatedFrame => f.write_str("LZ4 frame ended unexpectedly"),
        }
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_bit_positions() {
        assert!(FrameFlags::from_byte(1 << 1).dict_id());
        assert!(FrameFlags::from_byte(1 << 2).content_checksum());
        assert!(FrameFlags::from_byte(1 << 3).content_size());
        assert!(FrameFlags::from_byte(1 << 4).block_checksum());
        // Version bits and the block-independence bit are ignored.
        let f = FrameFlags::from_byte(0x60);
        assert!(!f.dict_id() && !f.content_checksum() && !f.content_size() && !f.block_checksum());
    }

    #[test]
    fn extra_header_len_combinations() {
        // Checksum byte only.
        assert_eq!(FrameFlags::from_byte(0x40).extra_header_len(), 1);
        // + content size
        assert_eq!(FrameFlags::from_byte(0x40 | 1 << 3).extra_header_len(), 9);
        // + dictionary id
        assert_eq!(FrameFlags::from_byte(0x40 | 1 << 1).extra_header_len(), 5);
        // everything
        assert_eq!(
            FrameFlags::from_byte(0x40 | 1 << 1 | 1 << 3).extra_header_len(),
            13
        );
        // Largest extension still fits the header staging buffer.
        assert_eq!(FH_BASE_SIZE + 13, MAX_FH_SIZE);
    }

    #[test]
    fn error_display_strings() {
        assert_eq!(DecodeError::InvalidHeader.to_string(), "invalid LZ4 frame magic");
        assert_eq!(DecodeError::InvalidBlockSize.to_string(), "malformed LZ4 block");
        assert_eq!(
            DecodeError::TruncatedFrame.to_string(),
            "LZ4 frame ended unexpectedly"
        );
    }
}
