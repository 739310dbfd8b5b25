//! `unlz4` — a resumable, decode-only LZ4 frame decompressor.
//!
//! The decoder is a fixed-footprint state machine built for environments
//! where neither the compressed input nor the decompressed output fits in
//! memory at once (firmware update paths, bounded staging buffers). Input
//! arrives in chunks of any size, output leaves in chunks of any size, and
//! the decoder suspends at any byte boundary in between, keeping all of its
//! progress inside the context.
//!
//! # Crate layout
//!
//! | Module   | Contents |
//! |----------|----------|
//! | `frame`  | Frame container parsing and the [`Decoder`] state machine. |
//! | `block`  | Sequence (token/literals/match) decoding and the history window. |
//! | `io`     | [`FrameReader`], a `std::io::Read` adapter. |
//! | `xxhash` | XXH32 wrapper used for opt-in checksum verification. |
//!
//! # Quick start
//!
//! ```
//! use unlz4::{Decoder, Progress};
//!
//! // "A" compressed as one literal, fed one byte at a time.
//! let frame = [
//!     0x04u8, 0x22, 0x4D, 0x18, 0x40, 0x40, 0x00,
//!     0x02, 0x00, 0x00, 0x00, 0x10, 0x41,
//!     0x00, 0x00, 0x00, 0x00,
//! ];
//! let mut decoder = Decoder::new();
//! let mut out = [0u8; 8];
//! let mut produced = 0;
//! let mut done = false;
//! for &byte in &frame {
//!     let p: Progress = decoder.decompress(&[byte], &mut out[produced..]).unwrap();
//!     produced += p.produced;
//!     done |= p.done;
//! }
//! assert!(done);
//! assert_eq!(&out[..produced], b"A");
//! ```
//!
//! # What is deliberately not here
//!
//! Compression, dictionaries (the header flag is recognised and its field
//! skipped), skippable and legacy frame magics, and random access. Header
//! and block checksums are consumed but only verified when asked to via
//! [`DecodeOptions`]; the content checksum after the end mark is never read.

#![forbid(unsafe_code)]

pub mod block;
pub mod frame;
pub mod io;
pub mod xxhash;

pub use frame::{decompress_frame_to_vec, DecodeError, DecodeOptions, Decoder, FrameFlags, Progress};
pub use io::FrameReader;
