//! Streaming LZ4 frame decompression.
//!
//! [`Decoder`] is a resumable state machine: it consumes a frame byte stream
//! in chunks of any size and emits the payload into caller-provided output
//! slices, also of any size. All state needed to resume lives inside the
//! decoder, so the whole compressed input never has to be in memory at once
//! and neither does the output. Suspension points are always byte-aligned.
//!
//! Frame layout handled here: magic, flag byte, ignored block-max-size byte,
//! optional content-size / dictionary-id header fields, the header checksum
//! byte, then block records (compressed or raw) each optionally trailed by a
//! checksum, terminated by a zero block descriptor. The zero descriptor is
//! the end-of-frame signal; an optional content checksum after it is never
//! read.

use crate::block::sequences::{SeqStep, SequenceDecoder};
use crate::block::window::HistoryWindow;
use crate::frame::header::{header_checksum, read_le32};
use crate::frame::types::{
    DecodeError, DecodeOptions, FrameFlags, Progress, BF_SIZE, BH_SIZE, BLOCK_UNCOMPRESSED_FLAG,
    FH_BASE_SIZE, FH_MAGIC_SIZE, LZ4F_MAGICNUMBER, MAX_FH_SIZE,
};
use crate::xxhash::Xxh32State;

// ─────────────────────────────────────────────────────────────────────────────
// Stages
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level decode stage. Each variant carries exactly the working data its
/// parser needs, so the machine is resumable at any byte without any shared
/// scratch aliasing.
#[derive(Clone, Copy)]
enum Stage {
    /// Accumulating the frame header. `target` grows as the header reveals
    /// itself: magic first, then the fixed prefix, then the flag-dependent
    /// optional fields and checksum byte.
    FrameHeader {
        buf: [u8; MAX_FH_SIZE],
        filled: u8,
        target: u8,
    },
    /// Accumulating the 4-byte block descriptor.
    BlockHeader { buf: [u8; BH_SIZE], filled: u8 },
    /// Accumulating the 4-byte per-block checksum trailer.
    BlockChecksum { buf: [u8; BF_SIZE], filled: u8 },
    /// Copying an uncompressed block straight through.
    RawBlock,
    /// Decoding a compressed block's sequences.
    Sequences(SequenceDecoder),
}

/// What a stage execution achieved.
enum Step {
    /// Re-enter the dispatch loop (a transition or partial progress).
    Continue,
    /// No further progress possible with the spans remaining.
    Yield,
    /// The zero descriptor was read; the frame is complete.
    Finished,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scratch fill primitive
// ─────────────────────────────────────────────────────────────────────────────

/// Fill `buf` toward `target` bytes from `src`, advancing `src_pos`.
/// Returns `true` once `target` bytes are in.
fn fill_scratch(
    buf: &mut [u8],
    filled: &mut u8,
    target: u8,
    src: &[u8],
    src_pos: &mut usize,
) -> bool {
    let want = target as usize - *filled as usize;
    let take = want.min(src.len() - *src_pos);
    if take > 0 {
        buf[*filled as usize..*filled as usize + take]
            .copy_from_slice(&src[*src_pos..*src_pos + take]);
        *filled += take as u8;
        *src_pos += take;
    }
    *filled as usize == target as usize
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder
// ─────────────────────────────────────────────────────────────────────────────

/// Resumable LZ4 frame decompression context.
///
/// One decoder handles one frame stream at a time. Create it, feed it input
/// with [`decompress`](Decoder::decompress) until `done` is reported, then
/// drop it or [`reset`](Decoder::reset) it for the next frame. Decoders are
/// independent of each other and hold no external resources.
///
/// # Example
///
/// ```
/// use unlz4::Decoder;
///
/// // A frame whose single block holds the literal byte 0x41.
/// let frame = [
///     0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0xC0, // header
///     0x02, 0x00, 0x00, 0x00, 0x10, 0x41,       // block
///     0x00, 0x00, 0x00, 0x00,                   // end mark
/// ];
/// let mut decoder = Decoder::new();
/// let mut out = [0u8; 8];
/// let progress = decoder.decompress(&frame, &mut out).unwrap();
/// assert!(progress.done);
/// assert_eq!(&out[..progress.produced], b"A");
/// ```
pub struct Decoder {
    stage: Stage,
    opts: DecodeOptions,
    flags: FrameFlags,
    /// Stored bytes left in the block currently being decoded.
    block_remaining: u32,
    window: HistoryWindow,
    /// Running checksum over the current block's stored bytes; only fed when
    /// verification is enabled and the frame announces block checksums.
    block_hasher: Xxh32State,
    done: bool,
}

impl Decoder {
    /// Create a decoder with default options (checksums consumed, not
    /// verified).
    pub fn new() -> Self {
        Self::with_options(DecodeOptions::default())
    }

    /// Create a decoder with explicit [`DecodeOptions`].
    pub fn with_options(opts: DecodeOptions) -> Self {
        Decoder {
            stage: Stage::initial(),
            opts,
            flags: FrameFlags::default(),
            block_remaining: 0,
            window: HistoryWindow::new(),
            block_hasher: Xxh32State::new(0),
            done: false,
        }
    }

    /// Return the context to its initial state so it can decode another
    /// frame. Options are kept.
    pub fn reset(&mut self) {
        self.stage = Stage::initial();
        self.flags = FrameFlags::default();
        self.block_remaining = 0;
        self.window.clear();
        self.block_hasher = Xxh32State::new(0);
        self.done = false;
    }

    /// Frame flags, available once the header's flag byte has been parsed.
    pub fn frame_flags(&self) -> Option<FrameFlags> {
        match self.stage {
            Stage::FrameHeader { target, .. } if (target as usize) <= FH_BASE_SIZE => None,
            _ => Some(self.flags),
        }
    }

    /// `true` once the end-of-frame marker has been read.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Decode as much of the frame as the spans allow.
    ///
    /// Consumes bytes from `src` and writes payload bytes into `dst`,
    /// reporting exactly how far each advanced. A return with
    /// `done == false` means the decoder needs another call with more input
    /// (or more output room); all partial state is retained in between. A
    /// return with `done == true` is terminal: the zero end-of-frame
    /// descriptor was read, and subsequent calls are no-ops reporting
    /// `done` again.
    ///
    /// # Errors
    ///
    /// * [`DecodeError::InvalidHeader`] — the first four bytes are not the
    ///   LZ4 frame magic. Exactly four input bytes have been consumed.
    /// * [`DecodeError::InvalidBlockSize`] — malformed block contents (zero
    ///   or out-of-range offset, overlong length encoding, sequence past the
    ///   block boundary).
    /// * [`DecodeError::HeaderChecksumInvalid`] /
    ///   [`DecodeError::BlockChecksumInvalid`] — only when the matching
    ///   [`DecodeOptions`] flag is set.
    ///
    /// Errors are terminal; discard or [`reset`](Decoder::reset) the decoder
    /// afterwards.
    pub fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<Progress, DecodeError> {
        if self.done {
            return Ok(Progress {
                consumed: 0,
                produced: 0,
                done: true,
            });
        }

        let mut src_pos = 0usize;
        let mut dst_pos = 0usize;

        let done = loop {
            let step = match self.stage {
                // ── Frame header ─────────────────────────────────────────
                Stage::FrameHeader {
                    mut buf,
                    mut filled,
                    target,
                } => {
                    if !fill_scratch(&mut buf, &mut filled, target, src, &mut src_pos) {
                        self.stage = Stage::FrameHeader {
                            buf,
                            filled,
                            target,
                        };
                        Step::Yield
                    } else if target as usize == FH_MAGIC_SIZE {
                        // Judge the magic as soon as it is complete so a bad
                        // stream is rejected after exactly four bytes.
                        if read_le32(&buf, 0) != LZ4F_MAGICNUMBER {
                            return Err(DecodeError::InvalidHeader);
                        }
                        self.stage = Stage::FrameHeader {
                            buf,
                            filled,
                            target: FH_BASE_SIZE as u8,
                        };
                        Step::Continue
                    } else if target as usize == FH_BASE_SIZE {
                        let flags = FrameFlags::from_byte(buf[4]);
                        self.flags = flags;
                        self.stage = Stage::FrameHeader {
                            buf,
                            filled,
                            target: (FH_BASE_SIZE + flags.extra_header_len()) as u8,
                        };
                        Step::Continue
                    } else {
                        let len = target as usize;
                        if self.opts.verify_header_checksum
                            && header_checksum(&buf[4..len - 1]) != buf[len - 1]
                        {
                            return Err(DecodeError::HeaderChecksumInvalid);
                        }
                        self.stage = Stage::BlockHeader {
                            buf: [0; BH_SIZE],
                            filled: 0,
                        };
                        Step::Continue
                    }
                }

                // ── Block descriptor ─────────────────────────────────────
                Stage::BlockHeader {
                    mut buf,
                    mut filled,
                } => {
                    if !fill_scratch(&mut buf, &mut filled, BH_SIZE as u8, src, &mut src_pos) {
                        self.stage = Stage::BlockHeader { buf, filled };
                        Step::Yield
                    } else {
                        let descriptor = read_le32(&buf, 0);
                        if descriptor == 0 {
                            Step::Finished
                        } else {
                            self.block_remaining = descriptor & !BLOCK_UNCOMPRESSED_FLAG;
                            if self.opts.verify_block_checksums && self.flags.block_checksum() {
                                self.block_hasher = Xxh32State::new(0);
                            }
                            self.stage = if descriptor & BLOCK_UNCOMPRESSED_FLAG != 0 {
                                Stage::RawBlock
                            } else {
                                Stage::Sequences(SequenceDecoder::new())
                            };
                            Step::Continue
                        }
                    }
                }

                // ── Per-block checksum trailer ───────────────────────────
                Stage::BlockChecksum {
                    mut buf,
                    mut filled,
                } => {
                    if !fill_scratch(&mut buf, &mut filled, BF_SIZE as u8, src, &mut src_pos) {
                        self.stage = Stage::BlockChecksum { buf, filled };
                        Step::Yield
                    } else {
                        if self.opts.verify_block_checksums
                            && read_le32(&buf, 0) != self.block_hasher.digest()
                        {
                            return Err(DecodeError::BlockChecksumInvalid);
                        }
                        self.stage = Stage::BlockHeader {
                            buf: [0; BH_SIZE],
                            filled: 0,
                        };
                        Step::Continue
                    }
                }

                // ── Uncompressed block ───────────────────────────────────
                Stage::RawBlock => {
                    let n = (self.block_remaining as usize)
                        .min(src.len() - src_pos)
                        .min(dst.len() - dst_pos);
                    if n > 0 {
                        dst[dst_pos..dst_pos + n].copy_from_slice(&src[src_pos..src_pos + n]);
                        self.window.extend(&dst[dst_pos..dst_pos + n]);
                        if self.opts.verify_block_checksums && self.flags.block_checksum() {
                            self.block_hasher.update(&src[src_pos..src_pos + n]);
                        }
                        src_pos += n;
                        dst_pos += n;
                        self.block_remaining -= n as u32;
                    }
                    if self.block_remaining == 0 {
                        self.stage = self.block_trailer_stage();
                        Step::Continue
                    } else {
                        Step::Yield
                    }
                }

                // ── Compressed block ─────────────────────────────────────
                Stage::Sequences(mut seq) => {
                    let hash_from = src_pos;
                    let outcome = seq.step(
                        &mut self.block_remaining,
                        src,
                        &mut src_pos,
                        dst,
                        &mut dst_pos,
                        &mut self.window,
                    )?;
                    if self.opts.verify_block_checksums
                        && self.flags.block_checksum()
                        && src_pos > hash_from
                    {
                        self.block_hasher.update(&src[hash_from..src_pos]);
                    }
                    match outcome {
                        SeqStep::Progressed => {
                            self.stage = Stage::Sequences(seq);
                            Step::Continue
                        }
                        SeqStep::Stalled => {
                            self.stage = Stage::Sequences(seq);
                            Step::Yield
                        }
                        SeqStep::EndOfBlock => {
                            self.stage = self.block_trailer_stage();
                            Step::Continue
                        }
                    }
                }
            };

            match step {
                Step::Continue => continue,
                Step::Yield => break false,
                Step::Finished => break true,
            }
        };

        if done {
            self.done = true;
        }
        Ok(Progress {
            consumed: src_pos,
            produced: dst_pos,
            done,
        })
    }

    /// Stage following a completed block: its checksum trailer when the
    /// frame carries one, otherwise the next block descriptor.
    fn block_trailer_stage(&self) -> Stage {
        if self.flags.block_checksum() {
            Stage::BlockChecksum {
                buf: [0; BF_SIZE],
                filled: 0,
            }
        } else {
            Stage::BlockHeader {
                buf: [0; BH_SIZE],
                filled: 0,
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    fn initial() -> Self {
        Stage::FrameHeader {
            buf: [0; MAX_FH_SIZE],
            filled: 0,
            target: FH_MAGIC_SIZE as u8,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
