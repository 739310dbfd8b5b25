//! LZ4 sequence decoding for compressed blocks.
//!
//! A compressed block is a run of sequences: a token byte whose high nibble
//! seeds the literal count and whose low nibble seeds the match length,
//! optional length-extension bytes, the literals themselves, then a two-byte
//! match offset and the match copy. The decoder here is resumable at every
//! byte: [`SequenceDecoder::step`] advances as far as the input and output
//! spans allow and reports whether it progressed, stalled, or finished the
//! block.
//!
//! State lives in a handful of integer fields rather than in the spans, so a
//! stalled step can be retried later with fresh spans and pick up exactly
//! where it stopped. Match copies go byte by byte through the history
//! window: each copied byte is observable by the next, which is what makes
//! single-byte-offset runs expand correctly.

use crate::block::window::HistoryWindow;
use crate::frame::header::read_le16;
use crate::frame::types::DecodeError;

/// Minimum match length; the wire encodes `match_len - MINMATCH`.
pub const MINMATCH: u32 = 4;

/// Nibble value signalling that length-extension bytes follow.
pub const RUN_MASK: u32 = 0x0F;

/// Match-length nibble mask.
pub const ML_MASK: u8 = 0x0F;

/// What a [`SequenceDecoder::step`] call achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeqStep {
    /// Consumed input, produced output, or switched sub-state.
    Progressed,
    /// Nothing possible with the spans remaining; yield to the caller.
    Stalled,
    /// The block's payload is fully decoded.
    EndOfBlock,
}

/// Sub-state within a compressed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeqState {
    Token,
    LiteralsLength,
    CopyLiterals,
    ReadOffset,
    MatchLength,
    CopyMatch,
}

/// Resumable decoder for one compressed block's sequences.
///
/// Working variables mirror the wire protocol: the current token, the
/// outstanding literal and match counts, and the partially accumulated
/// offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SequenceDecoder {
    state: SeqState,
    token: u8,
    lit_len: u32,
    match_len: u32,
    offset: u16,
    /// Offset bytes accumulated so far (0, 1, or 2).
    offset_bytes: u8,
}

impl SequenceDecoder {
    pub(crate) fn new() -> Self {
        SequenceDecoder {
            state: SeqState::Token,
            token: 0,
            lit_len: 0,
            match_len: 0,
            offset: 0,
            offset_bytes: 0,
        }
    }

    /// Advance the block decode by one sub-state execution.
    ///
    /// `block_remaining` is the count of stored block bytes not yet consumed;
    /// every input byte taken here decrements it. The match-copy sub-state
    /// consumes no input at all.
    pub(crate) fn step(
        &mut self,
        block_remaining: &mut u32,
        src: &[u8],
        src_pos: &mut usize,
        dst: &mut [u8],
        dst_pos: &mut usize,
        window: &mut HistoryWindow,
    ) -> Result<SeqStep, DecodeError> {
        match self.state {
            SeqState::Token => {
                // A block may legally end right after a completed match; the
                // exhausted byte budget is the only end-of-block signal.
                if *block_remaining == 0 {
                    return Ok(SeqStep::EndOfBlock);
                }
                if *src_pos >= src.len() {
                    return Ok(SeqStep::Stalled);
                }
                let token = src[*src_pos];
                *src_pos += 1;
                *block_remaining -= 1;
                self.token = token;
                self.lit_len = (token >> 4) as u32;
                self.match_len = 0;
                self.offset = 0;
                self.offset_bytes = 0;
                self.state = if self.lit_len == RUN_MASK {
                    SeqState::LiteralsLength
                } else {
                    SeqState::CopyLiterals
                };
                Ok(SeqStep::Progressed)
            }

            SeqState::LiteralsLength => {
                self.read_length_extension(block_remaining, src, src_pos, LengthKind::Literals)
            }

            SeqState::CopyLiterals => {
                // The literals are part of this block's payload; a count that
                // exceeds the bytes left in the block cannot be satisfied.
                if self.lit_len > *block_remaining {
                    return Err(DecodeError::InvalidBlockSize);
                }
                let n = (self.lit_len as usize)
                    .min(src.len() - *src_pos)
                    .min(dst.len() - *dst_pos);
                if n > 0 {
                    dst[*dst_pos..*dst_pos + n].copy_from_slice(&src[*src_pos..*src_pos + n]);
                    window.extend(&dst[*dst_pos..*dst_pos + n]);
                    *src_pos += n;
                    *dst_pos += n;
                    *block_remaining -= n as u32;
                    self.lit_len -= n as u32;
                }
                if self.lit_len == 0 {
                    if *block_remaining == 0 {
                        // Last sequence of the block carries no match.
                        return Ok(SeqStep::EndOfBlock);
                    }
                    self.offset = 0;
                    self.offset_bytes = 0;
                    self.state = SeqState::ReadOffset;
                    Ok(SeqStep::Progressed)
                } else if n == 0 {
                    Ok(SeqStep::Stalled)
                } else {
                    Ok(SeqStep::Progressed)
                }
            }

            SeqState::ReadOffset => {
                // Both offset bytes must come out of this block; a block that
                // cannot supply them is malformed no matter what input
                // arrives later.
                if (*block_remaining as usize) < 2 - self.offset_bytes as usize {
                    return Err(DecodeError::InvalidBlockSize);
                }
                if self.offset_bytes == 0 && src.len() - *src_pos >= 2 {
                    self.offset = read_le16(src, *src_pos);
                    self.offset_bytes = 2;
                    *src_pos += 2;
                    *block_remaining -= 2;
                } else if *src_pos < src.len() {
                    let b = src[*src_pos];
                    *src_pos += 1;
                    *block_remaining -= 1;
                    self.offset |= (b as u16) << (8 * self.offset_bytes);
                    self.offset_bytes += 1;
                } else {
                    return Ok(SeqStep::Stalled);
                }

                if self.offset_bytes == 2 {
                    if self.offset == 0 {
                        return Err(DecodeError::InvalidBlockSize);
                    }
                    // A reference past the start of the emitted stream has
                    // nothing to copy from.
                    if self.offset as usize > window.len() {
                        return Err(DecodeError::InvalidBlockSize);
                    }
                    self.match_len = (self.token & ML_MASK) as u32 + MINMATCH;
                    self.state = if (self.token & ML_MASK) as u32 == RUN_MASK {
                        SeqState::MatchLength
                    } else {
                        SeqState::CopyMatch
                    };
                }
                Ok(SeqStep::Progressed)
            }

            SeqState::MatchLength => {
                self.read_length_extension(block_remaining, src, src_pos, LengthKind::Match)
            }

            SeqState::CopyMatch => {
                // Byte-by-byte on purpose: with offset < match_len each copied
                // byte must be visible to the next read, which is how short
                // offsets expand into runs.
                let n = (self.match_len as usize).min(dst.len() - *dst_pos);
                for _ in 0..n {
                    let b = window.byte_back(self.offset);
                    dst[*dst_pos] = b;
                    *dst_pos += 1;
                    window.push(b);
                }
                self.match_len -= n as u32;
                if self.match_len == 0 {
                    self.state = SeqState::Token;
                    Ok(SeqStep::Progressed)
                } else if n == 0 {
                    Ok(SeqStep::Stalled)
                } else {
                    Ok(SeqStep::Progressed)
                }
            }
        }
    }

    /// Shared variable-length rule for literal and match counts: add bytes
    /// until one is not `0xFF`, that terminator included.
    fn read_length_extension(
        &mut self,
        block_remaining: &mut u32,
        src: &[u8],
        src_pos: &mut usize,
        kind: LengthKind,
    ) -> Result<SeqStep, DecodeError> {
        let mut progressed = false;
        loop {
            // Length bytes come out of the block's own budget; an encoding
            // still open when the budget hits zero has overrun the block,
            // regardless of any input that arrives later.
            if *block_remaining == 0 {
                return Err(DecodeError::InvalidBlockSize);
            }
            if *src_pos >= src.len() {
                return if progressed {
                    Ok(SeqStep::Progressed)
                } else {
                    Ok(SeqStep::Stalled)
                };
            }
            let b = src[*src_pos];
            *src_pos += 1;
            *block_remaining -= 1;
            progressed = true;
            let total = match kind {
                LengthKind::Literals => &mut self.lit_len,
                LengthKind::Match => &mut self.match_len,
            };
            *total = total
                .checked_add(b as u32)
                .ok_or(DecodeError::InvalidBlockSize)?;
            if b != 0xFF {
                self.state = match kind {
                    LengthKind::Literals => SeqState::CopyLiterals,
                    LengthKind::Match => SeqState::CopyMatch,
                };
                return Ok(SeqStep::Progressed);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LengthKind {
    Literals,
    Match,
}
