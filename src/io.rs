//! Streaming I/O adapter over the frame decoder.
//!
//! [`FrameReader`] wraps any `R: Read` producing LZ4 frame bytes and exposes
//! the decompressed payload through [`std::io::Read`]. The caller never sees
//! frame structure; compressed bytes are pulled through a small internal
//! buffer as output is requested.

use std::io::{self, Read};

use crate::frame::{DecodeOptions, Decoder};

/// Compressed-side buffer size. One syscall's worth of input typically
/// yields many reads' worth of output, so this stays deliberately small.
const SRC_BUF_SIZE: usize = 8 * 1024;

/// Decompressing reader for a single LZ4 frame.
///
/// Reads return `Ok(0)` once the frame's end mark has been decoded; bytes
/// after the end mark (for instance a content checksum) are never decoded,
/// though they may already have been pulled into the internal buffer. An
/// inner stream that ends before the frame does surfaces as
/// [`io::ErrorKind::UnexpectedEof`].
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use unlz4::FrameReader;
///
/// let frame: &[u8] = &[
///     0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0x00, // header
///     0x02, 0x00, 0x00, 0x00, 0x10, 0x41,       // block: literal "A"
///     0x00, 0x00, 0x00, 0x00,                   // end mark
/// ];
/// let mut reader = FrameReader::new(frame);
/// let mut out = String::new();
/// reader.read_to_string(&mut out).unwrap();
/// assert_eq!(out, "A");
/// ```
pub struct FrameReader<R: Read> {
    inner: R,
    decoder: Decoder,
    src_buf: Box<[u8; SRC_BUF_SIZE]>,
    src_len: usize,
    src_pos: usize,
    finished: bool,
}

impl<R: Read> FrameReader<R> {
    /// Wrap `inner` with a default-option decoder.
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, DecodeOptions::default())
    }

    /// Wrap `inner` with explicit [`DecodeOptions`].
    pub fn with_options(inner: R, opts: DecodeOptions) -> Self {
        FrameReader {
            inner,
            decoder: Decoder::with_options(opts),
            src_buf: Box::new([0u8; SRC_BUF_SIZE]),
            src_len: 0,
            src_pos: 0,
            finished: false,
        }
    }

    /// Unwrap and return the inner reader.
    ///
    /// Any compressed bytes already pulled into the internal buffer but not
    /// yet decoded are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for FrameReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.finished || out.is_empty() {
            return Ok(0);
        }
        loop {
            if self.src_pos == self.src_len {
                self.src_pos = 0;
                self.src_len = self.inner.read(&mut self.src_buf[..])?;
            }
            let progress = self
                .decoder
                .decompress(&self.src_buf[self.src_pos..self.src_len], out)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            self.src_pos += progress.consumed;
            if progress.done {
                self.finished = true;
                return Ok(progress.produced);
            }
            if progress.produced > 0 {
                return Ok(progress.produced);
            }
            if self.src_len == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "LZ4 frame ended before its end mark",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Literal "A" frame used across the tests.
    const FRAME: [u8; 17] = [
        0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0x00, 0x02, 0x00, 0x00, 0x00, 0x10, 0x41, 0x00, 0x00,
        0x00, 0x00,
    ];

    #[test]
    fn reads_whole_payload() {
        let mut reader = FrameReader::new(&FRAME[..]);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"A");
    }

    #[test]
    fn truncated_stream_is_unexpected_eof() {
        let mut reader = FrameReader::new(&FRAME[..9]);
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn corrupt_stream_is_invalid_data() {
        let mut reader = FrameReader::new(&b"not an lz4 frame"[..]);
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn trailing_bytes_not_decoded() {
        let mut data = FRAME.to_vec();
        data.extend_from_slice(&[1, 2, 3, 4]);
        let mut reader = FrameReader::new(&data[..]);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"A");
    }
}
