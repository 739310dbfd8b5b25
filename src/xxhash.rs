//! Thin wrapper around the `xxhash-rust` crate exposing the XXH32 surface
//! this crate needs: a streaming state for per-block checksums and a one-shot
//! helper for the single-byte frame-header checksum.

pub use xxhash_rust::xxh32::Xxh32 as Xxh32State;

/// One-shot XXH32 over `data` with the given `seed`.
///
/// The LZ4 frame format uses seed 0 everywhere.
#[inline]
pub fn xxh32_oneshot(data: &[u8], seed: u32) -> u32 {
    xxhash_rust::xxh32::xxh32(data, seed)
}
