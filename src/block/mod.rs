//! LZ4 block-level decoding: the sequence engine and the output history
//! window it copies matches from.

pub(crate) mod sequences;
pub(crate) mod window;

pub use sequences::{MINMATCH, ML_MASK, RUN_MASK};
pub use window::{MAX_DISTANCE, WINDOW_SIZE};
