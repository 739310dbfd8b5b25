#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes through the decoder: errors are expected and fine,
    // panics and non-termination are not.

    // One-shot helper covers header parsing, block decode, and raw copy.
    let _ = unlz4::decompress_frame_to_vec(data);

    // Streaming path with small, mismatched span sizes.
    let mut decoder = unlz4::Decoder::new();
    let mut out = [0u8; 777];
    let mut pos = 0usize;
    loop {
        let end = (pos + 13).min(data.len());
        match decoder.decompress(&data[pos..end], &mut out) {
            Ok(p) => {
                pos += p.consumed;
                if p.done {
                    break;
                }
                if p.consumed == 0 && p.produced == 0 && end == data.len() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
});
