#![no_main]

use inline_image::engine::decode_image;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // We only care about panics/crashes, not decode errors.
    let _ = decode_image(data);
});
