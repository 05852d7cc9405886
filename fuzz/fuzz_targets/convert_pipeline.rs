#![no_main]

//! Fuzz target for the full conversion pipeline. Checks that no input can
//! break the result-shape invariant or escape the error funnel.

use arbitrary::{Arbitrary, Unstructured};
use inline_image::{convert_to_base64, InputFile};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ConvertSeed {
    media_type: String,
    quality: Option<f64>,
    body: Vec<u8>,
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let seed: ConvertSeed = match ConvertSeed::arbitrary(&mut unstructured) {
        Ok(s) => s,
        Err(_) => return,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let file = InputFile::from_bytes(seed.media_type, seed.body);
    let result = runtime.block_on(convert_to_base64(&file, seed.quality));

    // Exactly one slot populated, for every conceivable input.
    assert_eq!(result.base64.is_empty(), result.error.is_some());
});
