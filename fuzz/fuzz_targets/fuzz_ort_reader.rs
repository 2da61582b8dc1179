#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed text must come back as an error, never a panic
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(file) = orso::ort::decode_ort(text) {
        // Whatever decoded must encode again
        let _ = orso::ort::encode_ort(&file.datasets, &orso::ort::OrtWriterConfig::default());
    }
});
