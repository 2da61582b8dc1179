#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary archives must be rejected gracefully
    let _ = orso::nexus::read_nexus(Cursor::new(data));
});
