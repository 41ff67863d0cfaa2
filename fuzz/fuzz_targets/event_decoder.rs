#![no_main]

use libfuzzer_sys::fuzz_target;
use jetsub::EventInput;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary text must fail cleanly, never panic
    if let Ok(line) = std::str::from_utf8(data) {
        if let Ok(event) = EventInput::from_json(line) {
            let _ = serde_json::to_string(&event);
        }
    }
});
