#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let (path, body) = input.split_once('\n').unwrap_or(("$", input));
        let shown = apipost::fuzzing::json_path_input(body, path);
        if serde_json::from_str::<serde_json::Value>(body).is_err() {
            debug_assert!(!shown.is_empty() || body.is_empty());
        }
    }
});
