#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok((request, encoded)) = apipost::fuzzing::curl_decode_encode(input) {
            debug_assert!(encoded.starts_with("curl -X "));
            debug_assert!(request.params().values().filter(|value| value.is_file()).count() <= 1);
        }
    }
});
