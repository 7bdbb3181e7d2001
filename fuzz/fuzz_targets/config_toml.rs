#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(settings) = apipost::fuzzing::settings_from_toml(input) {
            debug_assert!(!settings.client.timeout.is_zero());
            debug_assert!(
                settings
                    .import
                    .unsupported_extensions
                    .iter()
                    .all(|ext| !ext.is_empty() && !ext.starts_with('.'))
            );
        }
    }
});
