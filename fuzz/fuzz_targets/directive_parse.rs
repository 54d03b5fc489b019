#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    if let Ok(name) = magic_identify::identify::parse_directive(&line) {
        assert!(!name.contains('/'));
    }
});
