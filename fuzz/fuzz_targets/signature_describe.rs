#![no_main]
use libfuzzer_sys::fuzz_target;
use magic_identify::identify::{InferFactory, SignatureFactory, SignatureSource};
use magic_identify::SignatureMode;

fuzz_target!(|data: &[u8]| {
    for mode in [SignatureMode::Mime, SignatureMode::Description] {
        if let Ok(source) = InferFactory::default().build(mode) {
            assert!(source.describe(data).is_some());
        }
    }
});
