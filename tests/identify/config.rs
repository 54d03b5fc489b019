//! Configuration-driven behaviour.

use magic_identify::identify::{IdentifyEvent, RecordingSink, SignatureBackend, SignatureSource};
use magic_identify::{IdentifyConfig, MagicIdentify, SignatureMode};

use crate::common::test_data::*;
use crate::common::Workspace;

#[test]
fn test_config_file_roundtrip() {
    let ws = Workspace::new();
    let path = ws.file(
        "config.json",
        r#"{
            "prefer_magic": true,
            "heuristics": {"threshold": 1},
            "interpreters": {"extra": {"lua": ["lua"]}}
        }"#,
    );
    let config = IdentifyConfig::from_json_file(&path).unwrap();
    assert!(config.prefer_magic);
    assert!(!config.prefer_identify);

    let mi = MagicIdentify::new(config);
    assert!(mi.prefers_magic());

    let script = ws.file("script", "#!/usr/local/bin/lua\n");
    assert_eq!(mi.classify_by_interpreter(&script).as_pair(), ("lua", "text/x-lua"));

    let two = ws.file("two", "sudo\nmkdir\n");
    assert_eq!(mi.classify_by_heuristic(&two).label, "unmarked shell");
}

#[test]
fn test_extra_magic_rule_overrides_builtin() {
    let config = IdentifyConfig::from_json_str(
        r#"{"signature": {"extra_rules": [
            {"pattern": "cafebabe", "mime": "application/x-java-applet"}
        ]}}"#,
    )
    .unwrap();
    let ws = Workspace::new();
    let class = ws.file("Hello.class", b"\xca\xfe\xba\xbe\x00\x00\x00\x34");
    let mi = MagicIdentify::new(config);
    assert_eq!(mi.identify(&class).mime, "application/x-java-applet");
}

#[test]
fn test_bad_rule_degrades_backend_and_keeps_working() {
    let config = IdentifyConfig::from_json_str(
        r#"{"signature": {"extra_rules": [{"pattern": "zz", "mime": "x/y"}]}}"#,
    )
    .unwrap();
    let sink = RecordingSink::new();
    let mi = MagicIdentify::builder(config).event_sink(sink.clone()).build();

    match mi.signature_classifier().backend() {
        SignatureBackend::Ready(source) => assert_eq!(source.mode(), SignatureMode::Description),
        SignatureBackend::Unavailable { reason, .. } => panic!("unexpectedly unavailable: {reason}"),
    }
    assert!(matches!(
        sink.events().first(),
        Some(IdentifyEvent::BackendDegraded { .. })
    ));

    // Description output is never "boring" by label, so it is returned as-is.
    let ws = Workspace::new();
    let prose = ws.file("prose", PROSE);
    assert_eq!(mi.identify(&prose).as_pair(), ("ASCII text", "ASCII text"));
}
