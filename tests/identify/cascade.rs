//! End-to-end cascade behaviour with the default `infer` backend.

use magic_identify::identify::{IdentifyEvent, RecordingSink};
use magic_identify::{Classification, IdentifyConfig, MagicIdentify, Strategy};
use rayon::prelude::*;

use crate::common::test_data::*;
use crate::common::Workspace;

/// Native dynamically-linked executable: signature answer is final.
#[test]
fn test_pie_executable_short_circuits() {
    let ws = Workspace::new();
    let exe = ws.file("app", pie_elf());
    let sink = RecordingSink::new();
    let mi = MagicIdentify::builder(IdentifyConfig::default())
        .event_sink(sink.clone())
        .build();

    let expected = Classification::from_signature("application/x-pie-executable");
    assert_eq!(mi.classify_by_signature(&exe), expected);

    let report = mi.identify_report(&exe);
    assert_eq!(report.result, expected);
    assert_eq!(report.strategy, Strategy::Signature);
    assert!(report.interpreter.is_none());
    assert!(report.heuristic.is_none());
    assert!(!sink
        .events()
        .iter()
        .any(|e| matches!(e, IdentifyEvent::Fallthrough { .. })));
}

/// The test binary itself is a real ELF on Linux.
#[cfg(target_os = "linux")]
#[test]
fn test_real_executable() {
    let exe = std::env::current_exe().unwrap();
    let mi = MagicIdentify::default();
    let magic = mi.classify_by_signature(&exe);
    assert!(
        magic.mime == "application/x-pie-executable" || magic.mime == "application/x-executable",
        "unexpected {:?}",
        magic
    );
    assert_eq!(mi.identify(&exe), magic);
}

/// A directory fails every strategy and falls back to the signature sentinel.
#[test]
fn test_directory_falls_back_to_not_found() {
    let ws = Workspace::new();
    let mi = MagicIdentify::default();

    assert_eq!(mi.classify_by_signature(ws.path()).as_pair(), ("Not Found", "missing"));
    assert_eq!(mi.classify_by_interpreter(ws.path()), Classification::unknown());
    assert_eq!(mi.classify_by_heuristic(ws.path()), Classification::unknown());

    let report = mi.identify_report(ws.path());
    assert!(report.fallback);
    assert_eq!(report.result.as_pair(), ("Not Found", "missing"));
}

#[test]
fn test_plain_text_falls_back_to_text_plain() {
    let ws = Workspace::new();
    let notes = ws.file("notes.txt", PROSE);
    let mi = MagicIdentify::default();

    assert_eq!(mi.classify_by_signature(&notes).as_pair(), ("text/plain", "text/plain"));
    assert_eq!(mi.classify_by_interpreter(&notes), Classification::unknown());
    assert_eq!(mi.classify_by_heuristic(&notes), Classification::unknown());
    assert_eq!(mi.identify(&notes).as_pair(), ("text/plain", "text/plain"));
}

#[test]
fn test_env_bash_script_uses_interpreter() {
    let ws = Workspace::new();
    let script = ws.file("run", BASH_ENV);
    let mi = MagicIdentify::default();

    assert!(mi.classify_by_signature(&script).is_boring());
    let report = mi.identify_report(&script);
    assert_eq!(report.strategy, Strategy::Interpreter);
    assert_eq!(report.result.as_pair(), ("shell/bash", "text/x-shell"));
}

#[test]
fn test_headerless_dropper_uses_heuristic() {
    let ws = Workspace::new();
    let dropper = ws.file("x", DROPPER);
    let mi = MagicIdentify::default();

    assert_eq!(mi.classify_by_interpreter(&dropper), Classification::unknown());
    let report = mi.identify_report(&dropper);
    assert_eq!(report.strategy, Strategy::Heuristic);
    assert_eq!(report.result.as_pair(), ("unmarked shell", "text/x-shellscript"));
}

#[test]
fn test_missing_path_is_total() {
    let ws = Workspace::new();
    let mi = MagicIdentify::default();
    let result = mi.identify(ws.path().join("does-not-exist"));
    assert_eq!(result, Classification::not_found());
}

#[test]
fn test_mode_bypass_holds_for_every_input() {
    let ws = Workspace::new();
    let paths = vec![
        ws.file("pie", pie_elf()),
        ws.file("bash", BASH_ENV),
        ws.file("dropper", DROPPER),
        ws.file("prose", PROSE),
        ws.file("empty", ""),
        ws.path().to_path_buf(),
    ];

    let by_identify = MagicIdentify::new(IdentifyConfig::new(true, false));
    let by_magic = MagicIdentify::new(IdentifyConfig::new(false, true));
    for path in &paths {
        assert_eq!(by_identify.identify(path), by_identify.classify_by_interpreter(path));
        assert_eq!(by_magic.identify(path), by_magic.classify_by_signature(path));
    }
}

#[test]
fn test_concurrent_callers_agree_with_sequential() {
    let ws = Workspace::new();
    let paths: Vec<_> = (0..32)
        .map(|i| match i % 4 {
            0 => ws.file(&format!("f{i}"), pie_elf()),
            1 => ws.file(&format!("f{i}"), BASH_ENV),
            2 => ws.file(&format!("f{i}"), DROPPER),
            _ => ws.file(&format!("f{i}"), PROSE),
        })
        .collect();

    let mi = MagicIdentify::default();
    let sequential: Vec<Classification> = paths.iter().map(|p| mi.identify(p)).collect();
    let parallel: Vec<Classification> = paths.par_iter().map(|p| mi.identify(p)).collect();
    assert_eq!(sequential, parallel);
}
