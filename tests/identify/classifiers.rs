//! Direct classifier invocation through the public surface.

use magic_identify::identify::{parse_directive, BuiltinTags, TagLookup};
use magic_identify::{Classification, MagicIdentify};

use crate::common::test_data::*;
use crate::common::Workspace;

#[test]
fn test_heuristic_threshold() {
    let ws = Workspace::new();
    let mi = MagicIdentify::default();

    let three = ws.file("three", THREE_MARKERS);
    assert_eq!(mi.classify_by_heuristic(&three), Classification::unknown());

    let four = ws.file("four", "wget\ncurl\nchmod\nrm\n");
    assert_eq!(
        mi.classify_by_heuristic(&four).as_pair(),
        ("unmarked shell", "text/x-shellscript")
    );

    // Repeats on a single line count once per occurrence.
    let repeated = ws.file("repeated", "rm rm rm rm\n");
    assert_eq!(mi.classify_by_heuristic(&repeated).label, "unmarked shell");
}

#[test]
fn test_heuristic_requires_exact_tokens() {
    let ws = Workspace::new();
    let mi = MagicIdentify::default();
    let f = ws.file("subs", "disarmed\ndisarmed\ndisarmed\ndisarmed\nshell\nalias_\n");
    assert_eq!(mi.classify_by_heuristic(&f), Classification::unknown());
}

#[test]
fn test_interpreter_indirection() {
    assert_eq!(
        parse_directive("#!/usr/bin/env python3").unwrap(),
        parse_directive("#!/usr/bin/python3").unwrap()
    );

    let ws = Workspace::new();
    let mi = MagicIdentify::default();
    let env = ws.file("env", "#!/usr/bin/env python3\n");
    let direct = ws.file("direct", "#!/usr/bin/python3\n");
    assert_eq!(mi.classify_by_interpreter(&env), mi.classify_by_interpreter(&direct));
    assert_eq!(
        mi.classify_by_interpreter(&env).as_pair(),
        ("python/python3", "text/x-python")
    );
}

#[test]
fn test_interpreter_variants() {
    let ws = Workspace::new();
    let mi = MagicIdentify::default();

    let cases = [
        ("#!/bin/sh\n", ("shell/sh", "text/x-shell")),
        ("#!/usr/bin/perl -w\n", ("perl", "text/x-perl")),
        ("#!/bin/env node\n", ("javascript", "text/x-javascript")),
        ("#!/usr/bin/python3.12\n", ("python/python3", "text/x-python")),
        ("#!/opt/weird/interp\n", ("unknown", "text/x-unknown")),
        ("#!/usr/bin/env\n", ("unknown", "unknown")),
    ];
    for (i, (contents, expected)) in cases.iter().enumerate() {
        let f = ws.file(&format!("case{i}"), contents);
        assert_eq!(mi.classify_by_interpreter(&f).as_pair(), *expected, "{contents:?}");
    }
}

#[test]
fn test_builtin_tags_public() {
    let tags = BuiltinTags::new();
    assert_eq!(tags.tags_from_interpreter("zsh"), vec!["shell", "zsh"]);
}

#[test]
fn test_signature_on_common_formats() {
    let ws = Workspace::new();
    let mi = MagicIdentify::default();

    let zip = ws.file("a.bin", b"PK\x03\x04\x14\x00\x00\x00\x08\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00");
    assert_eq!(mi.classify_by_signature(&zip).mime, "application/zip");

    let empty = ws.file("empty", "");
    assert_eq!(mi.classify_by_signature(&empty).mime, "application/x-empty");
    // Empty files are not boring, so the signature answer stands.
    assert_eq!(mi.identify(&empty).mime, "application/x-empty");

    let blob = ws.file("blob", [0u8, 1, 2, 3, 0xff, 0xfe, 0x10, 0x80]);
    assert_eq!(
        mi.classify_by_signature(&blob).as_pair(),
        ("application/octet-stream", "application/octet-stream")
    );
}
