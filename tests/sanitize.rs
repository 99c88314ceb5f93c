//! Behavioural tests for the sanitization stages through the public API.

use pdfscrub::{
    normalize_whitespace, redact_indicators, remove_code_blocks, sanitize_text, Sanitizer,
    SignatureMatching,
};

const PROSE: &[&str] = &[
    "",
    "The actor relied on spear-phishing.\n",
    "Overview\n\n\nInitial access was gained\nthrough a VPN appliance.\n\n",
    "  indented prose line\n\tand a tab\nno trailing newline",
    "Importantly, the defines were not public.\n1. First stage\n2. Second stage\n",
];

#[test]
fn code_free_text_is_unchanged_by_code_removal() {
    for text in PROSE {
        assert_eq!(remove_code_blocks(text), *text, "input: {text:?}");
    }
}

#[test]
fn single_code_line_then_two_blanks() {
    let text = "intro\n#include <windows.h>\n\n\nafter\n";
    assert_eq!(remove_code_blocks(text), "intro\n\nafter\n");
}

#[test]
fn consecutive_code_lines_form_one_block() {
    let text = "before\n\n\nvoid run(int x) {\n  char buf[64];\n  memcpy(buf, x);\n}\nstill code\n\n\nprose";
    assert_eq!(remove_code_blocks(text), "before\n\n\n\nprose");
}

#[test]
fn single_blank_line_does_not_end_a_block() {
    let text = "import sys\n\nsys.exit(1)\n\nmain()\n\n\ntail";
    assert_eq!(remove_code_blocks(text), "\ntail");
}

#[test]
fn numbered_and_hex_listings_are_dropped() {
    let text = "Listing:\n  12  mov eax, 1\n13 xor ebx, ebx\n\n\n00401000 55 8B EC 83\n\n\nend";
    assert_eq!(remove_code_blocks(text), "Listing:\n\n\nend");
}

#[test]
fn case_insensitive_catalogue_catches_capitalised_keywords() {
    let text = "Import duties rose sharply.\n\n\nnext";
    assert_eq!(remove_code_blocks(text), text);
    let sanitized = Sanitizer::new(SignatureMatching::CaseInsensitive).sanitize(text);
    assert_eq!(sanitized, "\nnext");
}

#[test]
fn whitespace_normalization_is_idempotent() {
    for text in PROSE {
        let once = normalize_whitespace(text);
        assert_eq!(normalize_whitespace(&once), once, "input: {text:?}");
    }
}

#[test]
fn defanged_url_leaves_no_indicator_fragments() {
    let out = redact_indicators("seen at hxxp[:]//example.com/x in March");
    for token in out.split_whitespace() {
        assert!(!token.contains("hxxp"), "{out:?}");
        assert!(!token.contains("http"), "{out:?}");
        assert!(!token.contains(".com/"), "{out:?}");
    }
    assert_eq!(out, "seen at  in March");
}

#[test]
fn end_to_end_scenario() {
    let raw = "1 import os\n\nsome prose.\n\n\nmore prose at http://evil.example.com/x here.";
    let out = sanitize_text(raw);
    assert!(!out.contains("import"));
    assert!(!out.contains("http"));
    assert!(!out.contains(".com/"));
    assert!(out.contains("more prose at"));
    assert!(out.ends_with("here."));
}

#[test]
fn indicator_list_on_separate_lines_is_fully_redacted() {
    let out = sanitize_text("IOCs:\nevil.com/a\nbad.com/b\nworse.com/c\n");
    for token in out.split_whitespace() {
        assert!(!token.contains(".com/"), "{out:?}");
    }
    assert_eq!(out.trim(), "IOCs:");
}
