//! Line structure: round-trip split, newline termination, client prefix

use faultlog_core::{ErrorEvent, LogCategory, RequestContext, Severity};
use pretty_assertions::assert_eq;
use regex::Regex;
use tests::{full_context, TestLogger};

fn error_line_pattern() -> Regex {
    Regex::new(
        r"^\[(?P<ts>[^\]]+)\] (?:\[ client (?P<ip>[^ ]+) \] )?PHP (?P<label>[^:]*): (?:(?P<message>.*) )?in (?P<file>.+):(?P<line>\d+) \((?P<code>-?\d+)\)",
    )
    .unwrap()
}

#[test]
fn test_round_trip_recovers_fields() {
    let t = TestLogger::new();
    let cases = [
        (Severity::Warning.code(), "deprecated call", "/app/x.php", 10u32),
        (Severity::UserNotice.code(), "cache is cold", "src/cache.rs", 221),
        (Severity::Deprecated.code(), "old api: use v2", "C:/srv/app.rs", 7),
        (12345, "unknown code", "lib.rs", 1),
    ];

    for (code, message, file, line) in cases {
        assert!(t
            .logger
            .log_errors(&full_context(), &ErrorEvent::new(code, message, file, line)));
    }

    let pattern = error_line_pattern();
    let records: Vec<String> = t
        .lines(LogCategory::Php)
        .into_iter()
        .filter(|l| !l.starts_with('\t'))
        .collect();
    assert_eq!(records.len(), cases.len());

    for (record, (code, message, file, line)) in records.iter().zip(cases) {
        let caps = pattern.captures(record).expect(record);
        assert_eq!(&caps["code"], code.to_string());
        assert_eq!(&caps["message"], message);
        assert_eq!(&caps["file"], file);
        assert_eq!(&caps["line"], line.to_string());
        assert_eq!(&caps["ip"], "198.51.100.4");
        assert_eq!(&caps["label"], faultlog_core::translate(code));
    }
}

#[test]
fn test_timestamp_is_rfc2822() {
    let t = TestLogger::new();
    assert!(t
        .logger
        .log_errors(&RequestContext::new(), &ErrorEvent::new(1, "x", "f.rs", 1)));

    let content = t.read(LogCategory::Php);
    let caps = error_line_pattern().captures(&content).unwrap();
    assert!(chrono::DateTime::parse_from_rfc2822(&caps["ts"]).is_ok());
}

#[test]
fn test_every_record_ends_with_one_newline() {
    let contexts = [
        RequestContext::new(),
        full_context(),
        RequestContext::new().with_referer("http://ref/"),
        RequestContext::new().with_request_uri("/only-uri"),
    ];

    for ctx in contexts {
        let t = TestLogger::new();
        let event = ErrorEvent::new(2, "trailing newline\n", "f.rs", 3).with_extra("extra\n\n");
        assert!(t.logger.log_errors(&ctx, &event));
        assert!(t.logger.log_not_found(&ctx));
        assert!(t.logger.log_failed_login(&ctx, "bob"));

        for category in [LogCategory::Php, LogCategory::NotFound, LogCategory::Login] {
            let content = t.read(category);
            assert!(content.ends_with('\n'), "{:?}", content);
            assert!(!content.ends_with("\n\n"), "{:?}", content);
        }
    }
}

#[test]
fn test_continuation_lines_are_tab_indented() {
    let t = TestLogger::new();
    let event = ErrorEvent::new(2, "line one\nline two", "f.rs", 3)
        .with_extra("free text\nmore text");
    assert!(t.logger.log_errors(&full_context(), &event));

    let lines = t.lines(LogCategory::Php);
    assert!(lines[0].starts_with('['));
    assert!(lines[1..].iter().all(|l| l.starts_with('\t')), "{:?}", lines);
    assert!(lines.contains(&"\trequest url: https://shop.example/cart?id=7".to_string()));
}

#[test]
fn test_forwarded_for_takes_priority() {
    let t = TestLogger::new();
    let ctx = full_context()
        .with_forwarded_for("203.0.113.50")
        .with_client_ip("192.0.2.99");
    assert!(t.logger.log_failed_login(&ctx, "carol"));

    let content = t.read(LogCategory::Login);
    assert!(content.contains("] [ client 203.0.113.50 ] User: 'carol' referer: https://shop.example/ \n"));
}

#[test]
fn test_empty_client_fields_fall_through() {
    let t = TestLogger::new();
    let ctx = RequestContext::new()
        .with_forwarded_for("")
        .with_remote_addr("")
        .with_client_ip("192.0.2.99");
    assert!(t.logger.log_failed_login(&ctx, "dave"));
    assert!(t.read(LogCategory::Login).contains("[ client 192.0.2.99 ]"));
}
