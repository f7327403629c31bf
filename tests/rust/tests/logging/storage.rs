//! On-disk layout, failure handling and concurrent appends

use std::sync::Arc;
use std::thread;

use faultlog_core::{ErrorEvent, LogCategory, LogWriter, LoggerConfig, RequestContext};
use regex::Regex;
use tests::TestLogger;

#[test]
fn test_categories_use_separate_trees() {
    let t = TestLogger::new();
    let today = chrono::Local::now().date_naive();

    assert!(t
        .logger
        .log_errors(&RequestContext::new(), &ErrorEvent::new(2, "w", "f.rs", 1)));
    assert!(t.logger.log_not_found(&RequestContext::new().with_request_uri("/x")));
    assert!(t.logger.log_failed_login(&RequestContext::new(), "eve"));

    for category in [LogCategory::Php, LogCategory::NotFound, LogCategory::Login] {
        let expected = t
            .root()
            .join(category.as_str())
            .join(today.format("%Y").to_string())
            .join(today.format("%m").to_string())
            .join(format!("{}_{}.log", category, today.format("%Y_%m_%d")));
        assert_eq!(t.path(category), expected);
        assert!(expected.is_file(), "{:?}", expected);
    }
}

#[test]
fn test_writes_append() {
    let t = TestLogger::new();
    for i in 0..3 {
        assert!(t.logger.log_failed_login(&RequestContext::new(), &format!("user{}", i)));
    }
    let lines = t.lines(LogCategory::Login);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].ends_with("User: 'user2'"));
}

#[test]
fn test_unwritable_folder_returns_false() {
    let t = TestLogger::new();
    std::fs::write(t.root().join("login"), "a file, not a directory").unwrap();

    assert!(!t.logger.log_failed_login(&RequestContext::new(), "mallory"));
    assert!(t.logger.log_not_found(&RequestContext::new()));
}

#[test]
fn test_print_errors_still_writes_file() {
    let t = TestLogger::with_config(LoggerConfig::default().with_print_errors(true));
    assert!(t.logger.config().print_errors);
    assert!(t
        .logger
        .log_errors(&RequestContext::new(), &ErrorEvent::new(8, "echoed", "f.rs", 1)));
    assert!(t.read(LogCategory::Php).contains("PHP Notice: echoed in f.rs:1 (8)"));
}

#[test]
fn test_concurrent_writers_keep_lines_whole() {
    let t = TestLogger::new();
    let threads: Vec<_> = (0..8)
        .map(|worker| {
            let logger = Arc::clone(&t.logger);
            thread::spawn(move || {
                for i in 0..50 {
                    let ctx = RequestContext::new().with_request_uri(format!("/w{}/r{}", worker, i));
                    assert!(logger.log_not_found(&ctx));
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }

    let pattern = Regex::new(r"^\[[^\]]+\] request url: /w\d/r\d+$").unwrap();
    let lines = t.lines(LogCategory::NotFound);
    assert_eq!(lines.len(), 400);
    assert!(lines.iter().all(|l| pattern.is_match(l)));
}

#[test]
fn test_writer_can_be_used_directly() {
    let t = TestLogger::new();
    let writer = LogWriter::new(t.root());
    let date = chrono::NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

    assert!(writer.write(LogCategory::Php, date, "raw line\n"));
    let content =
        std::fs::read_to_string(t.root().join("php/2023/12/php_2023_12_31.log")).unwrap();
    assert_eq!(content, "raw line\n");
}
