//! Process-wide handler tests
//!
//! The panic hook and the installed handler are global, so every test
//! takes the `serial` lock and installs its own logger.

use std::panic;
use std::sync::{Mutex, MutexGuard};

use faultlog_core::{ErrorEvent, LogCategory, Severity};
use faultlog_hooks::{dispatch_error, handler, set_handler, trigger_error};
use tests::TestLogger;

fn serial() -> MutexGuard<'static, ()> {
    static SERIAL: Mutex<()> = Mutex::new(());
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// The `#0` line of the first stack trace in `content`.
fn first_frame(content: &str) -> &str {
    content
        .lines()
        .find(|l| l.starts_with("\t#0 "))
        .unwrap_or_default()
}

#[inline(never)]
fn load_inventory() {
    panic!("boom {}", 1)
}

const RESTOCK_LINE: u32 = line!() + 3;
#[inline(never)]
fn restock_shelves() -> bool {
    trigger_error!(Severity::UserWarning, "disk at {}%", 95)
}

#[test]
fn test_panic_is_logged_immediately() {
    let _serial = serial();
    let t = TestLogger::new();
    let guard = set_handler(t.logger.clone());

    let result = panic::catch_unwind(load_inventory);
    assert!(result.is_err());

    let content = t.read(LogCategory::Php);
    assert!(content.contains("PHP Error: boom 1 in "), "{}", content);
    assert!(content.contains(&format!("in {}:", file!())));
    assert!(content.contains(" (1)"));
    assert!(content.contains("\tStack trace:"));
    assert!(first_frame(&content).contains("load_inventory"), "{}", content);

    drop(guard);
    // nothing left for shutdown
    assert_eq!(t.read(LogCategory::Php).matches("PHP Error").count(), 1);
}

#[test]
fn test_unwritten_panic_is_logged_at_shutdown() {
    let _serial = serial();
    let t = TestLogger::new();
    let blocker = t.root().join("php");
    std::fs::write(&blocker, "not a directory").unwrap();

    let guard = set_handler(t.logger.clone());
    let result = panic::catch_unwind(|| panic!("lost write"));
    assert!(result.is_err());

    let fatal = t.logger.last_fatal().expect("panic kept as last fatal");
    assert_eq!(fatal.message, "lost write");
    assert_eq!(fatal.code, Severity::Error.code());

    std::fs::remove_file(&blocker).unwrap();
    drop(guard);

    let content = t.read(LogCategory::Php);
    assert!(content.contains("PHP Error: in "), "{}", content);
    assert!(content.contains(")\n\tlost write\n"));
    assert!(t.logger.last_fatal().is_none());
}

#[test]
fn test_recorded_fatal_is_logged_when_guard_drops() {
    let _serial = serial();
    let t = TestLogger::new();
    let guard = set_handler(t.logger.clone());

    t.logger.record_fatal(ErrorEvent::new(
        Severity::CoreError,
        "worker pool exhausted\nafter 3 retries",
        "src/pool.rs",
        88,
    ));
    assert_eq!(t.read(LogCategory::Php), "");
    drop(guard);

    let content = t.read(LogCategory::Php);
    assert!(content.contains(
        "PHP Core error: in src/pool.rs:88 (16)\n\tworker pool exhausted\n\tafter 3 retries\n"
    ));
}

#[test]
fn test_trigger_error_reports_call_site() {
    let _serial = serial();
    let t = TestLogger::new();
    let _guard = set_handler(t.logger.clone());

    assert!(restock_shelves());

    let content = t.read(LogCategory::Php);
    assert!(
        content.contains(&format!(
            "PHP User warning: disk at 95% in {}:{} (512)",
            file!(),
            RESTOCK_LINE
        )),
        "{}",
        content
    );
    assert!(content.contains("\tStack trace:"));
    assert!(first_frame(&content).contains("restock_shelves"), "{}", content);
}

#[test]
fn test_silenced_errors_are_not_written() {
    let _serial = serial();
    let t = TestLogger::new();
    let _guard = set_handler(t.logger.clone());

    {
        let _quiet = t.logger.silence();
        assert!(trigger_error!(Severity::Notice, "ignored"));
    }
    assert_eq!(t.read(LogCategory::Php), "");

    assert!(trigger_error!(Severity::Notice, "reported"));
    assert!(t.read(LogCategory::Php).contains("PHP Notice: reported in "));
}

#[test]
fn test_reregistration_replaces_handler() {
    let _serial = serial();
    let first = TestLogger::new();
    let second = TestLogger::new();

    let first_guard = set_handler(first.logger.clone());
    let _second_guard = set_handler(second.logger.clone());
    drop(first_guard);

    assert!(std::sync::Arc::ptr_eq(
        &handler().expect("installed"),
        &second.logger
    ));
    assert!(dispatch_error(Severity::Warning, "to the second", "main.rs", 4));

    assert_eq!(first.read(LogCategory::Php), "");
    assert!(second.read(LogCategory::Php).contains("to the second"));
}
