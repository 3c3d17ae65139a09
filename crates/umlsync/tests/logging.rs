//! Tests for logging functionality
//!
//! Initialization can only succeed once per process, so these tests check that
//! every combination initializes or fails gracefully, and that the engine runs
//! under a capturing subscriber.

use std::str::FromStr;

use tracing_subscriber::util::SubscriberInitExt;
use umlsync::core::logging::{init_logging, LogFormat};
use umlsync::plugins::java::{MemoryIndex, TypeFacts};

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert_eq!(variants, &["compact", "pretty", "json"]);
}

#[test]
fn test_init_logging_with_levels() {
    let _ = init_logging(Some("trace"), Some("compact"));
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("warn"), Some("compact"));
    let _ = init_logging(Some("off"), Some("compact"));
}

#[test]
fn test_init_logging_with_formats() {
    let _ = init_logging(Some("info"), Some("pretty"));
    let _ = init_logging(Some("info"), Some("json"));
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_import_under_trace_subscriber() {
    let _guard = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .set_default();

    let index = MemoryIndex::from_types(vec![
        TypeFacts::interface("geo.Shape"),
        TypeFacts::class("geo.Circle").implements("Shape"),
    ]);
    let diagram = umlsync::import(&index, &["geo.Shape", "geo.Circle"]).unwrap();
    assert_eq!(diagram.connection_count(), 1);
}
