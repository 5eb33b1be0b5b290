//! Error type tests
//!
//! Tests for RescatError and its conversions.

#![allow(clippy::expect_used)]

use super::*;

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_cycle_display_joins_path() {
    let err = deps::cycle(vec![
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "a".to_string(),
    ]);
    assert_eq!(
        err.to_string(),
        "Circular dependency detected: a -> b -> c -> a"
    );
}

#[test]
fn test_error_code() {
    let err = deps::unresolved("auth", "api-client");
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("rescat::deps::unresolved".to_string())
    );
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: RescatError = io_err.into();
    assert!(matches!(err, RescatError::IoError { .. }));
}

#[test]
fn test_yaml_error_conversion() {
    let parse_result: std::result::Result<serde_yaml::Value, _> =
        serde_yaml::from_str("invalid: yaml: content: [unclosed");
    let err: RescatError = parse_result.expect_err("yaml should not parse").into();
    assert!(matches!(err, RescatError::ConfigParseFailed { .. }));
}

#[test]
fn test_json_error_conversion() {
    let parse_result: std::result::Result<serde_json::Value, _> =
        serde_json::from_str("invalid json content");
    let err: RescatError = parse_result.expect_err("json should not parse").into();
    assert!(matches!(err, RescatError::ConfigParseFailed { .. }));
}

#[test]
fn test_only_exhausted_transient_failures_are_transient() {
    assert!(fetch::transient("a", 3, "timed out").is_transient());
    assert!(!fetch::permanent("a", "gone").is_transient());
    assert!(!fetch::checksum_mismatch("a", "blake3:00", "blake3:11").is_transient());
}

test_error_contains!(
    test_unresolved_dependency_names_both_sides,
    deps::unresolved("auth", "api-client"),
    "'auth'",
    "'api-client'"
);

test_error_contains!(
    test_plan_contract_violation,
    plan::contract_violation("plan is empty"),
    "Install plan rejected",
    "plan is empty"
);

test_error_contains!(
    test_transient_fetch_reports_attempts,
    fetch::transient("hook/lint", 3, "connection reset"),
    "hook/lint",
    "3 attempt(s)",
    "connection reset"
);

test_error_contains!(
    test_permanent_fetch,
    fetch::permanent("hook/lint", "no such file"),
    "Fetching 'hook/lint' failed"
);

test_error_contains!(
    test_checksum_mismatch,
    fetch::checksum_mismatch("a", "blake3:00", "blake3:11"),
    "expected blake3:00",
    "got blake3:11"
);

test_error_contains!(
    test_destination_rejected,
    fetch::destination_rejected("a", "path escapes root"),
    "Destination rejected"
);

test_error_contains!(
    test_source_invalid,
    source::invalid("catalog.yaml", "duplicate identifier 'a'"),
    "catalog.yaml",
    "duplicate identifier"
);

test_error_contains!(
    test_unknown_field,
    source::unknown_field("sort", "colour", &["id", "name"]),
    "Unknown sort field 'colour'"
);

test_error_contains!(
    test_config_parse_failed,
    config::parse_failed("/etc/rescat.yaml", "invalid YAML"),
    "Failed to parse configuration file"
);

test_error_contains!(
    test_config_invalid,
    config::invalid("max_entries must be positive"),
    "Invalid configuration"
);

test_error_contains!(
    test_config_read_failed,
    config::read_failed("/etc/rescat.yaml", "permission denied"),
    "Failed to read configuration file"
);

test_error_contains!(
    test_file_read_failed,
    fs::read_failed(std::path::Path::new("/tmp/x"), "permission denied"),
    "Failed to read file"
);

test_error_contains!(
    test_file_write_failed,
    fs::write_failed(std::path::Path::new("/tmp/x"), "disk full"),
    "Failed to write file",
    "disk full"
);

test_error_contains!(test_io_error, fs::io_error("some error"), "IO error");

test_error_contains!(
    test_cache_operation_failed,
    cache::operation_failed("cache directory missing"),
    "Cache operation failed"
);
