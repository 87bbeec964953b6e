//! Error and Access-Type Tests.

use std::io;
use std::path::PathBuf;

use cachesim_core::common::{AccessType, ConfigError, TraceError};

#[test]
fn zero_sets_message_names_level_and_geometry() {
    let err = ConfigError::ZeroSets {
        level: 2,
        size: 64,
        associativity: 4,
        block_size: 32,
    };
    assert_eq!(
        err.to_string(),
        "L2: cache size 64 is smaller than associativity 4 x block size 32"
    );
}

#[test]
fn too_many_sets_message_names_limit() {
    let err = ConfigError::TooManySets {
        level: 1,
        num_sets: 1 << 36,
        max: 1 << 24,
    };
    assert_eq!(
        err.to_string(),
        "L1: 68719476736 sets exceeds the limit of 16777216"
    );
}

#[test]
fn malformed_trace_message_carries_line_number() {
    let err = TraceError::Malformed {
        line: 7,
        reason: "unknown operation 'x'".to_string(),
    };
    assert_eq!(err.to_string(), "trace line 7: unknown operation 'x'");
}

#[test]
fn io_error_keeps_source() {
    let err = TraceError::Io {
        path: PathBuf::from("missing.trace"),
        source: io::Error::new(io::ErrorKind::NotFound, "gone"),
    };
    assert!(err.to_string().contains("missing.trace"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn access_type_helpers() {
    assert!(AccessType::Write.is_write());
    assert!(!AccessType::Read.is_write());
    assert_eq!(AccessType::Read.mnemonic(), 'r');
    assert_eq!(AccessType::Write.mnemonic(), 'w');
    assert_eq!(AccessType::Write.to_string(), "write");
}
