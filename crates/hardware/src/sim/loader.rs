//! Trace File Loader.
//!
//! This module provides utilities for reading traces from disk. It performs:
//! 1. **Whole-file loading:** Reads every record up front, as the Optimal policy's look-ahead requires.
//! 2. **Streaming:** Opens a file as a lazy [`TraceReader`] for the other policies.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use super::trace::{TraceReader, TraceRecord};
use crate::common::TraceError;

/// Opens a trace file as a lazy record iterator.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be opened.
pub fn open_trace(path: impl AsRef<Path>) -> Result<TraceReader<BufReader<File>>, TraceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TraceReader::with_path(BufReader::new(file), path))
}

/// Loads every record of a trace file.
///
/// # Errors
///
/// Returns the first [`TraceError`] encountered; no partial trace is returned.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, TraceError> {
    let path = path.as_ref();
    let records = open_trace(path)?.collect::<Result<Vec<_>, _>>()?;
    debug!(path = %path.display(), records = records.len(), "trace loaded");
    Ok(records)
}
