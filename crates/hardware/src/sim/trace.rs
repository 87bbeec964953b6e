//! Memory-access trace records and line parsing.
//!
//! A trace is a text stream with one access per line:
//!
//! ```text
//! # comment
//! r 0x7fff5a10
//! W 1f00
//! ```
//!
//! The operation is `r`/`R` (read) or `w`/`W` (write); the address is
//! hexadecimal with an optional `0x` prefix. Blank lines and lines starting
//! with `#` are skipped.

use std::fmt;
use std::io::{self, BufRead, Lines};
use std::path::PathBuf;

use crate::common::{AccessType, TraceError};

/// One parsed trace access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Read or write.
    pub op: AccessType,
    /// Byte address.
    pub addr: u64,
}

impl TraceRecord {
    /// Creates a record.
    pub const fn new(op: AccessType, addr: u64) -> Self {
        Self { op, addr }
    }

    /// Shorthand for a read record.
    pub const fn read(addr: u64) -> Self {
        Self::new(AccessType::Read, addr)
    }

    /// Shorthand for a write record.
    pub const fn write(addr: u64) -> Self {
        Self::new(AccessType::Write, addr)
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:#x}", self.op.mnemonic(), self.addr)
    }
}

/// Parses one trace line.
///
/// # Arguments
///
/// * `line` - Raw line text.
/// * `line_no` - 1-based line number, used in error reports.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] if the operation or address cannot be parsed.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceRecord>, TraceError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let malformed = |reason: String| TraceError::Malformed {
        line: line_no,
        reason,
    };

    let mut fields = line.split_whitespace();
    let (Some(op), Some(addr)) = (fields.next(), fields.next()) else {
        return Err(malformed(format!("expected '<r|w> <address>', got '{line}'")));
    };
    if let Some(extra) = fields.next() {
        return Err(malformed(format!("unexpected trailing field '{extra}'")));
    }

    let op = match op {
        "r" | "R" => AccessType::Read,
        "w" | "W" => AccessType::Write,
        other => return Err(malformed(format!("unknown operation '{other}'"))),
    };

    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let addr = u64::from_str_radix(digits, 16)
        .map_err(|e| malformed(format!("invalid address '{addr}': {e}")))?;

    Ok(Some(TraceRecord { op, addr }))
}

/// Lazy iterator over the records of a buffered trace stream.
///
/// Yields one `Result` per access line; blank and comment lines are skipped.
/// A line that is not valid UTF-8 is reported as malformed and skipped.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
    path: PathBuf,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader. I/O errors are reported against `<stream>`.
    pub fn new(reader: R) -> Self {
        Self::with_path(reader, "<stream>")
    }

    /// Wraps a buffered reader whose I/O errors should name `path`.
    pub fn with_path(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            path: path.into(),
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Some(Err(TraceError::Malformed {
                        line: self.line_no,
                        reason: format!("line is not valid UTF-8: {e}"),
                    }));
                }
                Err(source) => {
                    return Some(Err(TraceError::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            match parse_line(&line, self.line_no) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
