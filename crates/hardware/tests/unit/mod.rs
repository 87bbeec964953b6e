//! # Unit Components
//!
//! Tests grouped by the library module they exercise.
