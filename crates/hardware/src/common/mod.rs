//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Address Decoding:** Offset/index/tag decomposition per cache level.
//! 2. **Memory Access:** Read/write classification of trace accesses.
//! 3. **Error Handling:** Configuration and trace error types.

/// Address decomposition into offset, index and tag.
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types for configuration validation and trace reading.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddr};
pub use data::AccessType;
pub use error::{ConfigError, TraceError};
