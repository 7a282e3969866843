//! Section packing error types.

use thiserror::Error;

/// Errors that can occur while decoding a packed section buffer.
#[derive(Debug, Error, PartialEq)]
pub enum SectionError {
    #[error("Unexpected end of data")]
    UnexpectedEof,

    #[error("Section count {declared} does not fit in {available} remaining bytes")]
    CountMismatch { declared: u32, available: usize },
}
