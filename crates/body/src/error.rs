//! Body core error types.

use thiserror::Error;

/// Errors raised by body construction and mutation.
///
/// Profile variants are configuration errors caught at construction time.
/// `ShortenPastEnd` signals broken arithmetic in the caller and must not be
/// ignored.
#[derive(Debug, Error, PartialEq)]
pub enum BodyError {
    #[error("Shape profile needs at least 2 entries, got {0}")]
    ProfileTooShort(usize),

    #[error("Full radius anchor {anchor} outside 0..={max}")]
    InvalidAnchor { anchor: usize, max: usize },

    #[error("Full radius anchor {anchor} is on a slope: radius {radius} != next radius {next}")]
    DiscontinuousAnchor { anchor: usize, radius: f64, next: f64 },

    #[error("Invalid shape profile entry {index}: {reason}")]
    InvalidProfile { index: usize, reason: &'static str },

    #[error("Body length must be positive, got {0}")]
    InvalidLength(f64),

    #[error("Advance distance must not be negative, got {0}")]
    NegativeDistance(f64),

    #[error("Cannot shorten segment of length {length} by {amount}")]
    ShortenPastEnd { amount: f64, length: f64 },
}
