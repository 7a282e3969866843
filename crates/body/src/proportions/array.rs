//! Literal zone table proportions.

use super::{validate_fractions, BodyProportions};
use crate::error::BodyError;

/// Zone ends scale with the full length, radii are absolute.
#[derive(Debug, Clone)]
pub struct ArrayProportions {
    ends: Vec<f64>,
    radii: Vec<f64>,
    full_length: f64,
}

impl ArrayProportions {
    /// Create from `(end_fraction, radius)` pairs ordered tail first.
    pub fn new(zones: &[(f64, f64)]) -> Result<Self, BodyError> {
        if zones.is_empty() {
            return Err(BodyError::ProfileTooShort(0));
        }
        validate_fractions(zones.iter().map(|&(end, _)| end))?;
        Ok(Self {
            ends: zones.iter().map(|&(end, _)| end).collect(),
            radii: zones.iter().map(|&(_, r)| r).collect(),
            full_length: 0.0,
        })
    }
}

impl BodyProportions for ArrayProportions {
    fn resize(&mut self, full_length: f64) {
        self.full_length = full_length;
    }

    fn full_length(&self) -> f64 {
        self.full_length
    }

    fn segment_count(&self) -> usize {
        self.ends.len()
    }

    fn segment_end_from_tail(&self, index: usize) -> f64 {
        self.ends[index] * self.full_length
    }

    fn segment_radius(&self, index: usize) -> f64 {
        self.radii[index]
    }
}
