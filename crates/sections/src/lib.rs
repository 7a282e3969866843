//! Shared section contract for the snake body core.
//!
//! This crate contains:
//! - `DirectedSection`, one sampled point of the body centerline
//! - Little-endian packing of section sequences for render collaborators

mod binary;
mod error;

pub use binary::{SectionReader, SectionWriter, SECTION_STRIDE};
pub use error::SectionError;

use glam::{DVec2, DVec3};

/// A single point along the body centerline.
///
/// `prev_length` is the run length of the segment ending at this point and
/// `alpha` its heading in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectedSection {
    pub center: DVec3,
    pub radius: f64,
    pub prev_length: f64,
    pub alpha: f64,
}

impl DirectedSection {
    pub const fn new(center: DVec3, radius: f64, prev_length: f64, alpha: f64) -> Self {
        Self {
            center,
            radius,
            prev_length,
            alpha,
        }
    }

    /// Center projected onto the floor plane.
    #[inline]
    pub fn center_xy(&self) -> DVec2 {
        self.center.truncate()
    }
}
