//! Body proportions policies.
//!
//! A policy partitions the current centerline length into a fixed number of
//! shape zones (tail, body, neck, face) and reports where each zone ends and
//! how thick the body is there.

mod array;
mod feedable;
mod fixed;

pub use array::ArrayProportions;
pub use feedable::FeedableProportions;
pub use fixed::FixedProportions;

use crate::config::ShapeConfig;
use crate::error::BodyError;

/// Shape policy consulted by the body model on every re-tessellation.
pub trait BodyProportions: Send + Sync + std::fmt::Debug {
    /// Rescale the profile to a new total centerline length.
    fn resize(&mut self, full_length: f64);

    /// Hard reset to a new length, dropping any growth still pending.
    fn reset(&mut self, full_length: f64) {
        self.resize(full_length);
    }

    /// Length passed to the last resize.
    fn full_length(&self) -> f64;

    /// Number of shape zones.
    fn segment_count(&self) -> usize;

    /// Distance from the tail tip at which zone `index` ends.
    fn segment_end_from_tail(&self, index: usize) -> f64;

    /// Radius at the end of zone `index`.
    fn segment_radius(&self, index: usize) -> f64;

    /// Called once per body advance with the travelled distance.
    fn advance(&mut self, _distance: f64) {}

    /// Called when the creature eats.
    fn feed(&mut self) {}

    /// Growth accepted by `feed` but not yet grown into.
    fn pending_growth(&self) -> f64 {
        0.0
    }
}

/// Build the proportions policy described by a shape config.
pub fn from_config(shape: &ShapeConfig) -> Result<Box<dyn BodyProportions>, BodyError> {
    let profile: Vec<(f64, f64)> = shape.profile.iter().map(|&[l, r]| (l, r)).collect();
    let fixed = FixedProportions::new(&profile, shape.anchor_index, shape.max_radius)?;
    if shape.feedable {
        Ok(Box::new(FeedableProportions::new(fixed, shape.feed_by_ratio)))
    } else {
        Ok(Box::new(fixed))
    }
}

/// Checks that length fractions are within `[0, 1]` and never decrease.
pub(crate) fn validate_fractions<I>(fractions: I) -> Result<(), BodyError>
where
    I: IntoIterator<Item = f64>,
{
    let mut prev = 0.0;
    for (index, fraction) in fractions.into_iter().enumerate() {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(BodyError::InvalidProfile {
                index,
                reason: "length fraction outside [0, 1]",
            });
        }
        if fraction < prev {
            return Err(BodyError::InvalidProfile {
                index,
                reason: "length fractions must not decrease",
            });
        }
        prev = fraction;
    }
    Ok(())
}
