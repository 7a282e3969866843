//! Fixed-ratio proportions.

use tracing::debug;

use super::{validate_fractions, BodyProportions};
use crate::error::BodyError;

/// Profile whose lengths and radii are constant fractions of the full length,
/// until the radius at the anchor zone reaches `max_radius`.
///
/// Once saturated the radius profile freezes. Zones up to the anchor stay
/// measured from the tail, zones after it are measured back from the nose, so
/// the neck and face keep their absolute shape and only the flat run after
/// the anchor lengthens.
#[derive(Debug, Clone)]
pub struct FixedProportions {
    lengths: Vec<f64>,
    radii: Vec<f64>,
    anchor: usize,
    max_radius: f64,
    full_length: f64,
    ratio: f64,
    saturated: bool,
}

impl FixedProportions {
    /// Create a profile from `(length_fraction, radius_fraction)` pairs.
    ///
    /// The anchor must start a flat run: its radius equals the next one.
    pub fn new(profile: &[(f64, f64)], anchor: usize, max_radius: f64) -> Result<Self, BodyError> {
        if profile.len() < 2 {
            return Err(BodyError::ProfileTooShort(profile.len()));
        }
        let max_anchor = profile.len() - 2;
        if anchor > max_anchor {
            return Err(BodyError::InvalidAnchor {
                anchor,
                max: max_anchor,
            });
        }
        let (radius, next) = (profile[anchor].1, profile[anchor + 1].1);
        if radius != next {
            return Err(BodyError::DiscontinuousAnchor {
                anchor,
                radius,
                next,
            });
        }
        validate_fractions(profile.iter().map(|&(l, _)| l))?;
        let last = profile.len() - 1;
        if (profile[last].0 - 1.0).abs() > 1e-9 {
            return Err(BodyError::InvalidProfile {
                index: last,
                reason: "last length fraction must be 1",
            });
        }
        if let Some(index) = profile.iter().position(|&(_, r)| r < 0.0) {
            return Err(BodyError::InvalidProfile {
                index,
                reason: "radius fraction must not be negative",
            });
        }
        if max_radius <= 0.0 {
            return Err(BodyError::InvalidProfile {
                index: anchor,
                reason: "max radius must be positive",
            });
        }

        Ok(Self {
            lengths: profile.iter().map(|&(l, _)| l).collect(),
            radii: profile.iter().map(|&(_, r)| r).collect(),
            anchor,
            max_radius,
            full_length: 0.0,
            ratio: 0.0,
            saturated: false,
        })
    }

    /// Index of the zone where radius growth saturates.
    #[inline]
    pub fn anchor_index(&self) -> usize {
        self.anchor
    }

    /// Whether the last resize hit the radius cap.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    #[inline]
    fn reference_radius(&self) -> f64 {
        self.radii[self.anchor]
    }
}

impl BodyProportions for FixedProportions {
    fn resize(&mut self, full_length: f64) {
        let reference = self.reference_radius();
        let saturated = reference * full_length > self.max_radius;
        if saturated && !self.saturated {
            debug!("Body girth saturated at length {:.3}", full_length);
        }
        self.full_length = full_length;
        self.saturated = saturated;
        self.ratio = if saturated {
            self.max_radius / reference
        } else {
            full_length
        };
    }

    fn full_length(&self) -> f64 {
        self.full_length
    }

    fn segment_count(&self) -> usize {
        self.lengths.len()
    }

    fn segment_end_from_tail(&self, index: usize) -> f64 {
        if !self.saturated || index <= self.anchor {
            self.lengths[index] * self.ratio
        } else {
            self.full_length - (1.0 - self.lengths[index]) * self.ratio
        }
    }

    fn segment_radius(&self, index: usize) -> f64 {
        self.radii[index] * self.ratio
    }
}
