//! Feed-driven proportions.

use tracing::debug;

use super::{BodyProportions, FixedProportions};

/// Fixed-ratio profile with delayed growth.
///
/// Eating adds a lump of length to a pending pool and the body grows into it
/// as it moves, at most one unit of length per unit travelled.
#[derive(Debug, Clone)]
pub struct FeedableProportions {
    inner: FixedProportions,
    feed_by_ratio: f64,
    pending: f64,
}

impl FeedableProportions {
    pub fn new(inner: FixedProportions, feed_by_ratio: f64) -> Self {
        Self {
            inner,
            feed_by_ratio,
            pending: 0.0,
        }
    }

    pub fn inner(&self) -> &FixedProportions {
        &self.inner
    }
}

impl BodyProportions for FeedableProportions {
    fn resize(&mut self, full_length: f64) {
        self.inner.resize(full_length);
    }

    fn reset(&mut self, full_length: f64) {
        self.pending = 0.0;
        self.inner.resize(full_length);
    }

    fn full_length(&self) -> f64 {
        self.inner.full_length()
    }

    fn segment_count(&self) -> usize {
        self.inner.segment_count()
    }

    fn segment_end_from_tail(&self, index: usize) -> f64 {
        self.inner.segment_end_from_tail(index)
    }

    fn segment_radius(&self, index: usize) -> f64 {
        self.inner.segment_radius(index)
    }

    fn advance(&mut self, distance: f64) {
        if self.pending <= 0.0 || distance <= 0.0 {
            return;
        }
        let consumed = self.pending.min(distance);
        self.pending -= consumed;
        let full_length = self.inner.full_length() + consumed;
        self.inner.resize(full_length);
    }

    fn feed(&mut self) {
        let growth = self.feed_by_ratio * self.inner.segment_radius(self.inner.anchor_index());
        self.pending += growth;
        debug!("Fed {:.3}, pending growth {:.3}", growth, self.pending);
    }

    fn pending_growth(&self) -> f64 {
        self.pending
    }
}
