//! Body model: the segment chain behind the snake's centerline.
//!
//! The chain is a deque of straight physical segments, tail first. Every
//! structural change is followed by a re-tessellation pass that splits the
//! chain at the shape zone boundaries reported by the proportions policy and
//! assigns each piece its end radius. Directed sections and the cached face
//! geometry are rebuilt at the end of that pass.

use std::collections::VecDeque;

use glam::DVec2;
use sections::DirectedSection;
use tracing::{debug, info};

use crate::collision::{self, Collision};
use crate::config::Config;
use crate::error::BodyError;
use crate::field::Scene;
use crate::proportions::{self, BodyProportions};

/// Remaining zone span below which tessellation moves on to the next zone.
pub const SHAPE_EPSILON: f64 = 1e-3;

/// One straight stretch of centerline with a constant heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start: DVec2,
    alpha: f64,
    length: f64,
    end_radius: f64,
}

impl Segment {
    pub fn new(start: DVec2, alpha: f64, length: f64) -> Self {
        Self {
            start,
            alpha,
            length,
            end_radius: 0.0,
        }
    }

    #[inline]
    pub fn start(&self) -> DVec2 {
        self.start
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn end_radius(&self) -> f64 {
        self.end_radius
    }

    /// Unit heading vector.
    #[inline]
    pub fn direction(&self) -> DVec2 {
        DVec2::from_angle(self.alpha)
    }

    #[inline]
    pub fn end(&self) -> DVec2 {
        self.start + self.direction() * self.length
    }

    /// Cut `amount` off the tail end of this segment.
    pub fn shorten(&mut self, amount: f64) -> Result<(), BodyError> {
        if amount >= self.length {
            return Err(BodyError::ShortenPastEnd {
                amount,
                length: self.length,
            });
        }
        self.start += self.direction() * amount;
        self.length -= amount;
        Ok(())
    }
}

/// Head geometry relative to the nose radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadShape {
    /// Nose to head center distance.
    pub offset_ratio: f64,
    /// Head sphere radius.
    pub radius_ratio: f64,
}

/// Cached nose and head quantities of the current chain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Face {
    pub nose: DVec2,
    pub nose_radius: f64,
    pub alpha: f64,
    pub cos: f64,
    pub sin: f64,
    pub head: DVec2,
    pub head_offset: f64,
    pub head_radius: f64,
}

/// The snake body: segment chain, proportions policy and derived views.
#[derive(Debug)]
pub struct BodyModel {
    proportions: Box<dyn BodyProportions>,
    head_shape: HeadShape,
    segments: VecDeque<Segment>,
    floor_z: f64,
    total_length: f64,
    food_run_length: f64,
    /// Turn requested by an advance that travelled no distance.
    pending_turn: f64,
    face: Face,
    sections: Vec<DirectedSection>,
    head_section: Option<DirectedSection>,
}

impl BodyModel {
    /// Create an empty body. Call [`BodyModel::init`] before use.
    pub fn new(proportions: Box<dyn BodyProportions>, head_shape: HeadShape) -> Self {
        Self {
            proportions,
            head_shape,
            segments: VecDeque::new(),
            floor_z: 0.0,
            total_length: 0.0,
            food_run_length: 0.0,
            pending_turn: 0.0,
            face: Face::default(),
            sections: Vec::new(),
            head_section: None,
        }
    }

    /// Build and initialize a body from config.
    pub fn from_config(config: &Config) -> Result<Self, BodyError> {
        let proportions = proportions::from_config(&config.shape)?;
        let head_shape = HeadShape {
            offset_ratio: config.body.head_offset_ratio,
            radius_ratio: config.body.head_radius_ratio,
        };
        let mut model = Self::new(proportions, head_shape);
        let body = &config.body;
        model.init(
            body.start_x,
            body.start_y,
            body.floor_z,
            body.start_angle,
            body.initial_length,
        )?;
        Ok(model)
    }

    /// Reset to a single straight segment.
    pub fn init(
        &mut self,
        start_x: f64,
        start_y: f64,
        floor_z: f64,
        start_angle: f64,
        total_length: f64,
    ) -> Result<(), BodyError> {
        if !(total_length > 0.0) {
            return Err(BodyError::InvalidLength(total_length));
        }
        self.segments.clear();
        self.segments
            .push_back(Segment::new(DVec2::new(start_x, start_y), start_angle, total_length));
        self.floor_z = floor_z;
        self.food_run_length = 0.0;
        self.pending_turn = 0.0;
        self.proportions.reset(total_length);
        self.process_segments()?;
        info!(
            "Body reset at ({:.2}, {:.2}) length {:.2}, {} segments",
            start_x,
            start_y,
            total_length,
            self.segments.len()
        );
        Ok(())
    }

    /// Move the nose forward by `distance` after turning by `angle_delta`.
    pub fn advance(&mut self, distance: f64, angle_delta: f64) -> Result<(), BodyError> {
        if !(distance >= 0.0) {
            return Err(BodyError::NegativeDistance(distance));
        }
        let turn = self.pending_turn + angle_delta;
        if distance == 0.0 {
            self.pending_turn = turn;
            return Ok(());
        }
        let Some(head) = self.segments.back_mut() else {
            return Err(BodyError::InvalidLength(0.0));
        };
        self.pending_turn = 0.0;

        if turn == 0.0 {
            head.length += distance;
        } else {
            let segment = Segment::new(head.end(), head.alpha + turn, distance);
            self.segments.push_back(segment);
        }

        let full_length = self.proportions.full_length();
        self.proportions.advance(distance);
        let grown = (self.proportions.full_length() - full_length).max(0.0);

        let needed = (distance - grown).max(0.0);
        let food = self.food_run_length.min(needed);
        self.food_run_length -= food;
        self.shorten_tail(needed - food)?;

        self.process_segments()
    }

    /// Let the body grow by `amount` before the tail starts shrinking again.
    pub fn feed(&mut self, amount: f64) {
        self.food_run_length += amount.max(0.0);
        debug!("Food run length now {:.3}", self.food_run_length);
    }

    /// Forward a feed to the proportions policy.
    pub fn feed_proportions(&mut self) {
        self.proportions.feed();
    }

    pub fn check_collisions<S: Scene + ?Sized>(&self, scene: &S) -> Collision {
        collision::check_collisions(self, scene)
    }

    fn shorten_tail(&mut self, amount: f64) -> Result<(), BodyError> {
        let mut remaining = amount;
        while remaining > 0.0 {
            let last = self.segments.len() == 1;
            let Some(tail) = self.segments.front_mut() else {
                break;
            };
            if tail.length <= remaining && !last {
                remaining -= tail.length;
                self.segments.pop_front();
            } else {
                tail.shorten(remaining)?;
                break;
            }
        }
        Ok(())
    }

    /// Re-split the chain against the shape zones and refresh derived state.
    fn process_segments(&mut self) -> Result<(), BodyError> {
        let total: f64 = self.segments.iter().map(|s| s.length).sum();
        self.proportions.resize(total);

        // Pieces split off at zone boundaries keep their heading, so joining
        // equal headings leaves one segment per distinct turn.
        let mut source: VecDeque<Segment> = VecDeque::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            match source.back_mut() {
                Some(prev) if prev.alpha == segment.alpha => prev.length += segment.length,
                _ => source.push_back(segment),
            }
        }

        let proportions = &self.proportions;
        let count = proportions.segment_count();
        let mut chain = VecDeque::with_capacity(source.len() + count);

        let mut zone = 0;
        let mut zone_start = 0.0;
        let mut zone_end = proportions.segment_end_from_tail(0);
        let mut r0 = 0.0;
        let mut r1 = proportions.segment_radius(0);
        // Zone length still ahead of the cursor; may dip below zero by less
        // than SHAPE_EPSILON when a segment overruns a boundary.
        let mut remaining = zone_end;

        'walk: while let Some(mut segment) = source.pop_front() {
            loop {
                while remaining < SHAPE_EPSILON {
                    zone += 1;
                    if zone >= count {
                        source.push_front(segment);
                        break 'walk;
                    }
                    zone_start = zone_end;
                    zone_end = proportions.segment_end_from_tail(zone);
                    r0 = r1;
                    r1 = proportions.segment_radius(zone);
                    remaining += zone_end - zone_start;
                }

                let span = zone_end - zone_start;
                let per_length = if span > 0.0 { (r1 - r0) / span } else { 0.0 };
                let offset = span - remaining;

                if segment.length - remaining < SHAPE_EPSILON {
                    segment.end_radius = r0 + (offset + segment.length) * per_length;
                    remaining -= segment.length;
                    chain.push_back(segment);
                    break;
                }

                let mut piece = segment;
                piece.length = remaining;
                piece.end_radius = r0 + span * per_length;
                segment.shorten(remaining)?;
                chain.push_back(piece);
                remaining = 0.0;
            }
        }

        if !source.is_empty() {
            debug!("Shape zones exhausted with {} segments left", source.len());
            chain.extend(source.into_iter().map(|mut s| {
                s.end_radius = r1;
                s
            }));
        }

        self.segments = chain;
        self.total_length = total;
        self.refresh_face();
        self.rebuild_sections();
        Ok(())
    }

    fn refresh_face(&mut self) {
        let Some(last) = self.segments.back() else {
            self.face = Face::default();
            return;
        };
        let (sin, cos) = last.alpha.sin_cos();
        let nose = last.end();
        let nose_radius = last.end_radius;
        let head_offset = self.head_shape.offset_ratio * nose_radius;
        self.face = Face {
            nose,
            nose_radius,
            alpha: last.alpha,
            cos,
            sin,
            head: nose + DVec2::new(cos, sin) * head_offset,
            head_offset,
            head_radius: self.head_shape.radius_ratio * nose_radius,
        };
    }

    fn rebuild_sections(&mut self) {
        self.sections.clear();
        if let Some(tail) = self.segments.front() {
            self.sections.push(DirectedSection::new(
                tail.start.extend(self.floor_z),
                0.0,
                0.0,
                tail.alpha,
            ));
        }
        let floor_z = self.floor_z;
        self.sections.extend(self.segments.iter().map(|s| {
            DirectedSection::new(
                s.end().extend(floor_z + s.end_radius),
                s.end_radius,
                s.length,
                s.alpha,
            )
        }));

        let face = &self.face;
        self.head_section = (face.head_offset > 0.0).then(|| {
            DirectedSection::new(
                face.head.extend(floor_z + face.head_radius),
                face.head_radius,
                face.head_offset,
                face.alpha,
            )
        });
    }

    /// Physical segments, tail first.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Segment> + Clone {
        self.segments.iter()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Zero-radius tail point followed by every segment end.
    pub fn body_sections(&self) -> &[DirectedSection] {
        &self.sections
    }

    /// Body sections plus the synthetic head section, if any.
    pub fn body_and_head_sections(&self) -> impl Iterator<Item = &DirectedSection> + Clone {
        self.sections.iter().chain(self.head_section.as_ref())
    }

    pub fn head_section(&self) -> Option<&DirectedSection> {
        self.head_section.as_ref()
    }

    pub fn face(&self) -> &Face {
        &self.face
    }

    pub fn proportions(&self) -> &dyn BodyProportions {
        self.proportions.as_ref()
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn food_run_length(&self) -> f64 {
        self.food_run_length
    }

    pub fn floor_z(&self) -> f64 {
        self.floor_z
    }

    pub fn head_x(&self) -> f64 {
        self.face.head.x
    }

    pub fn head_y(&self) -> f64 {
        self.face.head.y
    }

    /// Heading including any turn not yet applied to the chain.
    pub fn view_direction(&self) -> f64 {
        self.face.alpha + self.pending_turn
    }
}
