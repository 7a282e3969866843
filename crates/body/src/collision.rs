//! Collision detection for the snake head.
//!
//! The head is modelled as a tapered neck cone running from the nose ring to
//! the head point, capped by the head sphere. Checks run in priority order:
//! - Wall: the head sphere's bounding square leaves the field
//! - Game object: a field object touches the neck or the head sphere
//! - Self: a body section, or the run between two sections, reaches the head

use glam::DVec2;
use sections::DirectedSection;

use crate::field::{FieldObject, Scene};
use crate::model::{BodyModel, Face};

/// Sections within this tolerance of the heading axis count as on it.
pub const AXIS_EPSILON: f64 = 1e-4;

/// Body sections closer to the face than this many nose radii are never
/// tested against the head.
pub const SELF_EXEMPT_NOSE_RADII: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    None,
    SelfBody,
    Wall,
    GameObject,
}

/// Result of a collision query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    None,
    SelfBody,
    Wall,
    /// First field object hit, with its index in the scene.
    GameObject { index: usize, object: FieldObject },
}

impl Collision {
    pub fn kind(&self) -> CollisionType {
        match self {
            Collision::None => CollisionType::None,
            Collision::SelfBody => CollisionType::SelfBody,
            Collision::Wall => CollisionType::Wall,
            Collision::GameObject { .. } => CollisionType::GameObject,
        }
    }

    pub fn field_object(&self) -> Option<&FieldObject> {
        match self {
            Collision::GameObject { object, .. } => Some(object),
            _ => None,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Collision::None)
    }
}

/// Head geometry projected into the nose-local frame.
///
/// Local x runs from the nose (0) along the heading to the head point
/// (`head_offset`); local y is the signed distance from the heading axis.
#[derive(Debug, Clone, Copy)]
struct HeadFrame {
    nose: DVec2,
    cos: f64,
    sin: f64,
    nose_radius: f64,
    head: DVec2,
    head_offset: f64,
    head_radius: f64,
}

impl HeadFrame {
    fn new(face: &Face) -> Self {
        Self {
            nose: face.nose,
            cos: face.cos,
            sin: face.sin,
            nose_radius: face.nose_radius,
            head: face.head,
            head_offset: face.head_offset,
            head_radius: face.head_radius,
        }
    }

    /// Rotate `point` by minus the face angle around the nose.
    #[inline]
    fn to_local(&self, point: DVec2) -> DVec2 {
        let d = point - self.nose;
        DVec2::new(d.x * self.cos + d.y * self.sin, d.y * self.cos - d.x * self.sin)
    }

    /// Local x of the far side of the head sphere.
    #[inline]
    fn reach(&self) -> f64 {
        self.head_offset + self.head_radius
    }

    #[inline]
    fn neck_radius(&self, rot_x: f64) -> f64 {
        if self.head_offset > 0.0 {
            self.nose_radius + (self.head_radius - self.nose_radius) * rot_x / self.head_offset
        } else {
            self.nose_radius
        }
    }

    /// Whether a disc at `center` with `radius` touches the neck or head sphere.
    fn touches(&self, center: DVec2, radius: f64) -> bool {
        let local = self.to_local(center);
        if local.x < -radius || local.x > self.reach() + radius {
            return false;
        }
        let in_neck = local.x >= 0.0
            && local.x < self.head_offset
            && local.y.abs() - radius < self.neck_radius(local.x);
        let reach = radius + self.head_radius;
        in_neck || center.distance_squared(self.head) < reach * reach
    }

    /// Whether the run from `a` to `b` passes through the head zone.
    fn crosses(&self, a: &DirectedSection, b: &DirectedSection) -> bool {
        let la = self.to_local(a.center_xy());
        let lb = self.to_local(b.center_xy());
        let on_axis_a = la.y.abs() < AXIS_EPSILON;
        let on_axis_b = lb.y.abs() < AXIS_EPSILON;

        if on_axis_a && on_axis_b {
            let reach = self.reach();
            return la.x >= 0.0 && lb.x >= 0.0 && la.x <= reach && lb.x <= reach;
        }
        if !on_axis_a && !on_axis_b && la.y.signum() == lb.y.signum() {
            return false;
        }

        let t = la.y / (la.y - lb.y);
        let cross_x = la.x + (lb.x - la.x) * t;
        let cross_r = a.radius + (b.radius - a.radius) * t;
        cross_x >= 0.0 && cross_x - cross_r < self.reach()
    }

    fn hits_wall<S: Scene + ?Sized>(&self, scene: &S) -> bool {
        let r = self.head_radius;
        self.head.x - r < 0.0
            || self.head.y - r < 0.0
            || self.head.x + r > scene.field_width()
            || self.head.y + r > scene.field_height()
    }
}

/// Classify the collision at the current head position.
///
/// The body must be initialized.
pub fn check_collisions<S: Scene + ?Sized>(body: &BodyModel, scene: &S) -> Collision {
    let frame = HeadFrame::new(body.face());

    if frame.hits_wall(scene) {
        return Collision::Wall;
    }

    if let Some((index, object)) = scene
        .field_objects()
        .iter()
        .enumerate()
        .find(|(_, o)| frame.touches(o.center, o.radius))
    {
        return Collision::GameObject {
            index,
            object: *object,
        };
    }

    if hits_self(&frame, body) {
        return Collision::SelfBody;
    }

    Collision::None
}

fn hits_self(frame: &HeadFrame, body: &BodyModel) -> bool {
    let exempt = SELF_EXEMPT_NOSE_RADII * frame.nose_radius;
    let mut remaining = body.total_length();
    let mut prev: Option<&DirectedSection> = None;

    for section in body.body_sections() {
        remaining -= section.prev_length;
        if remaining < exempt {
            break;
        }
        if frame.touches(section.center_xy(), section.radius) {
            return true;
        }
        if let Some(prev) = prev {
            if frame.crosses(prev, section) {
                return true;
            }
        }
        prev = Some(section);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldObjectType};
    use crate::model::HeadShape;
    use crate::proportions::ArrayProportions;
    use glam::DVec3;
    use std::f64::consts::{FRAC_PI_2, PI};

    /// Straight body along +x with nose radius 0.5, head offset 1 and head radius 0.5.
    fn body_at(start: DVec2, length: f64) -> BodyModel {
        let proportions = ArrayProportions::new(&[(0.1, 0.5), (1.0, 0.5)]).unwrap();
        let head = HeadShape {
            offset_ratio: 2.0,
            radius_ratio: 1.0,
        };
        let mut body = BodyModel::new(Box::new(proportions), head);
        body.init(start.x, start.y, 0.0, 0.0, length).unwrap();
        body
    }

    fn obstacle(x: f64, y: f64, radius: f64) -> FieldObject {
        FieldObject::new(DVec2::new(x, y), radius, FieldObjectType::Obstacle)
    }

    #[test]
    fn test_straight_body_collides_with_nothing() {
        let body = body_at(DVec2::new(2.0, 5.0), 10.0);
        let field = Field::new(20.0, 10.0, vec![obstacle(3.0, 8.0, 0.5)]);
        assert_eq!(body.check_collisions(&field), Collision::None);
    }

    /// Nose radius 1, head sphere of radius 2 one unit ahead of the nose.
    fn wide_head_body(x: f64, y: f64, angle: f64) -> BodyModel {
        let proportions = ArrayProportions::new(&[(0.1, 1.0), (1.0, 1.0)]).unwrap();
        let head = HeadShape {
            offset_ratio: 1.0,
            radius_ratio: 2.0,
        };
        let mut body = BodyModel::new(Box::new(proportions), head);
        body.init(x, y, 0.0, angle, 7.0).unwrap();
        body
    }

    #[test]
    fn test_wall() {
        // head at (9, 5)
        let body = wide_head_body(1.0, 5.0, 0.0);
        assert!((body.head_x() - 9.0).abs() < 1e-9);

        let field = Field::new(10.0, 10.0, Vec::new());
        assert_eq!(check_collisions(&body, &field), Collision::Wall);
        let roomy = Field::new(12.0, 10.0, Vec::new());
        assert_eq!(check_collisions(&body, &roomy), Collision::None);

        let scene: &dyn Scene = &field;
        assert_eq!(body.check_collisions(scene), Collision::Wall);
    }

    #[test]
    fn test_wall_left() {
        // head at (1, 5)
        let body = wide_head_body(9.0, 5.0, PI);
        assert!((body.head_x() - 1.0).abs() < 1e-9);
        let field = Field::new(12.0, 10.0, Vec::new());
        assert_eq!(check_collisions(&body, &field), Collision::Wall);

        // head at (3, 5)
        let body = wide_head_body(11.0, 5.0, PI);
        assert_eq!(check_collisions(&body, &field), Collision::None);
    }

    #[test]
    fn test_wall_bottom() {
        // head at (5, 1)
        let body = wide_head_body(5.0, 9.0, -FRAC_PI_2);
        assert!((body.head_y() - 1.0).abs() < 1e-9);
        let field = Field::new(10.0, 12.0, Vec::new());
        assert_eq!(check_collisions(&body, &field), Collision::Wall);

        // head at (5, 3)
        let body = wide_head_body(5.0, 11.0, -FRAC_PI_2);
        assert_eq!(check_collisions(&body, &field), Collision::None);
    }

    #[test]
    fn test_wall_top() {
        // head at (5, 9)
        let body = wide_head_body(5.0, 1.0, FRAC_PI_2);
        assert!((body.head_y() - 9.0).abs() < 1e-9);
        let field = Field::new(10.0, 10.0, Vec::new());
        assert_eq!(check_collisions(&body, &field), Collision::Wall);
        let roomy = Field::new(10.0, 12.0, Vec::new());
        assert_eq!(check_collisions(&body, &roomy), Collision::None);
    }

    #[test]
    fn test_wall_beats_object() {
        let body = body_at(DVec2::new(2.0, 5.0), 10.0);
        let field = Field::new(13.2, 10.0, vec![obstacle(12.0, 5.0, 0.2)]);
        assert_eq!(check_collisions(&body, &field).kind(), CollisionType::Wall);
    }

    #[test]
    fn test_object_at_nose_center() {
        let body = body_at(DVec2::new(2.0, 5.0), 10.0);
        let object = obstacle(12.0, 5.0, 0.2);
        let field = Field::new(20.0, 10.0, vec![obstacle(3.0, 8.0, 0.5), object]);
        let collision = check_collisions(&body, &field);
        assert_eq!(collision, Collision::GameObject { index: 1, object });
        assert_eq!(collision.field_object(), Some(&object));
    }

    #[test]
    fn test_object_just_outside_neck() {
        let body = body_at(DVec2::new(2.0, 5.0), 10.0);
        // nose radius 0.5 plus object radius 0.2
        let field = Field::new(20.0, 10.0, vec![obstacle(12.0, 5.71, 0.2)]);
        assert!(check_collisions(&body, &field).is_none());
        let field = Field::new(20.0, 10.0, vec![obstacle(12.0, 5.69, 0.2)]);
        assert_eq!(check_collisions(&body, &field).kind(), CollisionType::GameObject);
    }

    #[test]
    fn test_object_touching_head_sphere() {
        let body = body_at(DVec2::new(2.0, 5.0), 10.0);
        // head at (13, 5) radius 0.5
        let field = Field::new(20.0, 10.0, vec![obstacle(13.6, 5.0, 0.2)]);
        assert_eq!(check_collisions(&body, &field).kind(), CollisionType::GameObject);
        let field = Field::new(20.0, 10.0, vec![obstacle(13.8, 5.0, 0.2)]);
        assert!(check_collisions(&body, &field).is_none());
    }

    #[test]
    fn test_object_behind_nose() {
        let body = body_at(DVec2::new(2.0, 5.0), 10.0);
        let field = Field::new(20.0, 10.0, vec![obstacle(11.5, 5.9, 0.2)]);
        assert!(check_collisions(&body, &field).is_none());
    }

    #[test]
    fn test_neck_tapers_between_nose_and_head() {
        let body = body_at(DVec2::new(2.0, 5.0), 10.0);
        let frame = HeadFrame::new(body.face());
        assert!((frame.neck_radius(0.0) - 0.5).abs() < 1e-12);
        assert!((frame.neck_radius(1.0) - 0.5).abs() < 1e-12);

        let face = Face {
            nose_radius: 0.5,
            head_offset: 1.0,
            head_radius: 1.5,
            ..*body.face()
        };
        let frame = HeadFrame::new(&face);
        assert!((frame.neck_radius(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_body_loop_hits_self() {
        let proportions = ArrayProportions::new(&[(0.05, 0.3), (1.0, 0.3)]).unwrap();
        let head = HeadShape {
            offset_ratio: 1.0,
            radius_ratio: 1.2,
        };
        let mut body = BodyModel::new(Box::new(proportions), head);
        body.init(5.0, 10.0, 0.0, 0.0, 20.0).unwrap();
        let field = Field::new(40.0, 40.0, Vec::new());

        body.advance(1.0, FRAC_PI_2).unwrap();
        body.advance(1.0, FRAC_PI_2).unwrap();
        assert!(check_collisions(&body, &field).is_none());

        // heading down, straight back through the body run at y = 10
        body.advance(0.5, FRAC_PI_2).unwrap();
        assert_eq!(check_collisions(&body, &field), Collision::SelfBody);
    }

    #[test]
    fn test_run_crossing_between_sections() {
        let body = body_at(DVec2::new(2.0, 5.0), 10.0);
        let frame = HeadFrame::new(body.face());
        let section = |x: f64, y: f64| DirectedSection::new(DVec3::new(x, y, 0.3), 0.3, 1.0, 0.0);

        // crosses the neck axis just ahead of the nose
        assert!(frame.crosses(&section(12.5, 2.0), &section(12.5, 8.0)));
        // same side of the axis
        assert!(!frame.crosses(&section(12.5, 6.0), &section(13.0, 8.0)));
        // crosses behind the nose
        assert!(!frame.crosses(&section(11.0, 2.0), &section(11.0, 8.0)));
        // crosses beyond the head sphere
        assert!(!frame.crosses(&section(14.0, 2.0), &section(14.0, 8.0)));
        // both on the axis inside the head zone
        assert!(frame.crosses(&section(12.2, 5.0), &section(13.0, 5.0)));
        // on the axis but one end past the head sphere
        assert!(!frame.crosses(&section(12.2, 5.0), &section(16.0, 5.0)));
        assert!(!frame.crosses(&section(5.0, 5.0), &section(11.0, 5.0)));
    }
}
