//! Play field: world bounds plus obstacle and pickable objects.

use glam::DVec2;
use rand::Rng;
use tracing::warn;

use crate::config::FieldConfig;

const SPAWN_ATTEMPTS: usize = 64;

/// Field object kind. The collision detector ignores it; callers use it to
/// decide what a hit means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldObjectType {
    Obstacle,
    Pickable,
}

/// A round object lying on the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldObject {
    pub center: DVec2,
    pub radius: f64,
    pub kind: FieldObjectType,
}

impl FieldObject {
    pub const fn new(center: DVec2, radius: f64, kind: FieldObjectType) -> Self {
        Self {
            center,
            radius,
            kind,
        }
    }
}

/// Read-only scene view consumed by the collision detector.
pub trait Scene {
    fn field_width(&self) -> f64;
    fn field_height(&self) -> f64;
    fn field_objects(&self) -> &[FieldObject];
}

/// Rectangular field spanning `[0, width] x [0, height]`.
#[derive(Debug, Clone)]
pub struct Field {
    width: f64,
    height: f64,
    objects: Vec<FieldObject>,
}

impl Field {
    pub fn new(width: f64, height: f64, objects: Vec<FieldObject>) -> Self {
        Self {
            width,
            height,
            objects,
        }
    }

    /// Scatter the configured objects at random, keeping `keep_clear` free.
    pub fn populate<R: Rng>(config: &FieldConfig, keep_clear: DVec2, rng: &mut R) -> Self {
        let mut field = Self::new(
            config.width,
            config.height,
            Vec::with_capacity(config.obstacles + config.pickables),
        );
        let kinds = std::iter::repeat_n(FieldObjectType::Obstacle, config.obstacles)
            .chain(std::iter::repeat_n(FieldObjectType::Pickable, config.pickables));
        for kind in kinds {
            let radius = if config.object_max_radius > config.object_min_radius {
                rng.random_range(config.object_min_radius..config.object_max_radius)
            } else {
                config.object_min_radius
            };
            let spot = field.free_position(radius, config.spawn_margin, keep_clear, rng);
            if let Some(center) = spot {
                field.objects.push(FieldObject::new(center, radius, kind));
            } else {
                warn!("No room left for {:?} of radius {:.2}", kind, radius);
            }
        }
        field
    }

    /// Move a consumed object to a new random free position.
    ///
    /// Returns false if no free position was found; the object stays put.
    pub fn relocate<R: Rng>(
        &mut self,
        index: usize,
        margin: f64,
        keep_clear: DVec2,
        rng: &mut R,
    ) -> bool {
        let Some(object) = self.objects.get(index).copied() else {
            return false;
        };
        match self.free_position(object.radius, margin, keep_clear, rng) {
            Some(center) => {
                self.objects[index].center = center;
                true
            }
            None => false,
        }
    }

    pub fn objects(&self) -> &[FieldObject] {
        &self.objects
    }

    fn free_position<R: Rng>(
        &self,
        radius: f64,
        margin: f64,
        keep_clear: DVec2,
        rng: &mut R,
    ) -> Option<DVec2> {
        let pad = radius + margin;
        if 2.0 * pad >= self.width || 2.0 * pad >= self.height {
            return None;
        }
        (0..SPAWN_ATTEMPTS)
            .map(|_| {
                DVec2::new(
                    rng.random_range(pad..self.width - pad),
                    rng.random_range(pad..self.height - pad),
                )
            })
            .find(|&center| {
                center.distance(keep_clear) >= pad
                    && self
                        .objects
                        .iter()
                        .all(|o| o.center.distance(center) >= o.radius + pad)
            })
    }
}

impl Scene for Field {
    fn field_width(&self) -> f64 {
        self.width
    }

    fn field_height(&self) -> f64 {
        self.height
    }

    fn field_objects(&self) -> &[FieldObject] {
        &self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_populate_respects_bounds_and_spacing() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let keep_clear = DVec2::new(5.0, 20.0);
        let field = Field::populate(&config, keep_clear, &mut rng);

        assert!(!field.objects().is_empty());
        for (i, a) in field.objects().iter().enumerate() {
            assert!(a.center.x - a.radius >= 0.0 && a.center.x + a.radius <= config.width);
            assert!(a.center.y - a.radius >= 0.0 && a.center.y + a.radius <= config.height);
            assert!(a.center.distance(keep_clear) >= a.radius + config.spawn_margin);
            for b in &field.objects()[i + 1..] {
                assert!(a.center.distance(b.center) >= a.radius + b.radius);
            }
        }
    }

    #[test]
    fn test_relocate_moves_object() {
        let pickable = FieldObject::new(DVec2::new(5.0, 5.0), 0.5, FieldObjectType::Pickable);
        let mut field = Field::new(20.0, 20.0, vec![pickable]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(field.relocate(0, 1.0, DVec2::new(5.0, 5.0), &mut rng));
        assert!(field.objects()[0].center.distance(DVec2::new(5.0, 5.0)) >= 1.5);
        assert!(!field.relocate(3, 1.0, DVec2::ZERO, &mut rng));
    }

    #[test]
    fn test_tiny_field_has_no_room() {
        let config = FieldConfig {
            width: 2.0,
            height: 2.0,
            ..FieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let field = Field::populate(&config, DVec2::ONE, &mut rng);
        assert!(field.objects().is_empty());
    }
}
