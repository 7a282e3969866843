//! Procedural snake body core.
//!
//! Owns the segment chain behind the snake's centerline, reshapes it against
//! a proportions policy after every move, and answers head collision queries
//! against a field.

pub mod collision;
pub mod config;
pub mod error;
pub mod field;
pub mod model;
pub mod proportions;

// Re-export commonly used types
pub use collision::{check_collisions, Collision, CollisionType};
pub use config::Config;
pub use error::BodyError;
pub use field::{Field, FieldObject, FieldObjectType, Scene};
pub use model::{BodyModel, Face, HeadShape, Segment};
pub use proportions::{ArrayProportions, BodyProportions, FeedableProportions, FixedProportions};
pub use sections::DirectedSection;
