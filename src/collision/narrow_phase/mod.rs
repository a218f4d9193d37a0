pub mod epa;
pub mod gjk;

pub use epa::{closest_distance, epa};
pub use gjk::{gjk, intersects, GjkResult, PointSupport, Simplex, Support, SupportPoint, WorldComponent};
