pub mod contact;
pub mod narrow_phase;

pub use contact::{BodyId, CollisionEvent, Contact, COLLISION_EPSILON};
pub use narrow_phase::{
    closest_distance, epa, gjk, intersects, GjkResult, PointSupport, Simplex, Support,
    SupportPoint, WorldComponent,
};
