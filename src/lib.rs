//! # Gravitas
//!
//! A 2D rigid body physics engine with n-body gravity written in Rust.
//!
//! ## Features
//!
//! - **Gravitational Integration**: fixed-timestep RK4 over every body
//!   pair, with first-class forward and backward (rewind) stepping
//! - **Convex Decomposition**: ear clipping + Hertel-Mehlhorn merge,
//!   run once per polygon at construction
//! - **Collision Detection**: GJK narrow phase over convex components,
//!   EPA penetration and closest-distance queries
//! - **Collision Response**: restitution-blended impulses with friction
//!   and mass-weighted positional correction
//! - **Collision Shapes**: circles (closed-form fast path) and arbitrary
//!   simple polygons
//!
//! ## Quick Start
//!
//! ```rust
//! use gravitas::prelude::*;
//!
//! // Create a physics world
//! let mut world = World::new(WorldConfig {
//!     gravitational_constant: 10.0,
//!     ..WorldConfig::default()
//! });
//!
//! // A heavy circle and a light square orbiting it
//! let planet = world.spawn(
//!     BodyDesc::new().with_mass(100.0),
//!     Shape::circle(2.0),
//! );
//! let satellite = world.spawn(
//!     BodyDesc::new()
//!         .with_position(Vec2::new(10.0, 0.0))
//!         .with_velocity(Vec2::new(0.0, 10.0))
//!         .with_mass(1.0),
//!     Shape::polygon(vec![
//!         Vec2::new(0.0, 0.0),
//!         Vec2::new(0.0, 1.0),
//!         Vec2::new(1.0, 1.0),
//!         Vec2::new(1.0, 0.0),
//!     ]).unwrap(),
//! );
//!
//! // Simulation loop
//! for _ in 0..60 {
//!     world.advance(1.0 / 60.0);
//! }
//! for event in world.drain_events() {
//!     println!("{:?} hit {:?} at strength {}", event.body_a, event.body_b, event.impact);
//! }
//! let position = world.body(satellite).map(|b| b.position);
//! assert!(world.body(planet).is_some());
//! assert!(position.is_some());
//! ```

pub mod collision;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod solver;
mod world;

pub use world::{World, WorldConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::{BodyId, CollisionEvent, Contact};
    pub use crate::dynamics::{Body, BodyDesc, Direction};
    pub use crate::error::PhysicsError;
    pub use crate::geometry::{Circle, ConvexComponent, MassProperties, Polygon, Shape, ShapeType};
    pub use crate::math::{Transform, Vec2};
    pub use crate::world::{World, WorldConfig};
}
