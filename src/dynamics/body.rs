use crate::collision::BodyId;
use crate::geometry::Shape;
use crate::math::{Transform, Vec2};

/// A rigid body in the physics simulation.
///
/// Invariants: `mass > 0`, and `inertia > 0` for any shape with nonzero
/// area. Zero-area shapes are a caller precondition, not a runtime check.
#[derive(Debug, Clone)]
pub struct Body {
    /// Body id for identification
    pub id: BodyId,

    // Transform
    /// World-space position of the center of mass
    pub position: Vec2,
    /// Rotation in radians, kept within (-PI, PI] by the integrator
    pub rotation: f32,

    // Velocities
    /// Linear velocity
    pub velocity: Vec2,
    /// Angular velocity (in radians per second)
    pub angular_velocity: f32,

    // Mass properties
    /// Mass
    pub mass: f32,
    /// Moment of inertia about the center of mass
    pub inertia: f32,
    /// Center of mass in shape-local coordinates
    pub local_center: Vec2,

    // Material properties
    /// Restitution (bounciness), in [0, 1]
    pub restitution: f32,
    /// Friction coefficient, in [0, 1]
    pub friction: f32,

    /// The collision shape
    pub shape: Shape,
}

impl Body {
    /// Creates a body from a description and its shape.
    ///
    /// Mass properties derive from the shape and the description's
    /// density; an explicit mass overrides the density-derived mass and
    /// rescales the moment of inertia proportionally.
    pub fn new(desc: &BodyDesc, shape: Shape) -> Self {
        let props = shape.mass_properties(desc.density);
        let mass = desc.mass.unwrap_or(props.mass);
        let inertia = if props.mass > 0.0 {
            props.inertia * (mass / props.mass)
        } else {
            props.inertia
        };

        Self {
            id: BodyId::INVALID,
            position: desc.position,
            rotation: desc.rotation,
            velocity: desc.velocity,
            angular_velocity: desc.angular_velocity,
            mass,
            inertia,
            local_center: props.center_of_mass,
            restitution: desc.restitution,
            friction: desc.friction,
            shape,
        }
    }

    /// Returns the transform of this body
    #[inline]
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation, self.local_center)
    }

    /// Gets the velocity of the body's material at a world point
    #[inline]
    pub fn velocity_at_point(&self, point: Vec2) -> Vec2 {
        self.velocity + (point - self.position).perp() * self.angular_velocity
    }
}

/// Description for creating a body
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyDesc {
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    /// Uniform density used to derive mass from the shape
    pub density: f32,
    /// Explicit mass; overrides the density-derived mass when set
    pub mass: Option<f32>,
    pub restitution: f32,
    pub friction: f32,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            density: 1.0,
            mass: None,
            friction: 0.6,
            restitution: 0.3,
        }
    }
}

impl BodyDesc {
    /// Creates a new body description with default material properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the position of the center of mass
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation in radians
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the linear velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the angular velocity
    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Sets the density used to derive mass from the shape
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Sets an explicit mass, overriding the density-derived mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Sets friction, clamped to [0, 1]
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.clamp(0.0, 1.0);
        self
    }

    /// Sets restitution, clamped to [0, 1]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_body_from_density() {
        let body = Body::new(&BodyDesc::new(), Shape::circle(1.0));

        assert!((body.mass - PI).abs() < EPSILON);
        assert!((body.inertia - 0.5 * PI).abs() < EPSILON);
        assert_eq!(body.local_center, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_explicit_mass_rescales_inertia() {
        let body = Body::new(&BodyDesc::new().with_mass(2.0), Shape::circle(1.0));

        assert!((body.mass - 2.0).abs() < EPSILON);
        // Circle inertia is m r^2 / 2 regardless of how mass was set
        assert!((body.inertia - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_builder() {
        let desc = BodyDesc::new()
            .with_position(Vec2::new(1.0, 2.0))
            .with_velocity(Vec2::new(-1.0, 0.0))
            .with_restitution(2.0)
            .with_friction(-1.0);

        assert_eq!(desc.position, Vec2::new(1.0, 2.0));
        assert_eq!(desc.velocity, Vec2::new(-1.0, 0.0));
        // Material coefficients are clamped to [0, 1]
        assert_eq!(desc.restitution, 1.0);
        assert_eq!(desc.friction, 0.0);
    }

    #[test]
    fn test_transform_maps_local_center_to_position() {
        let body = Body::new(
            &BodyDesc::new().with_position(Vec2::new(5.0, -3.0)),
            Shape::circle(2.0),
        );

        let world = body.transform().transform_point(Vec2::new(2.0, 2.0));
        assert!(world.distance(Vec2::new(5.0, -3.0)) < EPSILON);
    }

    #[test]
    fn test_velocity_at_point() {
        let mut body = Body::new(&BodyDesc::new(), Shape::circle(1.0));
        body.velocity = Vec2::new(1.0, 0.0);
        body.angular_velocity = 1.0;

        // One unit above the center, spin adds (-1, 0)
        let v = body.velocity_at_point(body.position + Vec2::Y);
        assert!(v.distance(Vec2::ZERO) < EPSILON);
    }
}
