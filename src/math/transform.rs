use super::vec2::Vec2;

/// A rigid body transformation mapping shape-local points into world space.
///
/// `position` is the world-space center of mass; `local_center` is where
/// that center sits in the shape's own coordinates (shapes are authored
/// with their sprite origin, not their center of mass, at the local
/// origin). A local point is rotated about the center of mass and then
/// translated:
///
/// `world = position + rotate(point - local_center, rotation)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position of the center of mass
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Center of mass in shape-local coordinates
    pub local_center: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform (no translation or rotation, centered at the origin)
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        local_center: Vec2::ZERO,
    };

    /// Creates a new transform
    #[inline]
    pub const fn new(position: Vec2, rotation: f32, local_center: Vec2) -> Self {
        Self {
            position,
            rotation,
            local_center,
        }
    }

    /// Creates a transform with only translation
    #[inline]
    pub const fn from_position(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            local_center: Vec2::ZERO,
        }
    }

    /// Transforms a point from shape-local space to world space
    #[inline]
    pub fn transform_point(self, point: Vec2) -> Vec2 {
        self.position + (point - self.local_center).rotate(self.rotation)
    }

    /// Transforms a vector (direction) from local space to world space
    /// Unlike points, vectors are not affected by translation
    #[inline]
    pub fn transform_vector(self, vector: Vec2) -> Vec2 {
        vector.rotate(self.rotation)
    }

    /// Inverse transforms a point from world space to shape-local space
    #[inline]
    pub fn inverse_transform_point(self, point: Vec2) -> Vec2 {
        (point - self.position).rotate(-self.rotation) + self.local_center
    }

    /// Inverse transforms a vector from world space to local space
    #[inline]
    pub fn inverse_transform_vector(self, vector: Vec2) -> Vec2 {
        vector.rotate(-self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn vec2_approx_eq(a: Vec2, b: Vec2) -> bool {
        a.distance_squared(b) < EPSILON * EPSILON
    }

    #[test]
    fn test_identity() {
        let t = Transform::IDENTITY;
        let p = Vec2::new(1.0, 2.0);

        assert!(vec2_approx_eq(t.transform_point(p), p));
        assert!(vec2_approx_eq(t.transform_vector(p), p));
    }

    #[test]
    fn test_translation_only() {
        let t = Transform::from_position(Vec2::new(1.0, 2.0));
        let p = Vec2::new(1.0, 1.0);

        // Points are affected by translation
        assert!(vec2_approx_eq(t.transform_point(p), Vec2::new(2.0, 3.0)));

        // Vectors are not affected by translation
        assert!(vec2_approx_eq(t.transform_vector(p), p));
    }

    #[test]
    fn test_rotation_about_center() {
        // A shape whose center of mass sits at (1, 1) in local space,
        // rotated 90 degrees and placed at the origin.
        let t = Transform::new(Vec2::ZERO, FRAC_PI_2, Vec2::new(1.0, 1.0));

        // The local center maps onto the body position
        assert!(vec2_approx_eq(
            t.transform_point(Vec2::new(1.0, 1.0)),
            Vec2::ZERO
        ));

        // A point one unit right of the center ends up one unit above it
        let p = t.transform_point(Vec2::new(2.0, 1.0));
        assert!(vec2_approx_eq(p, Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Transform::new(Vec2::new(3.0, -2.0), 0.7, Vec2::new(0.5, 0.5));

        let p = Vec2::new(4.0, 5.0);
        let there = t.transform_point(p);
        let back = t.inverse_transform_point(there);
        assert!(vec2_approx_eq(back, p));

        let v = Vec2::new(-1.0, 2.0);
        let rotated = t.transform_vector(v);
        assert!(vec2_approx_eq(t.inverse_transform_vector(rotated), v));
    }
}
