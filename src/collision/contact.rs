use crate::math::Vec2;

/// Fixed epsilon shared by collision and convergence tests.
pub const COLLISION_EPSILON: f32 = 0.001;

/// An id referring to a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyId(pub u32);

impl BodyId {
    /// Invalid/null body id
    pub const INVALID: Self = Self(u32::MAX);

    /// Creates a new body id
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the index of this id
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this id is valid
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for BodyId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A fully reconstructed contact between two bodies.
///
/// `distance` is signed: negative while the shapes overlap, positive when
/// they are separated, zero at exact touch. The normal is unit length and
/// points from body A towards body B.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Contact point on body A in world space
    pub point_a: Vec2,
    /// Contact point on body B in world space
    pub point_b: Vec2,
    /// Unit contact normal, pointing from A to B
    pub normal: Vec2,
    /// Signed separation distance
    pub distance: f32,
}

impl Contact {
    /// Returns the midpoint of the contact
    pub fn midpoint(&self) -> Vec2 {
        (self.point_a + self.point_b) * 0.5
    }
}

/// Notification emitted for every resolved collision.
///
/// Intended for audio/gameplay consumers; `impact` is the magnitude of
/// the normal impulse that was applied.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionEvent {
    /// First body of the resolved pair
    pub body_a: BodyId,
    /// Second body of the resolved pair
    pub body_b: BodyId,
    /// Relative normal-impulse magnitude
    pub impact: f32,
}
