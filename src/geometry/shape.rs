use crate::error::PhysicsError;
use crate::math::{Transform, Vec2};

use super::decompose::{decompose, signed_area};

/// The type of collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Circle,
    Polygon,
}

/// A collision shape that can be attached to bodies.
///
/// Shapes are authored in sprite-local coordinates: a circle of radius `r`
/// occupies `(0, 0)..(2r, 2r)` with its center of mass at `(r, r)`, and a
/// polygon's vertices are given relative to the same origin. The body
/// transform maps the local center of mass onto the body position.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A circle defined by its radius
    Circle(Circle),
    /// A simple polygon, decomposed into convex components at construction
    Polygon(Polygon),
}

impl Shape {
    /// Creates a circle shape
    #[inline]
    pub fn circle(radius: f32) -> Self {
        Self::Circle(Circle::new(radius))
    }

    /// Creates a polygon shape from an ordered vertex loop
    ///
    /// Fails when fewer than 3 vertices are given.
    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self, PhysicsError> {
        Ok(Self::Polygon(Polygon::new(vertices)?))
    }

    /// Returns the shape type
    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Polygon(_) => ShapeType::Polygon,
        }
    }

    /// Returns the center of mass in shape-local coordinates
    #[inline]
    pub fn center_of_mass(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.center_of_mass(),
            Shape::Polygon(p) => p.centroid(),
        }
    }

    /// Computes mass properties (mass, center of mass, moment of inertia)
    /// given a uniform density
    #[inline]
    pub fn mass_properties(&self, density: f32) -> MassProperties {
        match self {
            Shape::Circle(c) => c.mass_properties(density),
            Shape::Polygon(p) => p.mass_properties(density),
        }
    }
}

/// Mass properties of a shape
#[derive(Debug, Clone, Copy)]
pub struct MassProperties {
    /// Total mass
    pub mass: f32,
    /// Center of mass in shape-local coordinates
    pub center_of_mass: Vec2,
    /// Moment of inertia about the center of mass
    pub inertia: f32,
}

impl MassProperties {
    /// Creates mass properties from explicit values
    #[inline]
    pub const fn new(mass: f32, center_of_mass: Vec2, inertia: f32) -> Self {
        Self {
            mass,
            center_of_mass,
            inertia,
        }
    }
}

/// A circle collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle with the given radius
    #[inline]
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Center of mass in local coordinates: `(radius, radius)`
    #[inline]
    pub fn center_of_mass(&self) -> Vec2 {
        Vec2::splat(self.radius)
    }

    /// Returns the area of the circle
    #[inline]
    pub fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius * self.radius
    }

    /// Returns the support point in the given direction (local space)
    #[inline]
    pub fn support(&self, direction: Vec2) -> Vec2 {
        self.center_of_mass() + direction.normalize() * self.radius
    }

    /// Returns the support point in world space given a transform
    #[inline]
    pub fn support_world(&self, transform: Transform, direction: Vec2) -> Vec2 {
        let local_dir = transform.inverse_transform_vector(direction);
        transform.transform_point(self.support(local_dir))
    }

    /// Computes mass properties given density
    #[inline]
    pub fn mass_properties(&self, density: f32) -> MassProperties {
        let mass = self.area() * density;
        let inertia = 0.5 * mass * self.radius * self.radius;
        MassProperties::new(mass, self.center_of_mass(), inertia)
    }
}

/// A simple polygon collision shape.
///
/// The vertex loop is normalized to clockwise order and decomposed into
/// convex components exactly once, at construction; the component list is
/// immutable afterwards. Narrow-phase queries run against the components,
/// never against the raw loop.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    components: Vec<ConvexComponent>,
    area: f32,
    centroid: Vec2,
}

impl Polygon {
    /// Creates a polygon from an ordered vertex loop and decomposes it.
    ///
    /// Fails when fewer than 3 vertices are given. Either winding is
    /// accepted; counter-clockwise loops are reversed.
    pub fn new(mut vertices: Vec<Vec2>) -> Result<Self, PhysicsError> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InvalidShape {
                vertices: vertices.len(),
            });
        }

        if signed_area(&vertices) > 0.0 {
            vertices.reverse();
        }

        let components = decompose(&vertices)?;
        let area = signed_area(&vertices).abs();
        let centroid = ring_centroid(&vertices);

        Ok(Self {
            vertices,
            components,
            area,
            centroid,
        })
    }

    /// The polygon's vertex loop (clockwise, shape-local)
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// The convex components computed at construction
    #[inline]
    pub fn components(&self) -> &[ConvexComponent] {
        &self.components
    }

    /// Returns the polygon area
    #[inline]
    pub fn area(&self) -> f32 {
        self.area
    }

    /// Center of mass in local coordinates
    #[inline]
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Computes mass properties given density.
    ///
    /// The moment of inertia is accumulated per convex component with
    /// vertices taken relative to the polygon centroid.
    pub fn mass_properties(&self, density: f32) -> MassProperties {
        let mass = self.area * density;

        let mut edge_sum = 0.0;
        for component in &self.components {
            let verts = component.vertices();
            for i in 0..verts.len() {
                let a = verts[i] - self.centroid;
                let b = verts[(i + 1) % verts.len()] - self.centroid;
                edge_sum += a.cross(b) * (a.dot(a) + a.dot(b) + b.dot(b));
            }
        }
        let inertia = (density / 6.0 * edge_sum).abs();

        MassProperties::new(mass, self.centroid, inertia)
    }
}

/// A convex sub-polygon of a decomposed [`Polygon`].
///
/// Stores a clockwise vertex loop in shape-local coordinates and exposes
/// the support function used uniformly by the narrow phase.
#[derive(Debug, Clone)]
pub struct ConvexComponent {
    vertices: Vec<Vec2>,
}

impl ConvexComponent {
    pub(crate) fn new(vertices: Vec<Vec2>) -> Self {
        debug_assert!(vertices.len() >= 3);
        Self { vertices }
    }

    /// The component's vertex loop (clockwise, shape-local)
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Returns the vertex furthest along the given direction (local space)
    pub fn support(&self, direction: Vec2) -> Vec2 {
        let mut best = self.vertices[0];
        let mut best_dot = best.dot(direction);
        for &v in &self.vertices[1..] {
            let d = v.dot(direction);
            if d > best_dot {
                best = v;
                best_dot = d;
            }
        }
        best
    }

    /// Returns the support point in world space given a transform
    #[inline]
    pub fn support_world(&self, transform: Transform, direction: Vec2) -> Vec2 {
        let local_dir = transform.inverse_transform_vector(direction);
        transform.transform_point(self.support(local_dir))
    }

    /// Returns the component area
    #[inline]
    pub fn area(&self) -> f32 {
        signed_area(&self.vertices).abs()
    }

    /// Returns the component centroid (shape-local)
    #[inline]
    pub fn centroid(&self) -> Vec2 {
        ring_centroid(&self.vertices)
    }

    /// Cross-product sign test over every vertex triple.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        (0..n).all(|i| {
            let prev = self.vertices[(i + n - 1) % n];
            let cur = self.vertices[i];
            let next = self.vertices[(i + 1) % n];
            (cur - prev).cross(next - cur) <= 1e-6
        })
    }
}

/// Shoelace centroid of a vertex ring.
fn ring_centroid(vertices: &[Vec2]) -> Vec2 {
    let area = signed_area(vertices);
    if area.abs() < 1e-9 {
        let sum = vertices.iter().fold(Vec2::ZERO, |acc, &v| acc + v);
        return sum / vertices.len() as f32;
    }

    let mut sum = Vec2::ZERO;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        sum += (a + b) * a.cross(b);
    }
    sum / (6.0 * area)
}
