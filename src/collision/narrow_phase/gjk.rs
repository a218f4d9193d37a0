use log::debug;

use crate::geometry::ConvexComponent;
use crate::math::{Transform, Vec2};

/// Maximum iterations for the GJK algorithm
const GJK_MAX_ITERATIONS: usize = 50;

/// A convex shape queried through its furthest point along a direction.
///
/// Implementors return world-space points; the body transform is applied
/// by the implementor, not captured by the caller.
pub trait Support {
    /// Returns the point of the shape furthest along `direction`
    fn support_point(&self, direction: Vec2) -> Vec2;
}

/// A convex component paired with its body transform.
#[derive(Debug, Clone, Copy)]
pub struct WorldComponent<'a> {
    pub component: &'a ConvexComponent,
    pub transform: Transform,
}

impl Support for WorldComponent<'_> {
    #[inline]
    fn support_point(&self, direction: Vec2) -> Vec2 {
        self.component.support_world(self.transform, direction)
    }
}

/// A degenerate point shape, e.g. a circle center tested against a
/// polygon component before inflating by the radius.
#[derive(Debug, Clone, Copy)]
pub struct PointSupport(pub Vec2);

impl Support for PointSupport {
    #[inline]
    fn support_point(&self, _direction: Vec2) -> Vec2 {
        self.0
    }
}

/// One entry of the simplex: the pair of original support points and
/// their Minkowski difference, kept for contact reconstruction.
#[derive(Debug, Clone, Copy)]
pub struct SupportPoint {
    /// Support point on shape A (world space)
    pub point_a: Vec2,
    /// Support point on shape B (world space)
    pub point_b: Vec2,
    /// `point_a - point_b`
    pub diff: Vec2,
}

/// Computes the support pair in the Minkowski difference (A - B)
#[inline]
pub(crate) fn support<A: Support, B: Support>(
    shape_a: &A,
    shape_b: &B,
    direction: Vec2,
) -> SupportPoint {
    let point_a = shape_a.support_point(direction);
    let point_b = shape_b.support_point(-direction);
    SupportPoint {
        point_a,
        point_b,
        diff: point_a - point_b,
    }
}

/// A simplex of up to 3 support pairs used by GJK and EPA
#[derive(Debug, Clone, Copy)]
pub struct Simplex {
    points: [SupportPoint; 3],
    size: usize,
}

impl Simplex {
    /// Creates an empty simplex
    pub fn new() -> Self {
        let zero = SupportPoint {
            point_a: Vec2::ZERO,
            point_b: Vec2::ZERO,
            diff: Vec2::ZERO,
        };
        Self {
            points: [zero; 3],
            size: 0,
        }
    }

    /// Adds a point to the simplex
    pub fn push(&mut self, point: SupportPoint) {
        debug_assert!(self.size < 3);
        self.points[self.size] = point;
        self.size += 1;
    }

    /// Number of points in the simplex (0-3)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets point at index
    pub fn get(&self, index: usize) -> SupportPoint {
        debug_assert!(index < self.size);
        self.points[index]
    }

    /// Removes point at index and shifts remaining points
    pub fn remove(&mut self, index: usize) {
        debug_assert!(index < self.size);
        for i in index..self.size - 1 {
            self.points[i] = self.points[i + 1];
        }
        self.size -= 1;
    }
}

impl Default for Simplex {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a GJK query
#[derive(Debug, Clone, Copy)]
pub enum GjkResult {
    /// The shapes overlap; the simplex is a triangle enclosing the origin
    /// in Minkowski space, ready for EPA
    Intersecting(Simplex),
    /// The shapes do not overlap; the terminal simplex feeds the
    /// closest-distance query
    Separated(Simplex),
}

impl GjkResult {
    /// Returns true if the shapes overlap
    pub fn is_intersecting(&self) -> bool {
        matches!(self, GjkResult::Intersecting(_))
    }
}

/// Performs the GJK algorithm to detect overlap between two convex shapes.
///
/// Exceeding the iteration cap conservatively reports no collision; the
/// cap bounds runtime on pathological inputs rather than guaranteeing an
/// exact answer for them.
pub fn gjk<A: Support, B: Support>(shape_a: &A, shape_b: &B) -> GjkResult {
    let mut simplex = Simplex::new();

    let mut direction = Vec2::X;
    let first = support(shape_a, shape_b, direction);
    simplex.push(first);
    direction = -first.diff;

    for _ in 0..GJK_MAX_ITERATIONS {
        let new_point = support(shape_a, shape_b, direction);
        if new_point.diff.dot(direction) < 0.0 {
            // The support could not pass the origin: no overlap
            return GjkResult::Separated(simplex);
        }
        simplex.push(new_point);

        if simplex.size() == 2 {
            direction = line_direction(&simplex);
        } else {
            match triangle_case(&mut simplex) {
                TriangleOutcome::Reduced(next) => direction = next,
                TriangleOutcome::Enclosed => return GjkResult::Intersecting(simplex),
            }
        }
    }

    debug!("gjk hit its iteration cap; reporting no collision");
    GjkResult::Separated(simplex)
}

/// Next search direction for a 2-point simplex: the perpendicular of the
/// segment, signed towards the origin (positive dot with newest-to-origin).
fn line_direction(simplex: &Simplex) -> Vec2 {
    let a = simplex.get(1).diff; // Most recently added
    let b = simplex.get(0).diff;

    let ab = b - a;
    let ao = -a;
    if ab.is_near_zero(1e-6) {
        return ao;
    }

    let perp = ab.perp();
    if perp.dot(ao) > 0.0 {
        perp
    } else {
        -perp
    }
}

enum TriangleOutcome {
    /// Origin lies outside one edge; the opposite vertex was dropped and
    /// the search continues along the returned direction
    Reduced(Vec2),
    /// The origin is enclosed by the triangle
    Enclosed,
}

/// Tests the two edges adjacent to the newest point with their
/// outward-pointing perpendiculars.
fn triangle_case(simplex: &mut Simplex) -> TriangleOutcome {
    let a = simplex.get(2).diff; // Most recently added
    let b = simplex.get(1).diff;
    let c = simplex.get(0).diff;
    let ao = -a;

    // Edge A-B, outward means away from C
    let ab = b - a;
    let mut ab_perp = ab.perp();
    if ab_perp.dot(c - a) > 0.0 {
        ab_perp = -ab_perp;
    }
    if ab_perp.dot(ao) > 0.0 {
        simplex.remove(0); // Drop C
        return TriangleOutcome::Reduced(ab_perp);
    }

    // Edge A-C, outward means away from B
    let ac = c - a;
    let mut ac_perp = ac.perp();
    if ac_perp.dot(b - a) > 0.0 {
        ac_perp = -ac_perp;
    }
    if ac_perp.dot(ao) > 0.0 {
        simplex.remove(1); // Drop B
        return TriangleOutcome::Reduced(ac_perp);
    }

    TriangleOutcome::Enclosed
}

/// Convenience overlap test
pub fn intersects<A: Support, B: Support>(shape_a: &A, shape_b: &B) -> bool {
    gjk(shape_a, shape_b).is_intersecting()
}
