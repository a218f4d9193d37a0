use log::debug;

use crate::collision::contact::{Contact, COLLISION_EPSILON};
use crate::math::{closest_point_on_segment, Vec2};

use super::gjk::{support, Simplex, Support, SupportPoint};

/// Maximum iterations for the EPA expansion
const EPA_MAX_ITERATIONS: usize = 100;

/// Maximum iterations for the separated-distance query
const DISTANCE_MAX_ITERATIONS: usize = 50;

/// Performs the EPA algorithm to find the contact edge of two overlapping
/// shapes.
///
/// Requires the triangle simplex produced by a successful GJK query;
/// returns `None` for smaller simplices. The polytope is expanded along
/// the closest edge's outward normal until the support point stops making
/// progress (within epsilon) or the iteration cap is hit, in which case
/// the best current edge is used.
pub fn epa<A: Support, B: Support>(simplex: &Simplex, shape_a: &A, shape_b: &B) -> Option<Contact> {
    if simplex.size() < 3 {
        return None;
    }

    let mut polytope: Vec<SupportPoint> = (0..3).map(|i| simplex.get(i)).collect();

    for _ in 0..EPA_MAX_ITERATIONS {
        let (index, normal, distance) = closest_edge(&polytope)?;

        let new_point = support(shape_a, shape_b, normal);
        if new_point.diff.dot(normal) - distance < COLLISION_EPSILON {
            let next = (index + 1) % polytope.len();
            return Some(edge_contact(polytope[index], polytope[next], true, normal));
        }

        polytope.insert(index + 1, new_point);
    }

    debug!("epa hit its iteration cap; using best current edge");
    let (index, normal, _) = closest_edge(&polytope)?;
    let next = (index + 1) % polytope.len();
    Some(edge_contact(polytope[index], polytope[next], true, normal))
}

/// Computes the closest distance between two separated shapes.
///
/// Takes the terminal simplex of an unsuccessful GJK query, reduces it to
/// the edge nearest the origin, and expands toward the origin until no
/// further improvement (within epsilon) or the iteration cap. The result
/// carries a positive signed distance.
pub fn closest_distance<A: Support, B: Support>(
    simplex: &Simplex,
    shape_a: &A,
    shape_b: &B,
) -> Option<Contact> {
    if simplex.size() == 0 {
        return None;
    }

    let (mut s1, mut s2) = nearest_edge_of_simplex(simplex);

    let mut remaining = DISTANCE_MAX_ITERATIONS;
    loop {
        if remaining == 0 {
            debug!("distance query hit its iteration cap; using best current edge");
            break;
        }
        remaining -= 1;

        let q = closest_point_on_segment(s1.diff, s2.diff, Vec2::ZERO);
        if q.length_squared() < 1e-12 {
            // Exact touch
            break;
        }

        let (q_dir, q_len) = q.normalize_with_length();
        let dir = -q_dir;
        let new_point = support(shape_a, shape_b, dir);
        if new_point.diff.dot(dir) + q_len < COLLISION_EPSILON {
            break;
        }

        // Keep the sub-edge nearer the origin
        let d1 = closest_point_on_segment(s1.diff, new_point.diff, Vec2::ZERO).length_squared();
        let d2 = closest_point_on_segment(new_point.diff, s2.diff, Vec2::ZERO).length_squared();
        if d1 < d2 {
            s2 = new_point;
        } else {
            s1 = new_point;
        }
    }

    Some(edge_contact(s1, s2, false, Vec2::X))
}

/// Finds the polytope edge nearest the origin, with its outward unit
/// normal and distance.
fn closest_edge(polytope: &[SupportPoint]) -> Option<(usize, Vec2, f32)> {
    let mut best: Option<(usize, Vec2, f32)> = None;

    for i in 0..polytope.len() {
        let j = (i + 1) % polytope.len();
        let a = polytope[i].diff;
        let edge = polytope[j].diff - a;

        let mut normal = edge.perp().normalize();
        if normal == Vec2::ZERO {
            continue;
        }
        if normal.dot(a) < 0.0 {
            normal = -normal;
        }
        let distance = normal.dot(a);

        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((i, normal, distance));
        }
    }

    best
}

/// Reduces a terminal simplex to the candidate edge nearest the origin.
///
/// A single-point simplex degenerates to a zero-length edge.
fn nearest_edge_of_simplex(simplex: &Simplex) -> (SupportPoint, SupportPoint) {
    match simplex.size() {
        1 => (simplex.get(0), simplex.get(0)),
        2 => (simplex.get(0), simplex.get(1)),
        _ => {
            let mut best = (simplex.get(0), simplex.get(1));
            let mut best_dist = f32::MAX;
            for (i, j) in [(0, 1), (1, 2), (2, 0)] {
                let p = closest_point_on_segment(
                    simplex.get(i).diff,
                    simplex.get(j).diff,
                    Vec2::ZERO,
                );
                let dist = p.length_squared();
                if dist < best_dist {
                    best_dist = dist;
                    best = (simplex.get(i), simplex.get(j));
                }
            }
            best
        }
    }
}

/// Reconstructs contact data from a Minkowski-space edge.
///
/// The barycentric coordinate of the origin's projection onto the edge is
/// clamped to [0, 1] and used to interpolate both original-space support
/// points. The signed distance is negative for overlapping shapes and
/// positive for separated ones; the normal always points from A to B.
fn edge_contact(s1: SupportPoint, s2: SupportPoint, overlapping: bool, fallback: Vec2) -> Contact {
    let edge = s2.diff - s1.diff;
    let len_sq = edge.length_squared();
    let alpha = if len_sq > 1e-12 {
        ((-s1.diff).dot(edge) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let point_a = s1.point_a.lerp(s2.point_a, alpha);
    let point_b = s1.point_b.lerp(s2.point_b, alpha);
    let closest = s1.diff.lerp(s2.diff, alpha);
    let (dir, length) = closest.normalize_with_length();

    if overlapping {
        // While penetrating, the interpolated difference points from B's
        // side to A's side, which is the A-to-B push axis.
        let normal = if length > 1e-6 { dir } else { fallback };
        Contact {
            point_a,
            point_b,
            normal,
            distance: -length,
        }
    } else {
        let normal = if length > 1e-6 { -dir } else { fallback };
        Contact {
            point_a,
            point_b,
            normal,
            distance: length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::narrow_phase::gjk::{gjk, GjkResult, PointSupport, WorldComponent};
    use crate::geometry::Polygon;
    use crate::math::Transform;

    fn square(size: f32) -> Polygon {
        Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, size),
            Vec2::new(size, size),
            Vec2::new(size, 0.0),
        ])
        .unwrap()
    }

    fn world(polygon: &Polygon, position: Vec2) -> WorldComponent<'_> {
        WorldComponent {
            component: &polygon.components()[0],
            transform: Transform::new(position, 0.0, polygon.centroid()),
        }
    }

    #[test]
    fn test_square_square_penetration() {
        let polygon = square(2.0);
        let a = world(&polygon, Vec2::ZERO);
        let b = world(&polygon, Vec2::new(1.5, 0.0));

        let GjkResult::Intersecting(simplex) = gjk(&a, &b) else {
            panic!("expected intersection");
        };
        let contact = epa(&simplex, &a, &b).unwrap();

        assert!((contact.distance + 0.5).abs() < 0.01);
        assert!((contact.normal.x - 1.0).abs() < 0.01);
        assert!(contact.normal.y.abs() < 0.01);
        assert!((contact.point_a.x - 1.0).abs() < 0.01);
        assert!((contact.point_b.x - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_point_inside_square() {
        let polygon = square(2.0);
        let component = world(&polygon, Vec2::ZERO);
        let point = PointSupport(Vec2::new(0.6, 0.0));

        let GjkResult::Intersecting(simplex) = gjk(&point, &component) else {
            panic!("expected intersection");
        };
        let contact = epa(&simplex, &point, &component).unwrap();

        // Nearest face is x = 1, so the point sits 0.4 inside it
        assert!((contact.distance + 0.4).abs() < 0.01);
        assert!((contact.normal.x + 1.0).abs() < 0.01);
        assert!(contact.point_a.distance(Vec2::new(0.6, 0.0)) < 0.01);
    }

    #[test]
    fn test_epa_requires_triangle() {
        let polygon = square(2.0);
        let a = world(&polygon, Vec2::ZERO);
        let simplex = Simplex::new();
        assert!(epa(&simplex, &a, &a).is_none());
    }

    #[test]
    fn test_distance_between_separated_squares() {
        let polygon = square(2.0);
        let a = world(&polygon, Vec2::ZERO);
        let b = world(&polygon, Vec2::new(3.0, 0.0));

        let GjkResult::Separated(simplex) = gjk(&a, &b) else {
            panic!("expected separation");
        };
        let contact = closest_distance(&simplex, &a, &b).unwrap();

        assert!((contact.distance - 1.0).abs() < 0.01);
        assert!((contact.normal.x - 1.0).abs() < 0.01);
        assert!((contact.point_a.x - 1.0).abs() < 0.01);
        assert!((contact.point_b.x - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_distance_point_outside_square() {
        let polygon = square(2.0);
        let component = world(&polygon, Vec2::ZERO);
        let point = PointSupport(Vec2::new(2.0, 0.0));

        let GjkResult::Separated(simplex) = gjk(&point, &component) else {
            panic!("expected separation");
        };
        let contact = closest_distance(&simplex, &point, &component).unwrap();

        assert!((contact.distance - 1.0).abs() < 0.01);
        assert!((contact.normal.x + 1.0).abs() < 0.01);
        assert!(contact.point_b.distance(Vec2::new(1.0, 0.0)) < 0.01);
    }

    #[test]
    fn test_distance_diagonal_offset() {
        let polygon = square(2.0);
        let a = world(&polygon, Vec2::ZERO);
        let b = world(&polygon, Vec2::new(3.0, 3.0));

        let GjkResult::Separated(simplex) = gjk(&a, &b) else {
            panic!("expected separation");
        };
        let contact = closest_distance(&simplex, &a, &b).unwrap();

        // Corner-to-corner gap along the diagonal
        let expected = Vec2::new(1.0, 1.0).length();
        assert!((contact.distance - expected).abs() < 0.01);
        let diag = Vec2::new(1.0, 1.0).normalize();
        assert!(contact.normal.distance(diag) < 0.01);
    }
}
