use log::debug;

use crate::error::PhysicsError;
use crate::math::Vec2;

use super::shape::ConvexComponent;

/// Splits a simple polygon into convex components.
///
/// The polygon is triangulated by ear clipping, then triangles are fused
/// back together across every non-essential diagonal (Hertel-Mehlhorn),
/// leaving at most 4x the optimal number of convex pieces. Original
/// polygon edges are never removed, only the synthetic diagonals
/// introduced by the triangulation.
///
/// Vertex winding is normalized to clockwise before clipping; either
/// winding is accepted. Fails with [`PhysicsError::InvalidShape`] for
/// fewer than 3 vertices.
pub fn decompose(vertices: &[Vec2]) -> Result<Vec<ConvexComponent>, PhysicsError> {
    if vertices.len() < 3 {
        return Err(PhysicsError::InvalidShape {
            vertices: vertices.len(),
        });
    }

    let mut verts = vertices.to_vec();
    if signed_area(&verts) > 0.0 {
        verts.reverse();
    }

    let triangles = ear_clip(&verts);
    let rings = merge_non_essential(&verts, &triangles);

    Ok(rings
        .into_iter()
        .map(|ring| ConvexComponent::new(ring.into_iter().map(|i| verts[i]).collect()))
        .collect())
}

/// Twice the signed shoelace sum; negative for clockwise loops.
pub(crate) fn signed_area(vertices: &[Vec2]) -> f32 {
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        sum += vertices[i].cross(vertices[j]);
    }
    sum * 0.5
}

/// Triangulates a clockwise simple polygon by ear clipping.
///
/// Returns exactly `n - 2` index triples. A triple `(prev, cur, next)` is
/// an ear when the corner at `cur` is strictly convex (collinear corners
/// do not qualify) and no other remaining vertex lies inside the
/// triangle.
fn ear_clip(vertices: &[Vec2]) -> Vec<[usize; 3]> {
    let n = vertices.len();
    let mut ring: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while ring.len() > 3 {
        let mut clipped = false;

        for i in 0..ring.len() {
            let prev = ring[(i + ring.len() - 1) % ring.len()];
            let cur = ring[i];
            let next = ring[(i + 1) % ring.len()];

            if !is_convex_corner(vertices[prev], vertices[cur], vertices[next]) {
                continue;
            }

            let blocked = ring.iter().any(|&k| {
                k != prev
                    && k != cur
                    && k != next
                    && point_in_triangle(vertices[k], vertices[prev], vertices[cur], vertices[next])
            });
            if blocked {
                continue;
            }

            triangles.push([prev, cur, next]);
            ring.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            // No ear exists for a simple polygon only under numerical
            // degeneracy; clip an arbitrary corner so the loop terminates.
            debug!("ear clipping stalled with {} vertices remaining", ring.len());
            triangles.push([ring[0], ring[1], ring[2]]);
            ring.remove(1);
        }
    }

    triangles.push([ring[0], ring[1], ring[2]]);
    triangles
}

/// Corner test for clockwise winding; collinear corners are not convex.
#[inline]
fn is_convex_corner(prev: Vec2, cur: Vec2, next: Vec2) -> bool {
    (cur - prev).cross(next - cur) < 0.0
}

/// Inclusive containment test for a clockwise triangle.
#[inline]
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b - a).cross(p - a) <= 0.0 && (c - b).cross(p - b) <= 0.0 && (a - c).cross(p - c) <= 0.0
}

/// Fuses triangles across non-essential diagonals (Hertel-Mehlhorn).
///
/// A diagonal is non-essential when both corner angles produced by the
/// merge stay at or below PI; dissolving one splices the neighbouring
/// ring in while preserving clockwise order.
fn merge_non_essential(vertices: &[Vec2], triangles: &[[usize; 3]]) -> Vec<Vec<usize>> {
    let n = vertices.len();
    let mut components: Vec<Option<Vec<usize>>> =
        triangles.iter().map(|t| Some(t.to_vec())).collect();

    // Diagonals are triangulation edges that are not original polygon edges.
    let mut diagonals: Vec<(usize, usize)> = Vec::new();
    for tri in triangles {
        for e in 0..3 {
            let a = tri[e];
            let b = tri[(e + 1) % 3];
            if (a + 1) % n == b || (b + 1) % n == a {
                continue;
            }
            let key = (a.min(b), a.max(b));
            if !diagonals.contains(&key) {
                diagonals.push(key);
            }
        }
    }

    for &(a, b) in &diagonals {
        let Some((p_idx, i)) = find_edge(&components, a, b) else {
            continue;
        };
        let Some((q_idx, _)) = find_edge(&components, b, a) else {
            continue;
        };
        if p_idx == q_idx {
            continue;
        }

        let (Some(p_ring), Some(q_ring)) = (components[p_idx].clone(), components[q_idx].clone())
        else {
            continue;
        };

        // Walk Q clockwise from `a` to collect the chain spliced between
        // `a` and `b`.
        let Some(qa) = q_ring.iter().position(|&v| v == a) else {
            continue;
        };
        let mut chain = Vec::with_capacity(q_ring.len() - 2);
        let mut k = (qa + 1) % q_ring.len();
        while q_ring[k] != b {
            chain.push(q_ring[k]);
            k = (k + 1) % q_ring.len();
        }
        if chain.is_empty() {
            continue;
        }

        // The merge is allowed only if both corners stay convex.
        let prev_a = p_ring[(i + p_ring.len() - 1) % p_ring.len()];
        let next_b = p_ring[(i + 2) % p_ring.len()];
        let corner_a =
            (vertices[a] - vertices[prev_a]).cross(vertices[chain[0]] - vertices[a]);
        let last = chain[chain.len() - 1];
        let corner_b = (vertices[b] - vertices[last]).cross(vertices[next_b] - vertices[b]);
        if corner_a > 1e-6 || corner_b > 1e-6 {
            continue;
        }

        let mut merged = Vec::with_capacity(p_ring.len() + chain.len());
        for (idx, &v) in p_ring.iter().enumerate() {
            merged.push(v);
            if idx == i {
                merged.extend_from_slice(&chain);
            }
        }

        components[p_idx] = Some(merged);
        components[q_idx] = None;
    }

    components.into_iter().flatten().collect()
}

/// Finds the live component containing the directed edge `a -> b`.
fn find_edge(components: &[Option<Vec<usize>>], a: usize, b: usize) -> Option<(usize, usize)> {
    for (c_idx, component) in components.iter().enumerate() {
        let Some(ring) = component else {
            continue;
        };
        for i in 0..ring.len() {
            if ring[i] == a && ring[(i + 1) % ring.len()] == b {
                return Some((c_idx, i));
            }
        }
    }
    None
}
