use crate::math::utils::wrap_angle;
use crate::math::Vec2;

use super::body::Body;

/// Time direction of an integration step.
///
/// Backward runs the identical RK4 scheme with the timestep negated,
/// rewinding the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Applies this direction's sign to a timestep
    #[inline]
    pub fn signed(self, dt: f32) -> f32 {
        match self {
            Direction::Forward => dt,
            Direction::Backward => -dt,
        }
    }
}

/// Advances every body one classical RK4 step under mutual Newtonian
/// gravity.
///
/// All four stage accelerations and velocities are evaluated for all
/// bodies before any state is committed, so the result does not depend on
/// body enumeration order beyond the fixed ascending-id summation.
/// Rotation advances linearly and is wrapped to (-PI, PI].
pub fn integrate(
    bodies: &mut [Option<Body>],
    gravitational_constant: f32,
    dt: f32,
    direction: Direction,
) {
    let h = direction.signed(dt);

    let ids: Vec<usize> = bodies
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
        .collect();
    if ids.is_empty() {
        return;
    }

    let mut p0 = Vec::with_capacity(ids.len());
    let mut v0 = Vec::with_capacity(ids.len());
    let mut masses = Vec::with_capacity(ids.len());
    for &slot in &ids {
        if let Some(body) = &bodies[slot] {
            p0.push(body.position);
            v0.push(body.velocity);
            masses.push(body.mass);
        }
    }

    let n = ids.len();
    let half = h * 0.5;

    // Stage 1 at the committed state
    let a1 = accelerations(&p0, &masses, gravitational_constant);

    // Stage 2 at the midpoint along stage-1 derivatives
    let p2: Vec<Vec2> = (0..n).map(|i| p0[i] + v0[i] * half).collect();
    let v2: Vec<Vec2> = (0..n).map(|i| v0[i] + a1[i] * half).collect();
    let a2 = accelerations(&p2, &masses, gravitational_constant);

    // Stage 3 at the midpoint along stage-2 derivatives
    let p3: Vec<Vec2> = (0..n).map(|i| p0[i] + v2[i] * half).collect();
    let v3: Vec<Vec2> = (0..n).map(|i| v0[i] + a2[i] * half).collect();
    let a3 = accelerations(&p3, &masses, gravitational_constant);

    // Stage 4 at the full step along stage-3 derivatives
    let p4: Vec<Vec2> = (0..n).map(|i| p0[i] + v3[i] * h).collect();
    let v4: Vec<Vec2> = (0..n).map(|i| v0[i] + a3[i] * h).collect();
    let a4 = accelerations(&p4, &masses, gravitational_constant);

    let sixth = h / 6.0;
    for (i, &slot) in ids.iter().enumerate() {
        if let Some(body) = bodies[slot].as_mut() {
            body.position = p0[i] + (v0[i] + (v2[i] + v3[i]) * 2.0 + v4[i]) * sixth;
            body.velocity = v0[i] + (a1[i] + (a2[i] + a3[i]) * 2.0 + a4[i]) * sixth;
            body.rotation = wrap_angle(body.rotation + body.angular_velocity * h);
        }
    }
}

/// Pairwise Newtonian acceleration at the given trial positions.
///
/// `a_i = G * sum over j != i of m_j * (p_j - p_i) / |p_j - p_i|^3`,
/// summed in ascending index order. Coincident bodies contribute nothing.
fn accelerations(positions: &[Vec2], masses: &[f32], gravitational_constant: f32) -> Vec<Vec2> {
    let n = positions.len();
    let mut result = vec![Vec2::ZERO; n];

    for i in 0..n {
        let mut acc = Vec2::ZERO;
        for j in 0..n {
            if j == i {
                continue;
            }
            let delta = positions[j] - positions[i];
            let dist_sq = delta.length_squared();
            if dist_sq > 1e-12 {
                acc += delta * (gravitational_constant * masses[j] / (dist_sq * dist_sq.sqrt()));
            }
        }
        result[i] = acc;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::BodyDesc;
    use crate::geometry::Shape;

    fn circle_body(position: Vec2, velocity: Vec2, mass: f32) -> Option<Body> {
        Some(Body::new(
            &BodyDesc::new()
                .with_position(position)
                .with_velocity(velocity)
                .with_mass(mass),
            Shape::circle(0.5),
        ))
    }

    #[test]
    fn test_single_body_drifts_linearly() {
        let mut bodies = vec![circle_body(Vec2::ZERO, Vec2::new(2.0, 1.0), 1.0)];

        integrate(&mut bodies, 1.0, 0.02, Direction::Forward);

        let body = bodies[0].as_ref().unwrap();
        assert!(body.position.distance(Vec2::new(0.04, 0.02)) < 1e-6);
        assert!(body.velocity.distance(Vec2::new(2.0, 1.0)) < 1e-6);
    }

    #[test]
    fn test_two_bodies_attract_symmetrically() {
        let mut bodies = vec![
            circle_body(Vec2::new(-1.0, 0.0), Vec2::ZERO, 1.0),
            circle_body(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0),
        ];

        integrate(&mut bodies, 1.0, 0.02, Direction::Forward);

        let a = bodies[0].as_ref().unwrap();
        let b = bodies[1].as_ref().unwrap();

        // Both fall toward the midpoint
        assert!(a.velocity.x > 0.0);
        assert!(b.velocity.x < 0.0);
        assert!(a.position.x > -1.0);
        assert!(b.position.x < 1.0);

        // Momentum stays zero and the configuration stays mirrored
        assert!((a.velocity.x + b.velocity.x).abs() < 1e-6);
        assert!((a.position.x + b.position.x).abs() < 1e-6);
        assert!(a.velocity.y.abs() < 1e-9);
    }

    #[test]
    fn test_backward_rewinds_forward() {
        let mut bodies = vec![
            circle_body(Vec2::new(-2.0, 0.5), Vec2::new(0.1, -0.2), 2.0),
            circle_body(Vec2::new(3.0, -1.0), Vec2::new(-0.3, 0.0), 1.0),
            circle_body(Vec2::new(0.0, 4.0), Vec2::ZERO, 0.5),
        ];
        let initial: Vec<(Vec2, Vec2)> = bodies
            .iter()
            .map(|b| {
                let b = b.as_ref().unwrap();
                (b.position, b.velocity)
            })
            .collect();

        for _ in 0..10 {
            integrate(&mut bodies, 1.0, 0.02, Direction::Forward);
        }
        for _ in 0..10 {
            integrate(&mut bodies, 1.0, 0.02, Direction::Backward);
        }

        for (slot, (pos, vel)) in bodies.iter().zip(initial) {
            let body = slot.as_ref().unwrap();
            assert!(body.position.distance(pos) < 1e-3);
            assert!(body.velocity.distance(vel) < 1e-3);
        }
    }

    #[test]
    fn test_rotation_advances_and_wraps() {
        let mut bodies = vec![circle_body(Vec2::ZERO, Vec2::ZERO, 1.0)];
        bodies[0].as_mut().unwrap().angular_velocity = 10.0;

        for _ in 0..50 {
            integrate(&mut bodies, 0.0, 0.02, Direction::Forward);
        }

        // 10 rad accumulated, reduced into (-PI, PI]
        let rotation = bodies[0].as_ref().unwrap().rotation;
        assert!(rotation > -std::f32::consts::PI && rotation <= std::f32::consts::PI);
        assert!((rotation - (10.0 - 2.0 * std::f32::consts::TAU)).abs() < 1e-3);
    }

    #[test]
    fn test_circular_orbit_stays_bounded() {
        // Light satellite around a heavy primary; v = sqrt(G m / r)
        let mut bodies = vec![
            circle_body(Vec2::ZERO, Vec2::ZERO, 1000.0),
            circle_body(Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0), 1.0),
        ];

        for _ in 0..200 {
            integrate(&mut bodies, 1.0, 0.02, Direction::Forward);
        }

        let primary = bodies[0].as_ref().unwrap();
        let satellite = bodies[1].as_ref().unwrap();
        let separation = primary.position.distance(satellite.position);
        assert!(
            (separation - 10.0).abs() < 0.2,
            "separation drifted to {}",
            separation
        );
    }

    #[test]
    fn test_dead_slots_are_skipped() {
        let mut bodies = vec![
            circle_body(Vec2::new(-1.0, 0.0), Vec2::ZERO, 1.0),
            None,
            circle_body(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0),
        ];

        integrate(&mut bodies, 1.0, 0.02, Direction::Forward);

        assert!(bodies[1].is_none());
        assert!(bodies[0].as_ref().unwrap().velocity.x > 0.0);
    }
}
