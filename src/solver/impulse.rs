use crate::collision::{Contact, COLLISION_EPSILON};
use crate::dynamics::Body;
use crate::math::Vec2;

/// Resolves a contact by applying impulses and positional correction.
///
/// The normal impulse blends a perfectly elastic and a perfectly
/// inelastic solution, weighted by the product of the bodies' restitution
/// coefficients. A tangential friction term is added when the relative
/// tangential speed at the contact is non-negligible. Finally both bodies
/// are shifted along the normal by the signed contact distance, weighted
/// by the other body's mass fraction, leaving the shapes exactly
/// touching.
///
/// Returns the normal-impulse magnitude, used as the impact strength of
/// the collision notification.
pub fn resolve_contact(a: &mut Body, b: &mut Body, contact: &Contact) -> f32 {
    let normal = contact.normal;
    let arm_a = contact.point_a - a.position;
    let arm_b = contact.point_b - b.position;
    let relative = a.velocity - b.velocity;

    let arm_a_n = arm_a.cross(normal);
    let arm_b_n = arm_b.cross(normal);

    let elastic = 2.0
        * (relative.dot(normal) + arm_a_n * a.angular_velocity - arm_b_n * b.angular_velocity)
        / (1.0 / a.mass + 1.0 / b.mass + arm_a_n * arm_a_n / a.inertia + arm_b_n * arm_b_n / b.inertia);
    let inelastic = a.mass * b.mass * relative.dot(normal) / (a.mass + b.mass);

    let restitution = a.restitution * b.restitution;
    let normal_magnitude = restitution * elastic + (1.0 - restitution) * inelastic;
    let mut impulse = normal * normal_magnitude;

    let tangent = normal.perp();
    let tangential_speed = relative.dot(tangent)
        - a.angular_velocity * arm_a.length()
        - b.angular_velocity * arm_b.length();
    if tangential_speed.abs() > COLLISION_EPSILON {
        impulse += tangent
            * (a.friction * b.friction)
            * normal_magnitude.abs()
            * tangential_speed.signum();
    }

    a.velocity -= impulse / a.mass;
    b.velocity += impulse / b.mass;
    a.angular_velocity -= arm_a.cross(impulse) / a.inertia;
    b.angular_velocity += arm_b.cross(impulse) / b.inertia;

    let total_mass = a.mass + b.mass;
    a.position += normal * (contact.distance * b.mass / total_mass);
    b.position -= normal * (contact.distance * a.mass / total_mass);

    normal_magnitude.abs()
}

/// Closed-form circle-circle contact, bypassing GJK/EPA entirely.
///
/// Returns `None` unless the circles overlap by more than the collision
/// epsilon. The resulting contact feeds [`resolve_contact`]; both arms
/// are parallel to the normal, so the angular terms vanish and the
/// response is exact.
pub fn circle_circle_contact(
    position_a: Vec2,
    radius_a: f32,
    position_b: Vec2,
    radius_b: f32,
) -> Option<Contact> {
    let delta = position_b - position_a;
    let (dir, dist) = delta.normalize_with_length();

    if radius_a + radius_b - dist <= COLLISION_EPSILON {
        return None;
    }

    let normal = if dist > 1e-6 { dir } else { Vec2::X };
    Some(Contact {
        point_a: position_a + normal * radius_a,
        point_b: position_b - normal * radius_b,
        normal,
        distance: dist - (radius_a + radius_b),
    })
}
