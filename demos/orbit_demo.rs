//! Orbit and collision example
//!
//! Two satellites circle a heavy planet; one of them is on a collision
//! course with the other.

use gravitas::prelude::*;

fn main() {
    println!("Gravitas - Orbit Demo");
    println!("=====================\n");

    let mut world = World::new(WorldConfig {
        gravitational_constant: 1.0,
        ..WorldConfig::default()
    });

    // Heavy central planet
    let planet = world.spawn(
        BodyDesc::new().with_mass(1000.0).with_restitution(0.2),
        Shape::circle(2.0),
    );
    println!("Created planet at the origin (mass=1000)");

    // Satellite on a circular orbit: v = sqrt(G * m / r)
    let satellite = world.spawn(
        BodyDesc::new()
            .with_position(Vec2::new(10.0, 0.0))
            .with_velocity(Vec2::new(0.0, 10.0))
            .with_mass(1.0)
            .with_restitution(0.8),
        Shape::circle(0.5),
    );
    println!("Created satellite at (10, 0) with orbital velocity (0, 10)");

    // A square tumbling through the same orbit in the opposite direction
    let debris = world.spawn(
        BodyDesc::new()
            .with_position(Vec2::new(-10.0, 0.0))
            .with_velocity(Vec2::new(0.0, 10.0))
            .with_angular_velocity(2.0)
            .with_mass(1.0)
            .with_restitution(0.8),
        Shape::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ])
        .expect("square is a valid polygon"),
    );
    println!("Created debris square at (-10, 0), counter-orbiting\n");

    let dt = world.config().timestep;
    let total_time = 6.0;
    let steps = (total_time / dt) as usize;

    println!("Simulating {} seconds ({} steps)...\n", total_time, steps);

    for i in 0..steps {
        world.advance(dt);

        for event in world.drain_events() {
            println!(
                "t={:.2}s: collision between {:?} and {:?} (impact {:.3})",
                i as f32 * dt,
                event.body_a,
                event.body_b,
                event.impact
            );
        }

        // Print positions every half second
        if i % 25 == 0 {
            let sat = world.body(satellite).map(|b| b.position).unwrap_or(Vec2::ZERO);
            let deb = world.body(debris).map(|b| b.position).unwrap_or(Vec2::ZERO);
            println!(
                "t={:.2}s: satellite=({:.2}, {:.2}), debris=({:.2}, {:.2})",
                i as f32 * dt,
                sat.x,
                sat.y,
                deb.x,
                deb.y
            );
        }
    }

    let planet_pos = world.body(planet).map(|b| b.position).unwrap_or(Vec2::ZERO);
    println!(
        "\nFinal planet drift: ({:.3}, {:.3}) after {} steps",
        planet_pos.x,
        planet_pos.y,
        world.step_count()
    );
}
