use log::trace;

use crate::collision::{
    closest_distance, epa, gjk, BodyId, CollisionEvent, Contact, GjkResult, PointSupport,
    WorldComponent, COLLISION_EPSILON,
};
use crate::dynamics::{Body, BodyDesc, Direction};
use crate::geometry::{Shape, ShapeType};
use crate::solver::{circle_circle_contact, resolve_contact};

/// Configuration for the physics world
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Fixed physical timestep in seconds
    pub timestep: f32,
    /// Gravitational constant of the pairwise attraction; units are the
    /// host's own scale
    pub gravitational_constant: f32,
    /// Initial signed time scale applied to wall-clock time
    pub time_scale: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            timestep: 0.02,
            gravitational_constant: 1.0,
            time_scale: 1.0,
        }
    }
}

/// The main physics world containing all bodies and driving the
/// fixed-step simulation.
///
/// One tick integrates every body under mutual gravity, then runs one
/// full collision pass; the two never interleave. Bodies live in an
/// arena indexed by stable ids, and all pairwise loops enumerate ids in
/// ascending order so results are reproducible.
pub struct World {
    /// Configuration
    config: WorldConfig,
    /// All bodies; freed slots are None and reused
    bodies: Vec<Option<Body>>,
    /// Free body indices for reuse
    free_bodies: Vec<usize>,
    /// Signed multiplier applied to elapsed wall-clock time
    time_scale: f32,
    /// Unconsumed scaled time
    accumulator: f32,
    /// Signed number of steps taken since creation
    step_count: i64,
    /// Signed simulation time
    time: f32,
    /// Collision notifications since the last drain
    events: Vec<CollisionEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// Creates a new physics world with the given configuration
    pub fn new(config: WorldConfig) -> Self {
        Self {
            time_scale: config.time_scale,
            config,
            bodies: Vec::new(),
            free_bodies: Vec::new(),
            accumulator: 0.0,
            step_count: 0,
            time: 0.0,
            events: Vec::new(),
        }
    }

    /// Creates a body from a description and shape, returning its id
    pub fn spawn(&mut self, desc: BodyDesc, shape: Shape) -> BodyId {
        let mut body = Body::new(&desc, shape);

        let index = if let Some(index) = self.free_bodies.pop() {
            index
        } else {
            self.bodies.push(None);
            self.bodies.len() - 1
        };

        let id = BodyId::new(index as u32);
        body.id = id;
        self.bodies[index] = Some(body);
        id
    }

    /// Removes a body from the world
    pub fn remove_body(&mut self, id: BodyId) {
        let index = id.index();
        if index < self.bodies.len() && self.bodies[index].is_some() {
            self.bodies[index] = None;
            self.free_bodies.push(index);
        }
    }

    /// Gets a reference to a body
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index()).and_then(|slot| slot.as_ref())
    }

    /// Gets a mutable reference to a body
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    /// Returns the number of live bodies in the world
    pub fn num_bodies(&self) -> usize {
        self.bodies.len() - self.free_bodies.len()
    }

    /// Returns an iterator over all live bodies in ascending id order
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().flatten()
    }

    /// Returns the world configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the signed number of steps taken so far
    pub fn step_count(&self) -> i64 {
        self.step_count
    }

    /// Returns the signed simulation time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Returns the current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Sets the signed time scale; negative values rewind
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    /// Collision notifications accumulated since the last drain
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Takes all pending collision notifications
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Accumulates scaled wall-clock time and consumes whole fixed steps,
    /// in either time direction. Each step integrates gravity and then
    /// runs one full collision pass.
    pub fn advance(&mut self, elapsed: f32) {
        self.accumulator += elapsed * self.time_scale;
        let dt = self.config.timestep;
        let mut steps = 0u32;

        while self.accumulator >= dt {
            self.accumulator -= dt;
            self.integrate(Direction::Forward);
            self.resolve_collisions();
            steps += 1;
        }
        while self.accumulator <= -dt {
            self.accumulator += dt;
            self.integrate(Direction::Backward);
            self.resolve_collisions();
            steps += 1;
        }

        if steps > 0 {
            trace!(
                "advanced {} steps (step_count={}, pending_events={})",
                steps,
                self.step_count,
                self.events.len()
            );
        }
    }

    /// Advances one fixed RK4 step, forward or backward
    pub fn integrate(&mut self, direction: Direction) {
        crate::dynamics::integrate(
            &mut self.bodies,
            self.config.gravitational_constant,
            self.config.timestep,
            direction,
        );
        self.step_count += match direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };
        self.time += direction.signed(self.config.timestep);
    }

    /// Runs one full collision pass over typed entity pairs.
    ///
    /// Circle ids and polygon ids are collected once per pass in
    /// ascending order; every detected contact is resolved immediately,
    /// in enumeration order, before the next pair is tested.
    pub fn resolve_collisions(&mut self) {
        let mut circles: Vec<usize> = Vec::new();
        let mut polygons: Vec<usize> = Vec::new();
        for (index, slot) in self.bodies.iter().enumerate() {
            if let Some(body) = slot {
                match body.shape.shape_type() {
                    ShapeType::Circle => circles.push(index),
                    ShapeType::Polygon => polygons.push(index),
                }
            }
        }

        for i in 0..circles.len() {
            for j in (i + 1)..circles.len() {
                self.resolve_circle_circle(circles[i], circles[j]);
            }
        }

        for &circle in &circles {
            for &polygon in &polygons {
                self.resolve_circle_polygon(circle, polygon);
            }
        }

        for i in 0..polygons.len() {
            for j in (i + 1)..polygons.len() {
                self.resolve_polygon_polygon(polygons[i], polygons[j]);
            }
        }
    }

    /// Closed-form circle-circle path; no GJK/EPA involved
    fn resolve_circle_circle(&mut self, a: usize, b: usize) {
        let contact = {
            let (Some(body_a), Some(body_b)) = (self.bodies[a].as_ref(), self.bodies[b].as_ref())
            else {
                return;
            };
            let (Shape::Circle(circle_a), Shape::Circle(circle_b)) = (&body_a.shape, &body_b.shape)
            else {
                return;
            };
            circle_circle_contact(
                body_a.position,
                circle_a.radius,
                body_b.position,
                circle_b.radius,
            )
        };

        if let Some(contact) = contact {
            self.apply_contact(a, b, &contact);
        }
    }

    /// Tests the circle center as a degenerate point shape against each
    /// convex component, then inflates the contact by the radius.
    fn resolve_circle_polygon(&mut self, circle_index: usize, polygon_index: usize) {
        let component_count = {
            let Some(body) = self.bodies[polygon_index].as_ref() else {
                return;
            };
            let Shape::Polygon(polygon) = &body.shape else {
                return;
            };
            polygon.components().len()
        };

        for component_index in 0..component_count {
            let contact = {
                let (Some(circle_body), Some(polygon_body)) = (
                    self.bodies[circle_index].as_ref(),
                    self.bodies[polygon_index].as_ref(),
                ) else {
                    return;
                };
                let Shape::Circle(circle) = &circle_body.shape else {
                    return;
                };
                let Shape::Polygon(polygon) = &polygon_body.shape else {
                    return;
                };

                let center = PointSupport(circle_body.position);
                let component = WorldComponent {
                    component: &polygon.components()[component_index],
                    transform: polygon_body.transform(),
                };

                match gjk(&center, &component) {
                    GjkResult::Separated(simplex) => {
                        closest_distance(&simplex, &center, &component).and_then(|contact| {
                            if circle.radius - contact.distance > COLLISION_EPSILON {
                                Some(inflate(contact, circle.radius))
                            } else {
                                None
                            }
                        })
                    }
                    GjkResult::Intersecting(simplex) => epa(&simplex, &center, &component)
                        .map(|contact| inflate(contact, circle.radius)),
                }
            };

            if let Some(contact) = contact {
                self.apply_contact(circle_index, polygon_index, &contact);
            }
        }
    }

    /// GJK + EPA over every component pair of the two polygons
    fn resolve_polygon_polygon(&mut self, a: usize, b: usize) {
        let (count_a, count_b) = {
            let (Some(body_a), Some(body_b)) = (self.bodies[a].as_ref(), self.bodies[b].as_ref())
            else {
                return;
            };
            let (Shape::Polygon(polygon_a), Shape::Polygon(polygon_b)) =
                (&body_a.shape, &body_b.shape)
            else {
                return;
            };
            (polygon_a.components().len(), polygon_b.components().len())
        };

        for index_a in 0..count_a {
            for index_b in 0..count_b {
                let contact = {
                    let (Some(body_a), Some(body_b)) =
                        (self.bodies[a].as_ref(), self.bodies[b].as_ref())
                    else {
                        return;
                    };
                    let (Shape::Polygon(polygon_a), Shape::Polygon(polygon_b)) =
                        (&body_a.shape, &body_b.shape)
                    else {
                        return;
                    };

                    let component_a = WorldComponent {
                        component: &polygon_a.components()[index_a],
                        transform: body_a.transform(),
                    };
                    let component_b = WorldComponent {
                        component: &polygon_b.components()[index_b],
                        transform: body_b.transform(),
                    };

                    match gjk(&component_a, &component_b) {
                        GjkResult::Intersecting(simplex) => {
                            epa(&simplex, &component_a, &component_b)
                        }
                        GjkResult::Separated(_) => None,
                    }
                };

                if let Some(contact) = contact {
                    self.apply_contact(a, b, &contact);
                }
            }
        }
    }

    /// Resolves one contact and records the collision notification
    fn apply_contact(&mut self, a: usize, b: usize, contact: &Contact) {
        let Some((body_a, body_b)) = pair_mut(&mut self.bodies, a, b) else {
            return;
        };
        let impact = resolve_contact(body_a, body_b, contact);
        let (id_a, id_b) = (body_a.id, body_b.id);
        self.events.push(CollisionEvent {
            body_a: id_a,
            body_b: id_b,
            impact,
        });
    }
}

/// Inflates a point-shape contact outward by a circle radius
fn inflate(mut contact: Contact, radius: f32) -> Contact {
    contact.point_a += contact.normal * radius;
    contact.distance -= radius;
    contact
}

/// Mutably borrows two distinct body slots at once
fn pair_mut(bodies: &mut [Option<Body>], a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
    if a == b {
        return None;
    }
    if a < b {
        let (left, right) = bodies.split_at_mut(b);
        match (left[a].as_mut(), right[0].as_mut()) {
            (Some(body_a), Some(body_b)) => Some((body_a, body_b)),
            _ => None,
        }
    } else {
        let (left, right) = bodies.split_at_mut(a);
        match (right[0].as_mut(), left[b].as_mut()) {
            (Some(body_a), Some(body_b)) => Some((body_a, body_b)),
            _ => None,
        }
    }
}
