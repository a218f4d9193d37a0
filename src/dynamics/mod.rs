mod body;
mod integrator;

pub use body::{Body, BodyDesc};
pub use integrator::{integrate, Direction};
