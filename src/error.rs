use thiserror::Error;

/// Unified error type for physics operations.
///
/// Construction of physics primitives is the only fallible surface of the
/// engine; the simulation loop itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// A polygon was given too few vertices to enclose any area.
    #[error("invalid shape: a polygon requires at least 3 vertices, got {vertices}")]
    InvalidShape {
        /// Number of vertices that were provided
        vertices: usize,
    },
}
