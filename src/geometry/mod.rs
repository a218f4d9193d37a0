mod decompose;
mod shape;

pub use decompose::decompose;
pub use shape::{Circle, ConvexComponent, MassProperties, Polygon, Shape, ShapeType};
