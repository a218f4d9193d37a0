mod impulse;

pub use impulse::{circle_circle_contact, resolve_contact};
