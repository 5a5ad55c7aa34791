mod broad_phase;
mod dynamic_tree;
pub mod narrow_phase;
mod response;
pub mod sat;

pub use self::broad_phase::{BruteForceIndex, SpatialIndex};
pub use self::dynamic_tree::DynamicTree;
pub use self::response::Response;
pub use self::sat::Contact;
