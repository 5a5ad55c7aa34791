pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;

/// Re-export common types for easier usage
pub use crate::core::{BodyHandle, RaycastHit, System, SystemConfig, SystemId, SystemRef};
pub use crate::bodies::{Body, BodyKind, BodyOptions};
pub use crate::collision::Response;
pub use crate::math::{Aabb, Vector};

/// Error types for the collision engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum CollisionError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Invalid geometry: {0}")]
        InvalidGeometry(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Body is already owned by system {0:?}")]
        ForeignBody(crate::core::SystemId),
    }
}

/// Result type for collision engine operations
pub type Result<T> = std::result::Result<T, error::CollisionError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
