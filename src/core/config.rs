use crate::collision::{BruteForceIndex, DynamicTree, SpatialIndex};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Which spatial index backs the broad phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum IndexKind {
    /// Incrementally balanced AABB tree
    #[default]
    DynamicTree,

    /// Flat list scanned on every search, useful as a reference
    BruteForce,
}

impl IndexKind {
    /// Creates an empty index of this kind
    pub fn build(self) -> Box<dyn SpatialIndex> {
        match self {
            IndexKind::DynamicTree => Box::new(DynamicTree::new()),
            IndexKind::BruteForce => Box::new(BruteForceIndex::new()),
        }
    }
}

/// Configuration parameters for a collision system
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SystemConfig {
    /// Padding given to bodies created without an explicit one.
    ///
    /// A padded body is only reinserted into the index once its bounding box
    /// leaves the padded box stored there.
    pub padding: f32,

    /// The spatial index used for the broad phase
    pub index: IndexKind,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            padding: 0.0,
            index: IndexKind::default(),
        }
    }
}
