pub mod config;
pub mod storage;
mod system;
mod raycast;

pub use self::config::{IndexKind, SystemConfig};
pub use self::storage::BodyStorage;
pub use self::system::System;
pub use self::raycast::RaycastHit;

use std::sync::atomic::{AtomicU32, Ordering};

/// A unique identifier for a body inside one collision system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyHandle(pub(crate) u32);

impl BodyHandle {
    /// The raw id of the handle
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// A process-unique identifier for a collision system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemId(u32);

impl SystemId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU32 = AtomicU32::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Non-owning back-reference from a body to the system that indexes it.
///
/// Resolve it through [`System::get_body`]; the system owns tree membership,
/// the reference never keeps anything alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemRef {
    /// The owning system
    pub system: SystemId,

    /// The body's handle inside that system
    pub handle: BodyHandle,
}
