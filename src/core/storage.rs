use std::collections::BTreeMap;

use crate::bodies::Body;
use crate::core::BodyHandle;
use crate::error::CollisionError;
use crate::Result;

/// Resident bodies keyed by handle.
///
/// Ordered by handle so that every pass over the bodies, and therefore the
/// order of collision callbacks, is reproducible. Handles are never reused.
#[derive(Debug)]
pub struct BodyStorage {
    bodies: BTreeMap<BodyHandle, Body>,
    next_id: u32,
}

impl Default for BodyStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyStorage {
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            next_id: 1, // 0 is never handed out
        }
    }

    /// Stores a body under a fresh handle, letting `stamp` see the handle first
    pub fn add_with(&mut self, mut body: Body, stamp: impl FnOnce(&mut Body, BodyHandle)) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        stamp(&mut body, handle);
        self.bodies.insert(handle, body);
        handle
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Result<Body> {
        self.bodies.remove(&handle).ok_or_else(|| not_found(handle))
    }

    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get(&handle).ok_or_else(|| not_found(handle))
    }

    /// Gets a mutable reference to a body by its handle, returning an error if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_mut(&handle).ok_or_else(|| not_found(handle))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// All handles in ascending order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.bodies.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter().map(|(handle, body)| (*handle, body))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> + '_ {
        self.bodies.iter_mut().map(|(handle, body)| (*handle, body))
    }
}

fn not_found(handle: BodyHandle) -> CollisionError {
    CollisionError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector;

    fn point() -> Body {
        Body::new_point(Vector::zeros()).unwrap()
    }

    #[test]
    fn handles_are_ascending_and_never_reused() {
        let mut storage = BodyStorage::new();
        let a = storage.add_with(point(), |_, _| {});
        let b = storage.add_with(point(), |_, _| {});
        assert_eq!(a, BodyHandle(1));
        assert_eq!(storage.handles(), vec![a, b]);

        storage.remove(a).unwrap();
        let c = storage.add_with(point(), |_, _| {});
        assert_eq!(c, BodyHandle(3));
        assert_eq!(storage.handles(), vec![b, c]);
    }

    #[test]
    fn missing_handle_is_reported() {
        let mut storage = BodyStorage::new();
        let a = storage.add_with(point(), |_, _| {});
        storage.remove(a).unwrap();

        assert!(matches!(storage.get_body(a), Err(CollisionError::ResourceNotFound(_))));
        assert!(matches!(storage.remove(a), Err(CollisionError::ResourceNotFound(_))));
        assert!(storage.is_empty());
    }
}
