use std::fmt::Debug;

use crate::core::BodyHandle;
use crate::math::Aabb;

/// Trait for the spatial indexes backing the broad phase.
///
/// Entries are identified by handle: inserting a handle that is already
/// resident replaces its box.
pub trait SpatialIndex: Debug + Send {
    /// Stores `aabb` for `handle`, replacing any previous entry
    fn insert(&mut self, handle: BodyHandle, aabb: Aabb);

    /// Removes the entry of `handle`, returning whether it was resident
    fn remove(&mut self, handle: BodyHandle) -> bool;

    /// The box currently stored for `handle`
    fn get(&self, handle: BodyHandle) -> Option<Aabb>;

    /// Every resident handle whose box overlaps `aabb`, in no particular order
    fn search(&self, aabb: &Aabb) -> Vec<BodyHandle>;

    /// Number of resident entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry
    fn clear(&mut self);

    /// All boxes the index keeps, internal nodes included
    fn boxes(&self) -> Vec<Aabb>;
}

/// Simple brute-force index, every search scans all entries
#[derive(Debug, Default)]
pub struct BruteForceIndex {
    /// The entries in insertion order
    entries: Vec<(BodyHandle, Aabb)>,
}

impl BruteForceIndex {
    /// Creates a new brute-force index
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl SpatialIndex for BruteForceIndex {
    fn insert(&mut self, handle: BodyHandle, aabb: Aabb) {
        match self.entries.iter_mut().find(|(h, _)| *h == handle) {
            Some(entry) => entry.1 = aabb,
            None => self.entries.push((handle, aabb)),
        }
    }

    fn remove(&mut self, handle: BodyHandle) -> bool {
        match self.entries.iter().position(|(h, _)| *h == handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    fn get(&self, handle: BodyHandle) -> Option<Aabb> {
        self.entries
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, aabb)| *aabb)
    }

    fn search(&self, aabb: &Aabb) -> Vec<BodyHandle> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.intersects(aabb))
            .map(|(handle, _)| *handle)
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn boxes(&self) -> Vec<Aabb> {
        self.entries.iter().map(|(_, aabb)| *aabb).collect()
    }
}
