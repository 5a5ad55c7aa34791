//! An incrementally balanced AABB tree for the broad phase.
//!
//! Leaves hold body boxes, branches hold the union of their children.
//! Insertion descends towards the sibling that grows the tree's perimeter the
//! least; every structural change refits the ancestors and rotates them back
//! into balance, so the height stays logarithmic under arbitrary
//! insert/remove churn.

use std::collections::HashMap;

use crate::collision::SpatialIndex;
use crate::core::BodyHandle;
use crate::math::Aabb;

//
// Internal types
//

#[derive(Clone, Copy, Debug)]
struct Node {
    aabb: Aabb,
    parent: Option<usize>,
    /// 0 for leaves
    height: u32,
    kind: NodeKind,
}

#[derive(Clone, Copy, Debug)]
enum NodeKind {
    Branch { left: usize, right: usize },
    Leaf { handle: BodyHandle },
    Free,
}

//
// Tree itself
//

/// Dynamic AABB tree keyed by body handle
#[derive(Clone, Debug, Default)]
pub struct DynamicTree {
    nodes: Vec<Node>,
    /// Indices of `Free` nodes ready for reuse
    free: Vec<usize>,
    root: Option<usize>,
    leaves: HashMap<BodyHandle, usize>,
}

impl DynamicTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height of the tree, 0 when empty or a single leaf
    pub fn height(&self) -> u32 {
        self.root.map_or(0, |root| self.nodes[root].height)
    }

    fn allocate(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.nodes[index] = node;
                index
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn deallocate(&mut self, index: usize) {
        self.nodes[index].kind = NodeKind::Free;
        self.nodes[index].parent = None;
        self.free.push(index);
    }

    fn children(&self, index: usize) -> Option<(usize, usize)> {
        match self.nodes[index].kind {
            NodeKind::Branch { left, right } => Some((left, right)),
            _ => None,
        }
    }

    fn set_children(&mut self, index: usize, left: usize, right: usize) {
        self.nodes[index].kind = NodeKind::Branch { left, right };
        self.nodes[left].parent = Some(index);
        self.nodes[right].parent = Some(index);
    }

    /// Points `parent` at `new_child` where it pointed at `old_child`,
    /// or makes `new_child` the root when there is no parent
    fn replace_child(&mut self, parent: Option<usize>, old_child: usize, new_child: usize) {
        match parent {
            Some(parent) => {
                if let Some((left, right)) = self.children(parent) {
                    if left == old_child {
                        self.nodes[parent].kind = NodeKind::Branch { left: new_child, right };
                    } else {
                        self.nodes[parent].kind = NodeKind::Branch { left, right: new_child };
                    }
                }
                self.nodes[new_child].parent = Some(parent);
            }
            None => {
                self.root = Some(new_child);
                self.nodes[new_child].parent = None;
            }
        }
    }

    /// Recomputes a branch's box and height from its children
    fn refit(&mut self, index: usize) {
        if let Some((left, right)) = self.children(index) {
            self.nodes[index].aabb = self.nodes[left].aabb.union(&self.nodes[right].aabb);
            self.nodes[index].height = 1 + self.nodes[left].height.max(self.nodes[right].height);
        }
    }

    fn insert_leaf(&mut self, leaf: usize) {
        let Some(root) = self.root else {
            self.root = Some(leaf);
            self.nodes[leaf].parent = None;
            return;
        };

        let leaf_aabb = self.nodes[leaf].aabb;

        // walk down to the cheapest sibling
        let mut index = root;
        while let Some((left, right)) = self.children(index) {
            let area = self.nodes[index].aabb.perimeter();
            let combined = self.nodes[index].aabb.union(&leaf_aabb).perimeter();

            // cost of pairing the leaf with this node
            let cost = 2.0 * combined;
            // growth pushed onto every ancestor when descending further
            let inheritance = 2.0 * (combined - area);

            let cost_left = self.descend_cost(left, &leaf_aabb) + inheritance;
            let cost_right = self.descend_cost(right, &leaf_aabb) + inheritance;

            if cost < cost_left && cost < cost_right {
                break;
            }
            index = if cost_left < cost_right { left } else { right };
        }

        let sibling = index;
        let old_parent = self.nodes[sibling].parent;
        let new_parent = self.allocate(Node {
            aabb: self.nodes[sibling].aabb.union(&leaf_aabb),
            parent: old_parent,
            height: self.nodes[sibling].height + 1,
            kind: NodeKind::Free,
        });

        self.replace_child(old_parent, sibling, new_parent);
        self.set_children(new_parent, sibling, leaf);
        self.fix_upwards(Some(new_parent));
    }

    fn descend_cost(&self, child: usize, leaf_aabb: &Aabb) -> f32 {
        let union = self.nodes[child].aabb.union(leaf_aabb).perimeter();
        match self.nodes[child].kind {
            NodeKind::Leaf { .. } => union,
            _ => union - self.nodes[child].aabb.perimeter(),
        }
    }

    fn remove_leaf(&mut self, leaf: usize) {
        if self.root == Some(leaf) {
            self.root = None;
            return;
        }

        let Some(parent) = self.nodes[leaf].parent else {
            return;
        };
        let Some((left, right)) = self.children(parent) else {
            return;
        };
        let sibling = if left == leaf { right } else { left };
        let grandparent = self.nodes[parent].parent;

        self.replace_child(grandparent, parent, sibling);
        self.deallocate(parent);
        self.nodes[leaf].parent = None;
        self.fix_upwards(grandparent);
    }

    /// Rebalances and refits every node from `start` up to the root
    fn fix_upwards(&mut self, start: Option<usize>) {
        let mut index = start;
        while let Some(current) = index {
            let current = self.balance(current);
            self.refit(current);
            index = self.nodes[current].parent;
        }
    }

    /// Rotates the taller grandchild of `a` up when its subtrees differ in
    /// height by more than one. Returns the index now at `a`'s position.
    fn balance(&mut self, a: usize) -> usize {
        let Some((b, c)) = self.children(a) else {
            return a;
        };

        let diff = self.nodes[c].height as i64 - self.nodes[b].height as i64;
        if diff > 1 {
            self.rotate_up(a, c, b)
        } else if diff < -1 {
            self.rotate_up(a, b, c)
        } else {
            a
        }
    }

    /// Lifts `tall` (a child of `a`) into `a`'s place. `a` keeps `short`
    /// and adopts the shorter grandchild, `tall` keeps the taller one.
    fn rotate_up(&mut self, a: usize, tall: usize, short: usize) -> usize {
        let Some((f, g)) = self.children(tall) else {
            return a;
        };

        let parent = self.nodes[a].parent;
        self.replace_child(parent, a, tall);

        let (keep, give) = if self.nodes[f].height > self.nodes[g].height {
            (f, g)
        } else {
            (g, f)
        };

        self.set_children(a, short, give);
        self.refit(a);
        self.set_children(tall, a, keep);
        self.refit(tall);
        tall
    }

    #[cfg(test)]
    fn check_structure(&self) {
        let Some(root) = self.root else {
            assert!(self.leaves.is_empty());
            return;
        };
        assert!(self.nodes[root].parent.is_none());

        let mut leaf_count = 0;
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let node = self.nodes[index];
            match node.kind {
                NodeKind::Branch { left, right } => {
                    assert_eq!(self.nodes[left].parent, Some(index));
                    assert_eq!(self.nodes[right].parent, Some(index));
                    assert!(node.aabb.contains_aabb(&self.nodes[left].aabb));
                    assert!(node.aabb.contains_aabb(&self.nodes[right].aabb));
                    let (hl, hr) = (self.nodes[left].height, self.nodes[right].height);
                    assert_eq!(node.height, 1 + hl.max(hr));
                    stack.push(left);
                    stack.push(right);
                }
                NodeKind::Leaf { handle } => {
                    assert_eq!(self.leaves.get(&handle), Some(&index));
                    assert_eq!(node.height, 0);
                    leaf_count += 1;
                }
                NodeKind::Free => panic!("free node {} reachable from the root", index),
            }
        }
        assert_eq!(leaf_count, self.leaves.len());
    }
}

impl SpatialIndex for DynamicTree {
    fn insert(&mut self, handle: BodyHandle, aabb: Aabb) {
        self.remove(handle);

        let leaf = self.allocate(Node {
            aabb,
            parent: None,
            height: 0,
            kind: NodeKind::Leaf { handle },
        });
        self.insert_leaf(leaf);
        self.leaves.insert(handle, leaf);
    }

    fn remove(&mut self, handle: BodyHandle) -> bool {
        match self.leaves.remove(&handle) {
            Some(leaf) => {
                self.remove_leaf(leaf);
                self.deallocate(leaf);
                true
            }
            None => false,
        }
    }

    fn get(&self, handle: BodyHandle) -> Option<Aabb> {
        self.leaves.get(&handle).map(|&leaf| self.nodes[leaf].aabb)
    }

    fn search(&self, aabb: &Aabb) -> Vec<BodyHandle> {
        let mut found = Vec::new();
        let mut stack: Vec<usize> = self.root.into_iter().collect();

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.aabb.intersects(aabb) {
                continue;
            }
            match node.kind {
                NodeKind::Branch { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
                NodeKind::Leaf { handle } => found.push(handle),
                NodeKind::Free => {}
            }
        }

        found
    }

    fn len(&self) -> usize {
        self.leaves.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.leaves.clear();
        self.root = None;
    }

    fn boxes(&self) -> Vec<Aabb> {
        let mut boxes = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.root.into_iter().collect();

        while let Some(index) = stack.pop() {
            boxes.push(self.nodes[index].aabb);
            if let Some((left, right)) = self.children(index) {
                stack.push(right);
                stack.push(left);
            }
        }

        boxes
    }
}
