//! Ordered playlist as an arena-backed doubly linked list.
//!
//! Nodes live in a `Vec` and point at each other through slot indices, so
//! splicing stays O(1) without aliased references. Freed slots are reused.

use crate::model::TrackId;

/// A slot in the node arena.
#[derive(Debug, Clone)]
struct Node {
    id: TrackId,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Ordered sequence of track identities defining play order.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    /// Node arena (None = free slot)
    nodes: Vec<Option<Node>>,
    /// Free slot indices available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl Playlist {
    /// Create an empty playlist.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add at the tail. Returns the new item's index.
    pub fn append(&mut self, id: TrackId) -> usize {
        let slot = self.alloc(id);
        self.link_after(self.tail, slot);
        self.len - 1
    }

    /// Insert so that the item ends up at `index`. `index == len` appends.
    ///
    /// Returns false if `index > len`.
    pub fn insert_at(&mut self, index: usize, id: TrackId) -> bool {
        if index > self.len {
            return false;
        }
        if index == self.len {
            self.append(id);
            return true;
        }
        let Some(target) = self.slot_at(index) else {
            return false;
        };
        let prev = self.node(target).prev;
        let slot = self.alloc(id);
        self.link_after(prev, slot);
        true
    }

    /// Unlink the item at `index` and return its identity.
    pub fn remove_at(&mut self, index: usize) -> Option<TrackId> {
        let slot = self.slot_at(index)?;
        Some(self.unlink(slot))
    }

    /// Move an item from `from` to `to`.
    ///
    /// The item is removed first and `to` is then read against the shortened
    /// list: moving forward lands one slot earlier than `to`. With
    /// `[A, B, C, D]`, `move_to(0, 2)` gives `[B, A, C, D]`.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if from >= self.len || to >= self.len {
            return false;
        }
        if from == to {
            return true;
        }
        let Some(id) = self.remove_at(from) else {
            return false;
        };
        let to = if from < to { to - 1 } else { to };
        self.insert_at(to, id)
    }

    /// Reverse in place by swapping every node's links.
    pub fn reverse(&mut self) {
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = self.node_mut(slot);
            std::mem::swap(&mut node.prev, &mut node.next);
            // old `next` is now `prev`
            cursor = node.prev;
        }
        std::mem::swap(&mut self.head, &mut self.tail);
    }

    /// Identity at `index`.
    pub fn get(&self, index: usize) -> Option<&TrackId> {
        self.slot_at(index).map(|slot| &self.node(slot).id)
    }

    /// Index of the first item with identity `id`.
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.iter().position(|item| item == id)
    }

    /// Iterate identities from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            playlist: self,
            cursor: self.head,
        }
    }

    /// Ordered snapshot, independent of the live list.
    pub fn to_vec(&self) -> Vec<TrackId> {
        self.iter().cloned().collect()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Check link symmetry and the cached length.
    ///
    /// Walks forward from head and backward from tail; both walks must see
    /// exactly `len` nodes in mirrored order.
    pub fn is_consistent(&self) -> bool {
        let mut forward = Vec::with_capacity(self.len);
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let Some(node) = self.nodes.get(slot).and_then(Option::as_ref) else {
                return false;
            };
            if node.prev != prev || forward.len() > self.len {
                return false;
            }
            forward.push(slot);
            prev = Some(slot);
            cursor = node.next;
        }
        if prev != self.tail || forward.len() != self.len {
            return false;
        }

        let mut backward = Vec::with_capacity(self.len);
        let mut cursor = self.tail;
        while let Some(slot) = cursor {
            if backward.len() > self.len {
                return false;
            }
            let Some(node) = self.nodes.get(slot).and_then(Option::as_ref) else {
                return false;
            };
            backward.push(slot);
            cursor = node.prev;
        }
        backward.reverse();
        forward == backward
    }

    // ------------------------------------------------------------------
    // Arena helpers
    // ------------------------------------------------------------------

    fn alloc(&mut self, id: TrackId) -> usize {
        let node = Node {
            id,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// Splice `slot` in after `prev` (`None` = at the head).
    fn link_after(&mut self, prev: Option<usize>, slot: usize) {
        let next = match prev {
            Some(p) => self.node(p).next,
            None => self.head,
        };
        {
            let node = self.node_mut(slot);
            node.prev = prev;
            node.next = next;
        }
        match prev {
            Some(p) => self.node_mut(p).next = Some(slot),
            None => self.head = Some(slot),
        }
        match next {
            Some(n) => self.node_mut(n).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.len += 1;
    }

    fn unlink(&mut self, slot: usize) -> TrackId {
        let Node { id, prev, next } = self.nodes[slot]
            .take()
            .unwrap_or_else(|| unreachable!("unlink of free slot {slot}"));
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
        self.free.push(slot);
        self.len -= 1;
        id
    }

    /// Walk to `index` from whichever end is closer.
    fn slot_at(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        if index < self.len / 2 {
            let mut cursor = self.head;
            for _ in 0..index {
                cursor = cursor.and_then(|slot| self.node(slot).next);
            }
            cursor
        } else {
            let mut cursor = self.tail;
            for _ in 0..(self.len - index - 1) {
                cursor = cursor.and_then(|slot| self.node(slot).prev);
            }
            cursor
        }
    }

    fn node(&self, slot: usize) -> &Node {
        self.nodes[slot]
            .as_ref()
            .unwrap_or_else(|| unreachable!("dangling playlist link {slot}"))
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node {
        self.nodes[slot]
            .as_mut()
            .unwrap_or_else(|| unreachable!("dangling playlist link {slot}"))
    }
}

/// Head-to-tail iterator over a [`Playlist`].
pub struct Iter<'a> {
    playlist: &'a Playlist,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TrackId;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.playlist.node(slot);
        self.cursor = node.next;
        Some(&node.id)
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a TrackId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<TrackId> for Playlist {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        let mut playlist = Playlist::new();
        for id in iter {
            playlist.append(id);
        }
        playlist
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Append,
        Insert(usize),
        Remove(usize),
        Move(usize, usize),
        Reverse,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Append),
            2 => (0usize..12).prop_map(Op::Insert),
            2 => (0usize..12).prop_map(Op::Remove),
            2 => (0usize..12, 0usize..12).prop_map(|(a, b)| Op::Move(a, b)),
            1 => Just(Op::Reverse),
        ]
    }

    proptest! {
        /// The linked list behaves like a Vec under the same operations
        #[test]
        fn matches_vec_model(ops in prop::collection::vec(op(), 0..60)) {
            let mut playlist = Playlist::new();
            let mut model: Vec<TrackId> = Vec::new();
            let mut counter = 0u32;

            for op in ops {
                match op {
                    Op::Append => {
                        let id = TrackId::from(format!("t{counter}"));
                        counter += 1;
                        playlist.append(id.clone());
                        model.push(id);
                    }
                    Op::Insert(i) => {
                        let id = TrackId::from(format!("t{counter}"));
                        counter += 1;
                        let ok = playlist.insert_at(i, id.clone());
                        prop_assert_eq!(ok, i <= model.len());
                        if ok {
                            model.insert(i, id);
                        }
                    }
                    Op::Remove(i) => {
                        let removed = playlist.remove_at(i);
                        let expected = (i < model.len()).then(|| model.remove(i));
                        prop_assert_eq!(removed, expected);
                    }
                    Op::Move(from, to) => {
                        let ok = playlist.move_to(from, to);
                        let valid = from < model.len() && to < model.len();
                        prop_assert_eq!(ok, valid);
                        if valid && from != to {
                            let item = model.remove(from);
                            let to = if from < to { to - 1 } else { to };
                            model.insert(to, item);
                        }
                    }
                    Op::Reverse => {
                        playlist.reverse();
                        model.reverse();
                    }
                }
                prop_assert!(playlist.is_consistent());
                prop_assert_eq!(playlist.len(), model.len());
                prop_assert_eq!(playlist.to_vec(), model.clone());
            }
        }
    }
}
