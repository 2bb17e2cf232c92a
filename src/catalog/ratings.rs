//! Rating index: an unbalanced binary search tree of rating buckets.
//!
//! Each node is keyed by a rating and holds the identities filed under it in
//! insertion order. Nodes are never rebalanced or removed; a bucket emptied
//! by [`RatingIndex::remove`] stays in the tree and simply matches nothing.

use crate::model::{MAX_RATING, MIN_RATING, Rating, TrackId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
struct RatingNode {
    rating: Rating,
    bucket: Vec<TrackId>,
    left: Option<Box<RatingNode>>,
    right: Option<Box<RatingNode>>,
}

impl RatingNode {
    fn new(rating: Rating) -> Self {
        Self {
            rating,
            bucket: Vec::new(),
            left: None,
            right: None,
        }
    }
}

/// Secondary index from rating to track identities.
#[derive(Debug, Clone, Default)]
pub struct RatingIndex {
    root: Option<Box<RatingNode>>,
    /// Identity -> rating it is currently filed under
    ratings: HashMap<TrackId, Rating>,
}

impl RatingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rated identities.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// File `id` under `rating`, moving it out of any previous bucket.
    pub fn insert(&mut self, id: TrackId, rating: Rating) {
        self.remove(&id);

        self.ratings.insert(id.clone(), rating);

        let mut slot = &mut self.root;
        while let Some(node) = slot {
            match rating.cmp(&node.rating) {
                Ordering::Equal => {
                    node.bucket.push(id);
                    return;
                }
                Ordering::Less => slot = &mut node.left,
                Ordering::Greater => slot = &mut node.right,
            }
        }
        let mut node = RatingNode::new(rating);
        node.bucket.push(id);
        *slot = Some(Box::new(node));
    }

    /// Identities filed under exactly `rating`.
    pub fn search(&self, rating: Rating) -> Vec<TrackId> {
        self.find(rating)
            .map(|node| node.bucket.clone())
            .unwrap_or_default()
    }

    /// Drop `id` from its bucket. The node itself stays.
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let Some(rating) = self.ratings.remove(id) else {
            return false;
        };
        if let Some(node) = self.find_mut(rating) {
            node.bucket.retain(|other| other != id);
        }
        true
    }

    pub fn rating_of(&self, id: &TrackId) -> Option<Rating> {
        self.ratings.get(id).copied()
    }

    /// Every rated identity with its rating.
    pub fn ratings(&self) -> &HashMap<TrackId, Rating> {
        &self.ratings
    }

    /// In-order traversal: `(rating, bucket)` in ascending rating order.
    ///
    /// Lazily emptied nodes are included with an empty bucket.
    pub fn buckets(&self) -> Vec<(Rating, &[TrackId])> {
        let mut out = Vec::new();
        let mut stack: Vec<&RatingNode> = Vec::new();
        let mut cursor = self.root.as_deref();
        while cursor.is_some() || !stack.is_empty() {
            while let Some(node) = cursor {
                stack.push(node);
                cursor = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                out.push((node.rating, node.bucket.as_slice()));
                cursor = node.right.as_deref();
            }
        }
        out
    }

    /// Bucket sizes for every rating 1-5, zero for ratings never seen.
    pub fn distribution(&self) -> BTreeMap<u8, usize> {
        let mut counts: BTreeMap<u8, usize> = (MIN_RATING..=MAX_RATING).map(|r| (r, 0)).collect();
        for (rating, bucket) in self.buckets() {
            counts.insert(rating.get(), bucket.len());
        }
        counts
    }

    /// Mean rating over rated identities, 0.0 when nothing is rated.
    pub fn average(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let total: u32 = self.ratings.values().map(|r| u32::from(r.get())).sum();
        f64::from(total) / self.ratings.len() as f64
    }

    /// Up to `count` identities, highest rating first.
    pub fn top_rated(&self, count: usize) -> Vec<TrackId> {
        self.buckets()
            .into_iter()
            .rev()
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .take(count)
            .collect()
    }

    /// Tree height, 0 for an empty tree.
    pub fn height(&self) -> usize {
        fn height(node: Option<&RatingNode>) -> usize {
            node.map_or(0, |n| {
                1 + height(n.left.as_deref()).max(height(n.right.as_deref()))
            })
        }
        height(self.root.as_deref())
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.ratings.clear();
    }

    fn find(&self, rating: Rating) -> Option<&RatingNode> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match rating.cmp(&node.rating) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    fn find_mut(&mut self, rating: Rating) -> Option<&mut RatingNode> {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            cursor = match rating.cmp(&node.rating) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }
}
