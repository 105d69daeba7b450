//! Turn restriction index.
//!
//! Restrictions are bucketed by (from-node, via-node). A bucket either
//! holds a single mandatory ("only") exit, which is authoritative, or a
//! list of explicitly prohibited exits.
//!
//! Conflict rules on insertion:
//! - a bucket that already holds an "only" entry ignores further inserts
//!   (the mandatory turn cannot be overridden);
//! - inserting an "only" entry clears all prior entries in its bucket.
//!
//! The index stores whatever node ids it is given; it has no notion of a
//! valid node range. Range filtering is the contractor's job.

use rustc_hash::FxHashMap;

use crate::NodeId;

/// A single turn restriction anchored at `via_node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRestriction {
    pub from_node: NodeId,
    pub via_node: NodeId,
    pub to_node: NodeId,
    /// Mandatory turn: arriving via (from, via), `to_node` is the only
    /// permitted exit.
    pub is_only: bool,
}

type RestrictionTarget = (NodeId, bool);

/// Answers "is the turn u -> v -> w permitted?" in O(1) amortized.
#[derive(Debug, Default)]
pub struct RestrictionIndex {
    buckets: FxHashMap<(NodeId, NodeId), Vec<RestrictionTarget>>,
}

impl RestrictionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_restrictions(restrictions: &[TurnRestriction]) -> Self {
        let mut index = Self::new();
        for restriction in restrictions {
            index.insert(restriction);
        }
        index
    }

    pub fn insert(&mut self, restriction: &TurnRestriction) {
        let bucket = self
            .buckets
            .entry((restriction.from_node, restriction.via_node))
            .or_default();

        // An existing "only" entry is always the sole entry in its bucket.
        if bucket.first().map(|&(_, is_only)| is_only).unwrap_or(false) {
            return;
        }
        if restriction.is_only {
            bucket.clear();
        }
        bucket.push((restriction.to_node, restriction.is_only));
    }

    /// Whether the turn u -> v -> w is prohibited.
    ///
    /// No bucket for (u, v) means the turn is permitted. An "only" entry
    /// permits exactly its own exit and prohibits every other one; plain
    /// entries are explicit prohibitions.
    pub fn is_prohibited(&self, u: NodeId, v: NodeId, w: NodeId) -> bool {
        let Some(bucket) = self.buckets.get(&(u, v)) else {
            return false;
        };
        if let Some(&(only_to, true)) = bucket.first() {
            return only_to != w;
        }
        bucket.iter().any(|&(to, _)| to == w)
    }

    /// Number of stored restriction entries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
