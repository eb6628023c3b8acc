//! Side table for items detached from the tree.
//!
//! Removed sections and items can be parked under a caller-chosen id and
//! pulled back into a later edit. Unknown ids are a valid state, not an
//! error: draining one yields nothing.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::Item;

/// Caller-chosen key for one stash bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StashId(String);

impl StashId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StashId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StashId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for StashId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Detached item buckets, keyed by [`StashId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Stash<W> {
    buckets: FxHashMap<StashId, Vec<Item<W>>>,
}

impl<W> Stash<W> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: FxHashMap::default(),
        }
    }

    /// Append items under the given id, creating the bucket on first use.
    /// Stashing an empty batch still creates the bucket.
    pub fn stash(&mut self, id: StashId, items: Vec<Item<W>>) {
        self.buckets.entry(id).or_default().extend(items);
    }

    /// Remove and return the bucket's items in stash order. Unknown ids
    /// yield an empty batch.
    pub fn unstash(&mut self, id: &StashId) -> Vec<Item<W>> {
        self.buckets.remove(id).unwrap_or_default()
    }

    /// Items currently parked under the id, without draining them.
    #[must_use]
    pub fn peek(&self, id: &StashId) -> Option<&[Item<W>]> {
        self.buckets.get(id).map(Vec::as_slice)
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<W> Default for Stash<W> {
    fn default() -> Self {
        Self::new()
    }
}
