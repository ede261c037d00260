//! Assignment bookkeeping primitives.
//!
//! This library provides the pieces the incubator agent uses to reconcile
//! what it remembers against what the inventory reports. Key concepts:
//!
//! - **Remembered assignments**: which egg we last put into which incubator.
//! - **Pending queue**: unused eggs ordered by remaining distance.
//! - **Change detection**: deciding whether a new assignment list is worth
//!   writing back to disk.
//!
//! # Invariants
//!
//! - All comparisons are deterministic given the same inputs
//! - Queue ordering is stable for equal keys
//! - At most one assignment per incubator

use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};

use hatchery_id::{ItemId, SlotId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One remembered `incubator -> egg` pairing.
///
/// Field names match the usage file written by earlier versions of the bot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentRecord {
    #[serde(rename = "IncubatorId")]
    pub slot_id: SlotId,

    #[serde(rename = "PokemonId")]
    pub item_id: ItemId,
}

impl AssignmentRecord {
    /// Create a new record.
    pub fn new(slot_id: SlotId, item_id: ItemId) -> Self {
        Self { slot_id, item_id }
    }
}

/// How two assignment lists are compared before persisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeDetection {
    /// Compare as sets of `(slot, item)` pairs; reordering is not a change.
    #[default]
    Unordered,

    /// Compare as exact sequences; any reordering counts as a change.
    Ordered,
}

impl ChangeDetection {
    /// Parse from a config value (`unordered` / `ordered`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unordered" | "set" => Some(Self::Unordered),
            "ordered" | "sequence" => Some(Self::Ordered),
            _ => None,
        }
    }

    /// Config label for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unordered => "unordered",
            Self::Ordered => "ordered",
        }
    }
}

/// Returns true if `new` differs from `old` under the given mode.
pub fn assignments_changed(
    old: &[AssignmentRecord],
    new: &[AssignmentRecord],
    mode: ChangeDetection,
) -> bool {
    match mode {
        ChangeDetection::Ordered => old != new,
        ChangeDetection::Unordered => {
            let old: BTreeSet<_> = old.iter().collect();
            let new: BTreeSet<_> = new.iter().collect();
            old != new
        }
    }
}

/// Set difference between two assignment lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDiff {
    /// Present in the new list only.
    pub added: Vec<AssignmentRecord>,

    /// Present in the old list only.
    pub removed: Vec<AssignmentRecord>,
}

impl AssignmentDiff {
    /// Returns true if both lists hold the same pairs.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute which pairs were added and removed, sorted by slot.
pub fn diff_assignments(old: &[AssignmentRecord], new: &[AssignmentRecord]) -> AssignmentDiff {
    let old: BTreeSet<_> = old.iter().cloned().collect();
    let new: BTreeSet<_> = new.iter().cloned().collect();

    AssignmentDiff {
        added: new.difference(&old).cloned().collect(),
        removed: old.difference(&new).cloned().collect(),
    }
}

/// Return the slot IDs that appear in more than one record.
pub fn duplicate_slots(records: &[AssignmentRecord]) -> Vec<SlotId> {
    let mut seen = BTreeSet::new();
    let mut dupes = BTreeSet::new();
    for record in records {
        if !seen.insert(&record.slot_id) {
            dupes.insert(record.slot_id.clone());
        }
    }
    dupes.into_iter().collect()
}

/// An order-independent digest of an assignment set.
///
/// Used in logs to tell at a glance whether two runs saw the same pairs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssignmentDigest(String);

impl AssignmentDigest {
    /// Compute the digest of the pairs in `records`, ignoring order and duplicates.
    pub fn of(records: &[AssignmentRecord]) -> Self {
        let pairs: BTreeSet<_> = records.iter().collect();
        let mut hasher = Sha256::new();
        for record in pairs {
            hasher.update(record.slot_id.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(record.item_id.value().to_be_bytes());
        }
        let result = hasher.finalize();
        Self(format!("sha256:{}", hex::encode(&result[..8])))
    }

    /// Get the digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssignmentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which end of a [`PendingQueue`] to read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEnd {
    /// Smallest key.
    Head,
    /// Largest key.
    Tail,
}

/// Items ordered ascending by a numeric key, with peek and removal at either end.
#[derive(Debug, Clone)]
pub struct PendingQueue<T> {
    items: VecDeque<T>,
}

impl<T> PendingQueue<T> {
    /// Build a queue ordered ascending by `key`. Ties keep their input order.
    pub fn ordered_by<F>(items: impl IntoIterator<Item = T>, key: F) -> Self
    where
        F: Fn(&T) -> f64,
    {
        let mut items: Vec<T> = items.into_iter().collect();
        items.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
        Self {
            items: items.into(),
        }
    }

    /// Look at the item at `end` without removing it.
    pub fn peek(&self, end: QueueEnd) -> Option<&T> {
        match end {
            QueueEnd::Head => self.items.front(),
            QueueEnd::Tail => self.items.back(),
        }
    }

    /// Remove and return the item at `end`.
    pub fn take(&mut self, end: QueueEnd) -> Option<T> {
        match end {
            QueueEnd::Head => self.items.pop_front(),
            QueueEnd::Tail => self.items.pop_back(),
        }
    }

    /// Returns true if any queued item matches `pred`.
    pub fn any<F>(&self, pred: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        self.items.iter().any(pred)
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
