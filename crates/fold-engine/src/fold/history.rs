//! Ordered fold history and unfold legality.

use serde::{Deserialize, Serialize};

use super::types::{FoldId, FoldRecord, Seam, UnfoldBlocker};
use crate::model::GridCoord;

/// Fold records ordered by id, plus the id allocator.
///
/// Invariants:
/// - `records` is strictly increasing by id.
/// - `next_id` is greater than every id ever handed out; ids are never recycled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoldHistory {
    records: Vec<FoldRecord>,
    next_id: u32,
}

impl Default for FoldHistory {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl FoldHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next fold will receive.
    #[inline]
    pub fn peek_next_id(&self) -> FoldId {
        FoldId(self.next_id)
    }

    /// Append a record whose id was obtained from `peek_next_id`.
    pub(crate) fn push(&mut self, record: FoldRecord) {
        debug_assert!(record.id.0 >= self.next_id);
        self.next_id = record.id.0 + 1;
        self.records.push(record);
    }

    pub fn get(&self, id: FoldId) -> Option<&FoldRecord> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.records[i])
    }

    #[inline]
    pub fn contains(&self, id: FoldId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a record, keeping the order of the rest.
    pub(crate) fn remove(&mut self, id: FoldId) -> Option<FoldRecord> {
        let i = self.records.binary_search_by_key(&id, |r| r.id).ok()?;
        Some(self.records.remove(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoldRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = FoldId> + '_ {
        self.records.iter().map(|r| r.id)
    }

    pub fn seams(&self) -> impl Iterator<Item = &Seam> {
        self.records.iter().map(|r| &r.seam)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&FoldRecord> {
        self.records.last()
    }

    /// Records with an id strictly greater than `id`, oldest first.
    pub fn later_than(&self, id: FoldId) -> impl Iterator<Item = &FoldRecord> {
        let start = self.records.partition_point(|r| r.id <= id);
        self.records[start..].iter()
    }

    /// First reason `id` cannot be unfolded right now, or None when it can.
    ///
    /// The most recent overlapping fold is reported, since it must be reversed first.
    /// Returns None for unknown ids; callers check existence separately.
    pub fn blocker(&self, id: FoldId, player_cell: Option<GridCoord>) -> Option<UnfoldBlocker> {
        let record = self.get(id)?;
        if let Some(later) = self.later_than(id).filter(|l| record.overlaps(l)).last() {
            return Some(UnfoldBlocker::LaterFold(later.id));
        }
        match player_cell {
            Some(cell) if record.region().contains(&cell) => {
                Some(UnfoldBlocker::PlayerInTheWay(cell))
            }
            _ => None,
        }
    }

    /// Replace the records with `other`'s; the id counter never moves backwards.
    pub(crate) fn replace_with(&mut self, other: FoldHistory) {
        let next_id = self.next_id.max(other.next_id);
        self.records = other.records;
        self.next_id = next_id;
    }

    /// Ids strictly increasing and below the allocator.
    pub fn is_well_ordered(&self) -> bool {
        let increasing = self.records.windows(2).all(|w| w[0].id < w[1].id);
        let below = self.records.last().is_none_or(|r| r.id.0 < self.next_id);
        increasing && below
    }
}
