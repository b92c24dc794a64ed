#![forbid(unsafe_code)]

//! Host-owned timeline data: groups (rows) and time-ranged items.
//!
//! The engine never mutates these records. Layout reads them as a snapshot and
//! interactions only ever *propose* new values through commit effects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

/// Stable identifier for a group (row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u64);

impl GroupId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Stable identifier for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

/// A row of the timeline. Its index in the host's ordered slice is its
/// order-position, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(default)]
    pub title: String,
}

impl Group {
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(id),
            title: title.into(),
        }
    }
}

/// A time-ranged entry placed inside one group.
///
/// `end <= start` is tolerated: layout clamps such items to a minimum width
/// instead of rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub group: GroupId,
    pub start: Millis,
    pub end: Millis,
}

impl Item {
    #[must_use]
    pub const fn new(id: u64, group: u64, start: Millis, end: Millis) -> Self {
        Self {
            id: ItemId::new(id),
            group: GroupId::new(group),
            start,
            end,
        }
    }

    /// Signed duration (`end - start`); negative for inverted items.
    #[must_use]
    pub const fn duration(&self) -> Millis {
        self.end.saturating_sub(self.start)
    }

    /// Whether `end <= start`.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the closed range `[start, end]` touches `[from, to]`.
    #[must_use]
    pub const fn intersects(&self, from: Millis, to: Millis) -> bool {
        self.start <= to && self.end >= from
    }
}

/// Index of `id` inside an ordered group slice.
#[must_use]
pub fn group_index(groups: &[Group], id: GroupId) -> Option<usize> {
    groups.iter().position(|g| g.id == id)
}
