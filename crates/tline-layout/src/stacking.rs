#![forbid(unsafe_code)]

//! Per-group item stacking.
//!
//! [`stack_items`] turns a [`StackInput`] snapshot into pixel geometry for
//! every item that intersects the canvas, plus a height and top offset for
//! every group.
//!
//! # Algorithm
//!
//! 1. Substitute the interaction override (if any) for the stored range and
//!    group of the item being dragged or resized.
//! 2. Drop items that do not intersect `[canvas_start, canvas_end]`.
//! 3. Bucket the rest by group in group order; items naming an unknown group
//!    are dropped.
//! 4. With stacking off every item sits in slot 0.
//! 5. With stacking on, items are sorted by start ascending then duration
//!    descending, and each takes the lowest slot whose occupants it does not
//!    collide with.
//! 6. Group height is `max(1, slots) * row_height`; tops are running sums.
//!
//! # Invariants
//!
//! 1. Two items of one group that collide (see [`collides`]) never share a
//!    slot while stacking is enabled.
//! 2. Identical inputs produce identical output.
//! 3. Every emitted width is at least [`MIN_ITEM_WIDTH_PX`].
//!
//! # Failure Modes
//!
//! None. Inverted and zero-length items are clamped, unknown groups are
//! skipped, and an empty group list yields a zero-height layout.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tline_core::{Group, GroupId, Item, ItemId, Millis, TimeAxis};

/// Horizontal tolerance (px) used by the collision test.
pub const STACK_EPSILON_PX: f64 = 0.001;

/// Narrowest width an item is drawn with.
pub const MIN_ITEM_WIDTH_PX: f64 = 1.0;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Live replacement values for the item under interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOverride {
    pub item: ItemId,
    pub start: Millis,
    pub end: Millis,
    pub group: GroupId,
}

impl InteractionOverride {
    fn apply(&self, item: &Item) -> Item {
        if item.id != self.item {
            return *item;
        }
        Item {
            id: item.id,
            group: self.group,
            start: self.start,
            end: self.end,
        }
    }
}

/// Snapshot of everything one stacking pass reads.
#[derive(Debug, Clone, Copy)]
pub struct StackInput<'a> {
    pub items: &'a [Item],
    pub groups: &'a [Group],
    pub canvas_start: Millis,
    pub canvas_end: Millis,
    pub canvas_width: f64,
    pub row_height: f64,
    pub item_height_ratio: f64,
    pub stacking: bool,
    pub interaction: Option<InteractionOverride>,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Pixel geometry of one item for the current pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemDimensions {
    pub item: ItemId,
    pub group: GroupId,
    pub group_index: usize,
    pub left: f64,
    pub width: f64,
    pub top: f64,
    pub height: f64,
    pub stack_slot: u32,
}

impl ItemDimensions {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.top + self.height
    }
}

/// Vertical placement of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupLayout {
    pub group: GroupId,
    pub top: f64,
    pub height: f64,
    pub slots: u32,
}

/// Result of one stacking pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StackLayout {
    pub items: Vec<ItemDimensions>,
    pub groups: Vec<GroupLayout>,
    pub total_height: f64,
}

impl StackLayout {
    /// Geometry of `item`, if it was laid out.
    #[must_use]
    pub fn dimensions(&self, item: ItemId) -> Option<&ItemDimensions> {
        self.items.iter().find(|d| d.item == item)
    }

    /// Top offset of every group, in group order.
    #[must_use]
    pub fn group_tops(&self) -> Vec<f64> {
        self.groups.iter().map(|g| g.top).collect()
    }

    /// Height of every group, in group order.
    #[must_use]
    pub fn group_heights(&self) -> Vec<f64> {
        self.groups.iter().map(|g| g.height).collect()
    }

    /// Topmost item under a canvas point. Later items paint over earlier
    /// ones, so the scan runs from the end.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&ItemDimensions> {
        self.items.iter().rev().find(|d| d.contains(x, y))
    }

    /// Group row under a canvas y-coordinate.
    #[must_use]
    pub fn group_at(&self, y: f64) -> Option<usize> {
        if y < 0.0 || y >= self.total_height {
            return None;
        }
        group_index_at(&self.group_tops(), y)
    }
}

/// Index of the last group whose top is `<= y`, scanning from the end.
///
/// Returns `None` for an empty slice; a `y` above the first top maps to
/// group 0.
#[must_use]
pub fn group_index_at(group_tops: &[f64], y: f64) -> Option<usize> {
    if group_tops.is_empty() {
        return None;
    }
    Some(
        group_tops
            .iter()
            .rposition(|&top| top <= y)
            .unwrap_or(0),
    )
}

/// Collision test between two horizontal pixel ranges.
///
/// Ranges that merely touch (within [`STACK_EPSILON_PX`]) do not collide.
#[inline]
#[must_use]
pub fn collides(a_left: f64, a_width: f64, b_left: f64, b_width: f64) -> bool {
    a_left + STACK_EPSILON_PX < b_left + b_width && b_left + STACK_EPSILON_PX < a_left + a_width
}

// ---------------------------------------------------------------------------
// Stacking pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Placement {
    item: ItemId,
    start: Millis,
    duration: Millis,
    left: f64,
    width: f64,
    slot: u32,
}

/// Run one full stacking pass.
#[must_use]
pub fn stack_items(input: StackInput<'_>) -> StackLayout {
    let span = tracing::debug_span!(
        "layout.stack",
        items = input.items.len(),
        groups = input.groups.len(),
        stacking = input.stacking,
        placed = tracing::field::Empty,
    )
    .entered();

    let axis = TimeAxis::new(input.canvas_start, input.canvas_end, input.canvas_width);

    let mut group_lookup: FxHashMap<GroupId, usize> = FxHashMap::default();
    for (index, group) in input.groups.iter().enumerate() {
        group_lookup.entry(group.id).or_insert(index);
    }

    let mut buckets: Vec<Vec<Placement>> = vec![Vec::new(); input.groups.len()];
    for stored in input.items {
        let item = match &input.interaction {
            Some(over) => over.apply(stored),
            None => *stored,
        };
        let end = item.end.max(item.start);
        if item.start > input.canvas_end || end < input.canvas_start {
            continue;
        }
        let Some(&group_index) = group_lookup.get(&item.group) else {
            tracing::trace!(
                target: "tline.layout",
                item = %item.id,
                group = %item.group,
                "item references unknown group; skipped"
            );
            continue;
        };
        if item.is_degenerate() {
            tracing::trace!(
                target: "tline.layout",
                item = %item.id,
                start = item.start,
                end = item.end,
                "degenerate item clamped to minimum width"
            );
        }
        buckets[group_index].push(Placement {
            item: item.id,
            start: item.start,
            duration: item.duration(),
            left: axis.millis_to_pixel(item.start),
            width: axis.pixel_span(item.start, item.end).max(MIN_ITEM_WIDTH_PX),
            slot: 0,
        });
    }

    let row_height = input.row_height;
    let item_height = row_height * input.item_height_ratio;
    let inset = (row_height - item_height) / 2.0;

    let mut layout = StackLayout {
        items: Vec::with_capacity(buckets.iter().map(Vec::len).sum()),
        groups: Vec::with_capacity(input.groups.len()),
        total_height: 0.0,
    };
    let mut top = 0.0;
    for ((group_index, group), bucket) in input.groups.iter().enumerate().zip(buckets.iter_mut()) {
        let slots = if input.stacking {
            assign_slots(bucket)
        } else {
            u32::from(!bucket.is_empty())
        };
        let rows = slots.max(1);
        let height = f64::from(rows) * row_height;

        layout.items.extend(bucket.iter().map(|p| ItemDimensions {
            item: p.item,
            group: group.id,
            group_index,
            left: p.left,
            width: p.width,
            top: top + f64::from(p.slot) * row_height + inset,
            height: item_height,
            stack_slot: p.slot,
        }));
        layout.groups.push(GroupLayout {
            group: group.id,
            top,
            height,
            slots: rows,
        });
        top += height;
    }
    layout.total_height = top;

    span.record("placed", layout.items.len());
    layout
}

/// Sort a bucket deterministically and assign each entry the lowest slot it
/// does not collide in. Returns the number of slots used.
fn assign_slots(bucket: &mut [Placement]) -> u32 {
    bucket.sort_by_key(|p| (p.start, Reverse(p.duration)));

    // Entries arrive with non-decreasing `left`, so a slot is free for the
    // next entry iff the furthest right edge placed in it does not reach past
    // the entry's left edge.
    let mut slot_ends: Vec<f64> = Vec::new();
    for placement in bucket.iter_mut() {
        let free = slot_ends
            .iter()
            .position(|&end| end <= placement.left + STACK_EPSILON_PX);
        let slot = match free {
            Some(slot) => slot,
            None => {
                slot_ends.push(f64::NEG_INFINITY);
                slot_ends.len() - 1
            }
        };
        let right = placement.left + placement.width;
        slot_ends[slot] = slot_ends[slot].max(right);
        placement.slot = slot as u32;
    }
    slot_ends.len() as u32
}
