#![forbid(unsafe_code)]

//! Events reported to the host and the time-change hook.
//!
//! Every state-changing call on [`Timeline`](crate::Timeline) returns the
//! events it produced, in order. Visible-range changes additionally go
//! through a [`TimeChangeHandler`], which decides whether (and with which
//! range) the change is applied.

use serde::{Deserialize, Serialize};
use tline_core::{GroupId, ItemId, Millis, ResizeEdge, TimeUnit, VisibleRange};

/// A requested visible-range change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeChange {
    pub visible_start: Millis,
    pub visible_end: Millis,
    pub unit: TimeUnit,
}

impl TimeChange {
    #[must_use]
    pub const fn range(&self) -> VisibleRange {
        VisibleRange::new(self.visible_start, self.visible_end)
    }
}

/// Hook consulted on every visible-range change.
///
/// Call `apply(start, end)` to accept the change (possibly with a different
/// range); not calling it leaves the viewport where it was. If `apply` is
/// called more than once the last call wins.
pub trait TimeChangeHandler {
    fn on_time_change(&mut self, change: TimeChange, apply: &mut dyn FnMut(Millis, Millis));
}

impl<F> TimeChangeHandler for F
where
    F: FnMut(TimeChange, &mut dyn FnMut(Millis, Millis)),
{
    fn on_time_change(&mut self, change: TimeChange, apply: &mut dyn FnMut(Millis, Millis)) {
        self(change, apply);
    }
}

/// Default handler: applies every change as requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyTimeChange;

impl TimeChangeHandler for ApplyTimeChange {
    fn on_time_change(&mut self, change: TimeChange, apply: &mut dyn FnMut(Millis, Millis)) {
        apply(change.visible_start, change.visible_end);
    }
}

/// Everything the timeline reports back to its host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimelineEvent {
    /// The time-change hook was consulted.
    TimeChange(TimeChange),
    DragPreview {
        item: ItemId,
        time: Millis,
        group: GroupId,
    },
    MoveCommit {
        item: ItemId,
        time: Millis,
        group: GroupId,
    },
    ResizePreview {
        item: ItemId,
        time: Millis,
        edge: ResizeEdge,
    },
    /// `delta` is the signed change of the moved edge.
    ResizeCommit {
        item: ItemId,
        time: Millis,
        edge: ResizeEdge,
        delta: Millis,
    },
    UnitChange {
        unit: TimeUnit,
    },
    ItemSelect {
        item: ItemId,
        time: Millis,
    },
    ItemClick {
        item: ItemId,
        time: Millis,
    },
    ItemDoubleClick {
        item: ItemId,
        time: Millis,
    },
    ItemContextMenu {
        item: ItemId,
        time: Millis,
    },
    ItemDeselect,
    CanvasClick {
        group: GroupId,
        time: Millis,
    },
    CanvasDoubleClick {
        group: GroupId,
        time: Millis,
    },
    CanvasContextMenu {
        group: GroupId,
        time: Millis,
    },
    /// The visible span changed.
    Zoom {
        visible_start: Millis,
        visible_end: Millis,
        unit: TimeUnit,
    },
    /// The canvas moved.
    BoundsChange {
        canvas_start: Millis,
        canvas_end: Millis,
    },
    CanvasResize {
        canvas_width: f64,
        visible_width: f64,
        height: f64,
    },
}
