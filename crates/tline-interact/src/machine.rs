#![forbid(unsafe_code)]

//! Drag/resize interaction machine.
//!
//! ```text
//! Idle -> Pressed -> Dragging -> Idle   (commit on release)
//!            |  \---> Resizing -> Idle  (commit unless the delta is zero)
//!            \------> Idle              (click on release)
//! ```
//!
//! [`step`] is the pure dispatch function: it takes the current state, one
//! pointer event and a snapshot of everything it may read, and returns the
//! next state plus the effects to deliver. [`InteractionMachine`] wraps it
//! with a transition counter for diagnostics.
//!
//! # Invariants
//!
//! 1. A gesture emits zero or more previews strictly before at most one
//!    commit; `Click` and commits are never both emitted for one gesture.
//! 2. The resize edge is fixed on the first movement frame.
//! 3. A committed resize never leaves the item shorter than one snap unit
//!    (before the validator runs).
//! 4. Validator results are previewed and committed verbatim.
//!
//! # Failure Modes
//!
//! Events that do not apply to the current state produce a `Noop` effect with
//! a reason and leave the state untouched; nothing here returns an error.

use serde::{Deserialize, Serialize};
use tline_core::{
    Group, GroupId, Item, ItemId, Millis, ResizeEdge, TimeAxis, TimelineConfig,
    model::group_index,
};
use tline_layout::{InteractionOverride, StackLayout, group_index_at};

use crate::snap::{snap_floor, snap_round};
use crate::validator::{MoveResizeValidator, ValidatorAction, apply_validator};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Part of an item under the pointer at press time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitZone {
    Body,
    ResizeHandle,
}

/// Device that produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Position and scroll offsets of the scrolling surface, used to turn
/// absolute pointer coordinates into canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollSurface {
    pub origin_x: f64,
    pub origin_y: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl ScrollSurface {
    /// Canvas x for an absolute pointer x.
    #[must_use]
    pub fn canvas_x(&self, x: f64) -> f64 {
        x - self.origin_x + self.scroll_left
    }

    /// Canvas y for an absolute pointer y.
    #[must_use]
    pub fn canvas_y(&self, y: f64) -> f64 {
        y - self.origin_y + self.scroll_top
    }
}

/// Pointer input, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        item: ItemId,
        hit: HitZone,
        #[serde(default)]
        kind: PointerKind,
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    /// Pointer capture lost; an active gesture commits its last preview.
    Lost,
    /// Explicit abort; an active gesture ends without committing.
    Cancel,
}

/// Read-only snapshot consulted by [`step`].
#[derive(Clone, Copy)]
pub struct InteractionContext<'a> {
    pub config: &'a TimelineConfig,
    pub axis: TimeAxis,
    pub surface: ScrollSurface,
    pub items: &'a [Item],
    pub groups: &'a [Group],
    pub layout: &'a StackLayout,
    /// Only selected items may be dragged or resized.
    pub selected: &'a [ItemId],
    pub validator: Option<&'a dyn MoveResizeValidator>,
}

impl InteractionContext<'_> {
    fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|it| it.id == id)
    }

    fn time_at(&self, x: f64) -> f64 {
        self.axis.pixel_to_time(self.surface.canvas_x(x))
    }

    fn item_width_px(&self, item: &Item) -> f64 {
        self.layout
            .dimensions(item.id)
            .map_or_else(|| self.axis.pixel_span(item.start, item.end), |d| d.width)
    }
}

// ---------------------------------------------------------------------------
// State & effects
// ---------------------------------------------------------------------------

/// Interaction lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    Pressed {
        item: ItemId,
        hit: HitZone,
        kind: PointerKind,
        press_x: f64,
        press_y: f64,
    },
    Dragging {
        origin: Item,
        /// `origin.start` minus the time under the pointer at press.
        pointer_offset: f64,
        preview_time: Millis,
        preview_group: GroupId,
        preview_group_delta: i64,
    },
    Resizing {
        origin: Item,
        edge: ResizeEdge,
        press_x: f64,
        preview_time: Millis,
        preview_delta: Millis,
    },
}

impl InteractionState {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether an item is being dragged or resized (previews are live).
    #[must_use]
    pub const fn is_manipulating(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Resizing { .. })
    }

    /// Item the current gesture is about, if any.
    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        match self {
            Self::Idle => None,
            Self::Pressed { item, .. } => Some(*item),
            Self::Dragging { origin, .. } | Self::Resizing { origin, .. } => Some(origin.id),
        }
    }

    /// Preview values to substitute in the next stacking pass.
    #[must_use]
    pub fn interaction_override(&self) -> Option<InteractionOverride> {
        match *self {
            Self::Idle | Self::Pressed { .. } => None,
            Self::Dragging {
                origin,
                preview_time,
                preview_group,
                ..
            } => Some(InteractionOverride {
                item: origin.id,
                start: preview_time,
                end: preview_time.saturating_add(origin.duration()),
                group: preview_group,
            }),
            Self::Resizing {
                origin,
                edge,
                preview_time,
                ..
            } => {
                let (start, end) = match edge {
                    ResizeEdge::Left => (preview_time, origin.end),
                    ResizeEdge::Right => (origin.start, preview_time),
                };
                Some(InteractionOverride {
                    item: origin.id,
                    start,
                    end,
                    group: origin.group,
                })
            }
        }
    }
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    IdleWithoutActiveGesture,
    GestureAlreadyActive,
    UnknownItem,
    BelowClickTolerance,
    GestureNotPermitted,
    ZeroResizeDelta,
}

/// Why a gesture ended without a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    Explicit,
    PointerLost,
    Programmatic,
}

/// Effect emitted by one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum InteractionEffect {
    Pressed {
        item: ItemId,
        hit: HitZone,
    },
    DragStarted {
        item: ItemId,
    },
    DragPreview {
        item: ItemId,
        time: Millis,
        group: GroupId,
        group_delta: i64,
    },
    MoveCommit {
        item: ItemId,
        time: Millis,
        group: GroupId,
    },
    ResizeStarted {
        item: ItemId,
        edge: ResizeEdge,
    },
    ResizePreview {
        item: ItemId,
        time: Millis,
        edge: ResizeEdge,
    },
    ResizeCommit {
        item: ItemId,
        time: Millis,
        edge: ResizeEdge,
        delta: Millis,
    },
    Click {
        item: ItemId,
        kind: PointerKind,
        x: f64,
        y: f64,
    },
    Canceled {
        item: Option<ItemId>,
        reason: CancelReason,
    },
    Noop {
        reason: NoopReason,
    },
}

const fn noop(reason: NoopReason) -> InteractionEffect {
    InteractionEffect::Noop { reason }
}

// ---------------------------------------------------------------------------
// Gesture math
// ---------------------------------------------------------------------------

/// Snapped (then validated) start time for a drag with the pointer at `x`.
fn drag_time(ctx: &InteractionContext<'_>, origin: &Item, pointer_offset: f64, x: f64) -> Millis {
    let raw = ctx.time_at(x) + pointer_offset;
    let snapped = snap_floor(raw, ctx.config.drag_snap_millis, ctx.config.utc_offset_millis());
    apply_validator(ctx.validator, ValidatorAction::Move, origin, snapped, None)
}

/// Target group for a drag with the pointer at `y`, plus its index delta.
fn drag_group(ctx: &InteractionContext<'_>, origin: &Item, y: f64) -> (GroupId, i64) {
    let Some(origin_index) = group_index(ctx.groups, origin.group) else {
        return (origin.group, 0);
    };
    if !ctx.config.can_change_group {
        return (origin.group, 0);
    }
    let tops = ctx.layout.group_tops();
    let index = group_index_at(&tops, ctx.surface.canvas_y(y))
        .map_or(origin_index, |i| i.min(ctx.groups.len() - 1));
    (
        ctx.groups[index].id,
        index as i64 - origin_index as i64,
    )
}

/// Edge time and delta for a resize with the pointer at `x`.
///
/// The delta is rounded to the snap grid and clamped so the item keeps at
/// least one snap unit; the validator then has the final word on the time.
fn resize_time(
    ctx: &InteractionContext<'_>,
    origin: &Item,
    edge: ResizeEdge,
    press_x: f64,
    x: f64,
) -> (Millis, Millis) {
    let length = origin.duration();
    let min_duration = ctx.config.min_duration_millis();
    let mut delta = snap_round((x - press_x) * ctx.axis.millis_per_pixel(), ctx.config.drag_snap_millis);
    match edge {
        ResizeEdge::Left if length - delta < min_duration => delta = length - min_duration,
        ResizeEdge::Right if length + delta < min_duration => delta = min_duration - length,
        _ => {}
    }
    let edge_time = match edge {
        ResizeEdge::Left => origin.start,
        ResizeEdge::Right => origin.end,
    };
    let time = apply_validator(
        ctx.validator,
        ValidatorAction::Resize,
        origin,
        edge_time.saturating_add(delta),
        Some(edge),
    );
    (time, time.saturating_sub(edge_time))
}

/// Edge chosen on the first movement frame, if resizing is allowed at all.
fn resize_edge(config: &TimelineConfig, dx: f64) -> Option<ResizeEdge> {
    let left = config.can_resize.allows(ResizeEdge::Left);
    let right = config.can_resize.allows(ResizeEdge::Right);
    match (left, right) {
        (true, true) if dx < 0.0 => Some(ResizeEdge::Left),
        (true, true) | (false, true) => Some(ResizeEdge::Right),
        (true, false) => Some(ResizeEdge::Left),
        (false, false) => None,
    }
}

fn start_gesture(
    ctx: &InteractionContext<'_>,
    item_id: ItemId,
    hit: HitZone,
    press_x: f64,
    x: f64,
    y: f64,
) -> Option<(InteractionState, Vec<InteractionEffect>)> {
    if !ctx.selected.contains(&item_id) {
        return None;
    }
    let origin = *ctx.item(item_id)?;
    let config = ctx.config;

    if hit == HitZone::ResizeHandle
        && ctx.item_width_px(&origin) >= config.min_resize_width_px
        && let Some(edge) = resize_edge(config, x - press_x)
    {
        let (time, delta) = resize_time(ctx, &origin, edge, press_x, x);
        let state = InteractionState::Resizing {
            origin,
            edge,
            press_x,
            preview_time: time,
            preview_delta: delta,
        };
        let effects = vec![
            InteractionEffect::ResizeStarted {
                item: item_id,
                edge,
            },
            InteractionEffect::ResizePreview {
                item: item_id,
                time,
                edge,
            },
        ];
        return Some((state, effects));
    }

    if !config.can_move {
        return None;
    }
    let pointer_offset = origin.start as f64 - ctx.time_at(press_x);
    let time = drag_time(ctx, &origin, pointer_offset, x);
    let (group, group_delta) = drag_group(ctx, &origin, y);
    let state = InteractionState::Dragging {
        origin,
        pointer_offset,
        preview_time: time,
        preview_group: group,
        preview_group_delta: group_delta,
    };
    let effects = vec![
        InteractionEffect::DragStarted { item: item_id },
        InteractionEffect::DragPreview {
            item: item_id,
            time,
            group,
            group_delta,
        },
    ];
    Some((state, effects))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Advance `state` by one pointer event.
#[must_use]
pub fn step(
    state: InteractionState,
    event: &PointerEvent,
    ctx: &InteractionContext<'_>,
) -> (InteractionState, Vec<InteractionEffect>) {
    use InteractionState as S;
    use PointerEvent as E;

    match (state, *event) {
        (
            S::Idle,
            E::Down {
                item,
                hit,
                kind,
                x,
                y,
            },
        ) => {
            if ctx.item(item).is_none() {
                return (state, vec![noop(NoopReason::UnknownItem)]);
            }
            (
                S::Pressed {
                    item,
                    hit,
                    kind,
                    press_x: x,
                    press_y: y,
                },
                vec![InteractionEffect::Pressed { item, hit }],
            )
        }
        (S::Idle, _) => (state, vec![noop(NoopReason::IdleWithoutActiveGesture)]),
        (_, E::Down { .. }) => (state, vec![noop(NoopReason::GestureAlreadyActive)]),

        // Pressed
        (
            S::Pressed {
                item,
                hit,
                press_x,
                press_y,
                ..
            },
            E::Move { x, y },
        ) => {
            let travel = (x - press_x).hypot(y - press_y);
            if travel <= ctx.config.click_tolerance_px {
                return (state, vec![noop(NoopReason::BelowClickTolerance)]);
            }
            start_gesture(ctx, item, hit, press_x, x, y)
                .unwrap_or((state, vec![noop(NoopReason::GestureNotPermitted)]))
        }
        (S::Pressed { item, kind, .. }, E::Up { x, y }) => (
            S::Idle,
            vec![InteractionEffect::Click { item, kind, x, y }],
        ),
        (S::Pressed { item, .. }, E::Lost) => (
            S::Idle,
            vec![InteractionEffect::Canceled {
                item: Some(item),
                reason: CancelReason::PointerLost,
            }],
        ),

        // Dragging
        (
            S::Dragging {
                origin,
                pointer_offset,
                ..
            },
            E::Move { x, y },
        ) => {
            let time = drag_time(ctx, &origin, pointer_offset, x);
            let (group, group_delta) = drag_group(ctx, &origin, y);
            (
                S::Dragging {
                    origin,
                    pointer_offset,
                    preview_time: time,
                    preview_group: group,
                    preview_group_delta: group_delta,
                },
                vec![InteractionEffect::DragPreview {
                    item: origin.id,
                    time,
                    group,
                    group_delta,
                }],
            )
        }
        (
            S::Dragging {
                origin,
                pointer_offset,
                ..
            },
            E::Up { x, y },
        ) => {
            let time = drag_time(ctx, &origin, pointer_offset, x);
            let (group, _) = drag_group(ctx, &origin, y);
            (
                S::Idle,
                vec![InteractionEffect::MoveCommit {
                    item: origin.id,
                    time,
                    group,
                }],
            )
        }
        (
            S::Dragging {
                origin,
                preview_time,
                preview_group,
                ..
            },
            E::Lost,
        ) => (
            S::Idle,
            vec![InteractionEffect::MoveCommit {
                item: origin.id,
                time: preview_time,
                group: preview_group,
            }],
        ),

        // Resizing
        (
            S::Resizing {
                origin,
                edge,
                press_x,
                ..
            },
            E::Move { x, .. },
        ) => {
            let (time, delta) = resize_time(ctx, &origin, edge, press_x, x);
            (
                S::Resizing {
                    origin,
                    edge,
                    press_x,
                    preview_time: time,
                    preview_delta: delta,
                },
                vec![InteractionEffect::ResizePreview {
                    item: origin.id,
                    time,
                    edge,
                }],
            )
        }
        (
            S::Resizing {
                origin,
                edge,
                press_x,
                ..
            },
            E::Up { x, .. },
        ) => {
            let (time, delta) = resize_time(ctx, &origin, edge, press_x, x);
            (S::Idle, vec![resize_commit(origin.id, time, edge, delta)])
        }
        (
            S::Resizing {
                origin,
                edge,
                preview_time,
                preview_delta,
                ..
            },
            E::Lost,
        ) => (
            S::Idle,
            vec![resize_commit(origin.id, preview_time, edge, preview_delta)],
        ),

        (_, E::Cancel) => (
            S::Idle,
            vec![InteractionEffect::Canceled {
                item: state.item(),
                reason: CancelReason::Explicit,
            }],
        ),
    }
}

fn resize_commit(item: ItemId, time: Millis, edge: ResizeEdge, delta: Millis) -> InteractionEffect {
    if delta == 0 {
        return noop(NoopReason::ZeroResizeDelta);
    }
    InteractionEffect::ResizeCommit {
        item,
        time,
        edge,
        delta,
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// One machine transition with diagnostic counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTransition {
    pub transition_id: u64,
    pub from: InteractionState,
    pub to: InteractionState,
    pub effects: Vec<InteractionEffect>,
}

impl InteractionTransition {
    /// Effects that are not `Noop`.
    pub fn actionable(&self) -> impl Iterator<Item = &InteractionEffect> {
        self.effects
            .iter()
            .filter(|e| !matches!(e, InteractionEffect::Noop { .. }))
    }
}

/// Stateful wrapper around [`step`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionMachine {
    state: InteractionState,
    transition_counter: u64,
}

impl InteractionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> InteractionState {
        self.state
    }

    /// Whether a gesture is in progress (pressed, dragging, or resizing).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    #[must_use]
    pub const fn transition_count(&self) -> u64 {
        self.transition_counter
    }

    #[must_use]
    pub fn interaction_override(&self) -> Option<InteractionOverride> {
        self.state.interaction_override()
    }

    /// Apply one pointer event.
    pub fn apply(
        &mut self,
        event: &PointerEvent,
        ctx: &InteractionContext<'_>,
    ) -> InteractionTransition {
        let from = self.state;
        let (to, effects) = step(from, event, ctx);
        self.state = to;
        self.transition_counter = self.transition_counter.saturating_add(1);
        tracing::trace!(
            target: "tline.interact",
            transition_id = self.transition_counter,
            ?from,
            ?to,
            effects = effects.len(),
            "interaction step"
        );
        InteractionTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effects,
        }
    }

    /// Reset to `Idle` without committing; `None` if already idle.
    pub fn force_cancel(&mut self) -> Option<InteractionTransition> {
        let from = self.state;
        if from.is_idle() {
            return None;
        }
        self.state = InteractionState::Idle;
        self.transition_counter = self.transition_counter.saturating_add(1);
        Some(InteractionTransition {
            transition_id: self.transition_counter,
            from,
            to: InteractionState::Idle,
            effects: vec![InteractionEffect::Canceled {
                item: from.item(),
                reason: CancelReason::Programmatic,
            }],
        })
    }
}
