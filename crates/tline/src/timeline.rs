#![forbid(unsafe_code)]

//! The timeline host: owns the viewport and the last layout, feeds pointer
//! and scroll input through the engine, and reports [`TimelineEvent`]s.
//!
//! # Invariants
//!
//! 1. `layout` always reflects `viewport`, the current items and groups, and
//!    any live drag/resize preview.
//! 2. `surface.scroll_left` keeps the visible range in view after every
//!    applied visible-range change.
//! 3. The visible span stays within `[min_zoom, max_zoom]` for every change
//!    that goes through the zoom controller.
//!
//! # Failure Modes
//!
//! Construction fails with [`TimelineError::Config`](crate::TimelineError)
//! on an invalid config or a missing initial range. Everything afterwards is
//! infallible: bad input is clamped or ignored and logged.

use std::fmt;

use tline_core::logging::{debug, trace, warn};
use tline_core::unit::min_unit;
use tline_core::{
    Group, GroupId, InitialViewport, Item, ItemId, Millis, TimeUnit, TimelineConfig, Viewport,
    VisibleRange,
};
use tline_interact::{
    InteractionContext, InteractionEffect, InteractionMachine, InteractionState,
    MoveResizeValidator, PanTracker, PinchTracker, PointerEvent, PointerKind, ScrollSurface,
    WheelAction, WheelInput, ZoomController, interpret_wheel, snap_floor,
    visible_start_for_scroll,
};
use tline_layout::{CanvasWindow, StackLayout, iterate_times};

use crate::Result;
use crate::children::{ChildSpec, ResolvedChildren, resolve_children};
use crate::events::{ApplyTimeChange, TimeChange, TimeChangeHandler, TimelineEvent};
use crate::reconcile::Reconciliation;
use crate::render::RenderPass;

/// Stateful timeline bound to one host.
pub struct Timeline {
    config: TimelineConfig,
    window: CanvasWindow,
    zoom: ZoomController,
    viewport: Viewport,
    items: Vec<Item>,
    groups: Vec<Group>,
    layout: StackLayout,
    unit: TimeUnit,
    machine: InteractionMachine,
    surface: ScrollSurface,
    selected: Vec<ItemId>,
    children: ResolvedChildren,
    cursor_time: Option<Millis>,
    pinch: PinchTracker,
    pan: PanTracker,
    validator: Option<Box<dyn MoveResizeValidator>>,
    time_change: Box<dyn TimeChangeHandler>,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("viewport", &self.viewport)
            .field("items", &self.items.len())
            .field("groups", &self.groups.len())
            .field("unit", &self.unit)
            .field("state", &self.machine.state())
            .field("selected", &self.selected)
            .field("scroll_left", &self.surface.scroll_left)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl Timeline {
    /// Build a timeline over `items` and `groups`.
    ///
    /// An empty or inverted initial range is widened to `min_zoom` from its
    /// start.
    pub fn new(
        config: TimelineConfig,
        initial: InitialViewport,
        items: Vec<Item>,
        groups: Vec<Group>,
    ) -> Result<Self> {
        let config = config.validated()?;
        let mut visible = initial.resolve()?;
        if visible.span() <= 0 {
            warn!(
                target: "tline.timeline",
                start = visible.start,
                end = visible.end,
                "empty initial range widened to min zoom"
            );
            visible.end = visible.start.saturating_add(config.min_zoom_millis);
        }

        let window = CanvasWindow::from_config(&config);
        let viewport = window.viewport_for(visible, config.initial_width_px);
        let layout = window.stack(&viewport, &items, &groups, None);
        let unit = min_unit(
            viewport.zoom(),
            viewport.width_px,
            &config.time_steps,
            config.min_cell_width_px,
        );
        let surface = ScrollSurface {
            scroll_left: viewport.scroll_left(),
            ..ScrollSurface::default()
        };
        debug!(
            target: "tline.timeline",
            visible_start = viewport.visible_start,
            visible_end = viewport.visible_end,
            items = items.len(),
            groups = groups.len(),
            unit = %unit,
            "timeline created"
        );

        Ok(Self {
            zoom: ZoomController::from_config(&config),
            config,
            window,
            viewport,
            items,
            groups,
            layout,
            unit,
            machine: InteractionMachine::new(),
            surface,
            selected: Vec::new(),
            children: ResolvedChildren::default(),
            cursor_time: None,
            pinch: PinchTracker::default(),
            pan: PanTracker::default(),
            validator: None,
            time_change: Box::new(ApplyTimeChange),
        })
    }

    #[must_use]
    pub fn with_children(mut self, specs: &[ChildSpec]) -> Self {
        self.children = resolve_children(specs);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl MoveResizeValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Replace the default apply-everything time-change hook.
    #[must_use]
    pub fn with_time_change_handler(mut self, handler: impl TimeChangeHandler + 'static) -> Self {
        self.time_change = Box::new(handler);
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &TimelineConfig {
        &self.config
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn layout(&self) -> &StackLayout {
        &self.layout
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    #[must_use]
    pub fn selected(&self) -> &[ItemId] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, item: ItemId) -> bool {
        self.selected.contains(&item)
    }

    #[must_use]
    pub const fn interaction_state(&self) -> InteractionState {
        self.machine.state()
    }

    #[must_use]
    pub const fn scroll_surface(&self) -> ScrollSurface {
        self.surface
    }

    /// Horizontal scroll offset the host should apply.
    #[must_use]
    pub const fn scroll_left(&self) -> f64 {
        self.surface.scroll_left
    }

    #[must_use]
    pub const fn children(&self) -> &ResolvedChildren {
        &self.children
    }

    // -----------------------------------------------------------------------
    // External updates
    // -----------------------------------------------------------------------

    /// Take a new snapshot of items/groups and, for a controlled timeline,
    /// the requested visible range.
    pub fn reconcile(
        &mut self,
        items: Vec<Item>,
        groups: Vec<Group>,
        requested: Option<VisibleRange>,
    ) -> Vec<TimelineEvent> {
        let decision = crate::reconcile::reconcile(
            &self.viewport,
            &self.items,
            &self.groups,
            &items,
            &groups,
            requested,
        );
        self.items = items;
        self.groups = groups;
        trace!(target: "tline.timeline", ?decision, "reconcile");

        let mut events = Vec::new();
        match decision {
            Reconciliation::Keep => {}
            Reconciliation::Restack => self.restack(),
            Reconciliation::ScrollCanvas { visible, force } => {
                self.apply_scroll_canvas(visible, force, &mut events);
            }
        }
        events
    }

    /// Replace the selection without emitting events (controlled selection).
    /// Every listed item counts as selected and may be dragged or resized.
    pub fn set_selected(&mut self, items: &[ItemId]) {
        self.selected = items.to_vec();
    }

    /// Record where the scroll container sits on screen and its offsets.
    pub fn set_scroll_surface(&mut self, surface: ScrollSurface) {
        self.surface = surface;
    }

    /// The container changed width: relayout, reset the scroll offset to the
    /// middle of the buffer, and follow the resulting scroll.
    pub fn resize(&mut self, width_px: f64) -> Vec<TimelineEvent> {
        let width = if width_px.is_finite() { width_px.max(0.0) } else { 0.0 };
        let (viewport, layout) = self.window.resize(
            &self.viewport,
            width,
            &self.items,
            &self.groups,
            self.machine.interaction_override(),
        );
        self.viewport = viewport;
        self.layout = layout;

        let mut events = vec![TimelineEvent::CanvasResize {
            canvas_width: self.viewport.canvas_width(),
            visible_width: width,
            height: self.layout.total_height,
        }];
        self.refresh_unit(&mut events);

        let centre = width * f64::from(self.viewport.buffer_factor.saturating_sub(1)) / 2.0;
        self.surface.scroll_left = centre;
        events.extend(self.on_scroll(centre));
        debug!(target: "tline.timeline", width, "resized");
        events
    }

    // -----------------------------------------------------------------------
    // Visible-range changes
    // -----------------------------------------------------------------------

    /// The scroll container moved to `scroll_x`.
    pub fn on_scroll(&mut self, scroll_x: f64) -> Vec<TimelineEvent> {
        let start = visible_start_for_scroll(&self.viewport, scroll_x);
        if start == self.viewport.visible_start {
            return Vec::new();
        }
        let zoom = self.viewport.zoom();
        self.dispatch_time_change(VisibleRange::new(start, start.saturating_add(zoom)))
    }

    /// Scale the visible span by `scale` around `anchor` (0 = left edge,
    /// 1 = right edge).
    pub fn change_zoom(&mut self, scale: f64, anchor: f64) -> Vec<TimelineEvent> {
        let next = self.zoom.change_zoom(self.viewport.visible(), scale, anchor);
        if next == self.viewport.visible() {
            return Vec::new();
        }
        self.dispatch_time_change(next)
    }

    /// Show `[from, to]`, subject to the zoom bounds.
    pub fn show_period(&mut self, from: Millis, to: Millis) -> Vec<TimelineEvent> {
        match self.zoom.show_period(from, to) {
            Some(range) => self.dispatch_time_change(range),
            None => {
                debug!(target: "tline.timeline", from, to, "period below min zoom ignored");
                Vec::new()
            }
        }
    }

    pub fn wheel(&mut self, input: WheelInput) -> Vec<TimelineEvent> {
        match interpret_wheel(&input, self.viewport.width_px) {
            WheelAction::Zoom { scale, anchor } => self.change_zoom(scale, anchor),
            WheelAction::Scroll { delta_px } => {
                let target = self.surface.scroll_left + delta_px;
                self.on_scroll(target)
            }
            WheelAction::Native => Vec::new(),
        }
    }

    pub fn pinch_start(&mut self, distance: f64) {
        self.pinch.start(distance);
    }

    pub fn pinch_move(&mut self, distance: f64, center_x: f64) -> Vec<TimelineEvent> {
        match self.pinch.update(distance, center_x, self.viewport.width_px) {
            Some((scale, anchor)) => self.change_zoom(scale, anchor),
            None => Vec::new(),
        }
    }

    pub fn pinch_end(&mut self) {
        self.pinch.end();
    }

    /// Start a mouse-drag pan on empty canvas. Ignored while an item gesture
    /// is in progress.
    pub fn pan_start(&mut self, x: f64) {
        if self.machine.is_active() {
            trace!(target: "tline.timeline", "pan start ignored during item gesture");
            return;
        }
        self.pan.start(x);
    }

    pub fn pan_move(&mut self, x: f64) -> Vec<TimelineEvent> {
        if self.machine.is_active() {
            return Vec::new();
        }
        match self.pan.update(x) {
            Some(delta) => {
                let target = self.surface.scroll_left + delta;
                self.on_scroll(target)
            }
            None => Vec::new(),
        }
    }

    pub fn pan_end(&mut self) {
        self.pan.end();
    }

    /// Offer `next` to the time-change hook and apply whatever it accepts.
    pub fn dispatch_time_change(&mut self, next: VisibleRange) -> Vec<TimelineEvent> {
        let change = TimeChange {
            visible_start: next.start,
            visible_end: next.end,
            unit: self.unit,
        };
        let mut events = vec![TimelineEvent::TimeChange(change)];
        let mut accepted = None;
        self.time_change
            .on_time_change(change, &mut |start, end| {
                accepted = Some(VisibleRange::new(start, end));
            });
        match accepted {
            Some(range) => self.apply_scroll_canvas(range, false, &mut events),
            None => trace!(target: "tline.timeline", ?next, "time change not applied"),
        }
        events
    }

    /// Move the visible range directly, bypassing the time-change hook.
    pub fn update_scroll_canvas(
        &mut self,
        visible_start: Millis,
        visible_end: Millis,
        force: bool,
    ) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        self.apply_scroll_canvas(VisibleRange::new(visible_start, visible_end), force, &mut events);
        events
    }

    fn apply_scroll_canvas(
        &mut self,
        requested: VisibleRange,
        force: bool,
        events: &mut Vec<TimelineEvent>,
    ) {
        if requested.span() <= 0 {
            warn!(
                target: "tline.timeline",
                start = requested.start,
                end = requested.end,
                "empty visible range ignored"
            );
            return;
        }

        let previous = self.viewport;
        let next = self.window.calculate_scroll_canvas(
            &previous,
            requested,
            force,
            &self.items,
            &self.groups,
            self.machine.interaction_override(),
        );
        self.viewport = next.viewport;
        if let Some(layout) = next.layout {
            self.layout = layout;
        }
        self.surface.scroll_left = self.viewport.scroll_left();

        let unit = self.compute_unit();
        if self.viewport.zoom() != previous.zoom() {
            events.push(TimelineEvent::Zoom {
                visible_start: self.viewport.visible_start,
                visible_end: self.viewport.visible_end,
                unit,
            });
        }
        if self.viewport.canvas_start != previous.canvas_start {
            events.push(TimelineEvent::BoundsChange {
                canvas_start: self.viewport.canvas_start,
                canvas_end: self.viewport.canvas_end,
            });
        }
        self.refresh_unit(events);
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Feed one pointer event on an item (or a move/up/cancel of an active
    /// gesture) through the interaction machine.
    pub fn pointer(&mut self, event: PointerEvent) -> Vec<TimelineEvent> {
        let transition = {
            let ctx = InteractionContext {
                config: &self.config,
                axis: self.viewport.axis(),
                surface: self.surface,
                items: &self.items,
                groups: &self.groups,
                layout: &self.layout,
                selected: &self.selected,
                validator: self.validator.as_deref(),
            };
            self.machine.apply(&event, &ctx)
        };
        if transition.from.is_idle() && !transition.to.is_idle() && self.pan.is_active() {
            debug!(target: "tline.timeline", "item press ends canvas pan");
            self.pan.end();
        }

        let mut events = Vec::new();
        for effect in transition.actionable() {
            match *effect {
                InteractionEffect::DragPreview {
                    item, time, group, ..
                } => events.push(TimelineEvent::DragPreview { item, time, group }),
                InteractionEffect::MoveCommit { item, time, group } => {
                    events.push(TimelineEvent::MoveCommit { item, time, group });
                }
                InteractionEffect::ResizePreview { item, time, edge } => {
                    events.push(TimelineEvent::ResizePreview { item, time, edge });
                }
                InteractionEffect::ResizeCommit {
                    item,
                    time,
                    edge,
                    delta,
                } => events.push(TimelineEvent::ResizeCommit {
                    item,
                    time,
                    edge,
                    delta,
                }),
                InteractionEffect::Click { item, kind, x, .. } => {
                    let time = self.item_click_time(x);
                    events.extend(self.click_item(item, time, kind));
                }
                InteractionEffect::Pressed { .. }
                | InteractionEffect::DragStarted { .. }
                | InteractionEffect::ResizeStarted { .. }
                | InteractionEffect::Canceled { .. }
                | InteractionEffect::Noop { .. } => {}
            }
        }

        if transition.from.is_manipulating() || transition.to.is_manipulating() {
            self.restack();
        }
        events
    }

    /// Abort any gesture without committing.
    pub fn cancel_interaction(&mut self) {
        if let Some(transition) = self.machine.force_cancel()
            && transition.from.is_manipulating()
        {
            self.restack();
        }
    }

    /// A click on empty canvas at screen position `(x, y)`.
    pub fn canvas_click(&mut self, x: f64, y: f64) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        if !self.selected.is_empty() {
            self.selected.clear();
            events.push(TimelineEvent::ItemDeselect);
        }
        if let Some((group, time)) = self.canvas_point(x, y) {
            events.push(TimelineEvent::CanvasClick { group, time });
        }
        events
    }

    /// A double click on empty canvas. The selection is left alone.
    #[must_use]
    pub fn canvas_double_click(&self, x: f64, y: f64) -> Option<TimelineEvent> {
        self.canvas_point(x, y)
            .map(|(group, time)| TimelineEvent::CanvasDoubleClick { group, time })
    }

    /// A context-menu request on empty canvas. The selection is left alone.
    #[must_use]
    pub fn canvas_context_menu(&self, x: f64, y: f64) -> Option<TimelineEvent> {
        self.canvas_point(x, y)
            .map(|(group, time)| TimelineEvent::CanvasContextMenu { group, time })
    }

    /// A double click on `item` at screen `x`.
    #[must_use]
    pub fn item_double_click(&self, item: ItemId, x: f64) -> TimelineEvent {
        TimelineEvent::ItemDoubleClick {
            item,
            time: self.item_click_time(x),
        }
    }

    /// A context-menu request on `item` at screen `x`.
    #[must_use]
    pub fn item_context_menu(&self, item: ItemId, x: f64) -> TimelineEvent {
        TimelineEvent::ItemContextMenu {
            item,
            time: self.item_click_time(x),
        }
    }

    /// Track the pointer for the cursor marker.
    pub fn pointer_hover(&mut self, x: f64) {
        let time = self.viewport.axis().pixel_to_time(self.surface.canvas_x(x));
        self.cursor_time = Some(time.round() as Millis);
    }

    pub fn pointer_leave(&mut self) {
        self.cursor_time = None;
    }

    /// Select `item` (or clear the selection) as a user action.
    pub fn select(&mut self, item: Option<ItemId>, time: Millis) -> Vec<TimelineEvent> {
        match item {
            Some(item) => self
                .click_item(item, time, PointerKind::Mouse)
                .into_iter()
                .collect(),
            None if !self.selected.is_empty() => {
                self.selected.clear();
                vec![TimelineEvent::ItemDeselect]
            }
            None => Vec::new(),
        }
    }

    fn click_item(
        &mut self,
        item: ItemId,
        time: Millis,
        kind: PointerKind,
    ) -> Option<TimelineEvent> {
        if !self.config.can_select {
            return None;
        }
        let touch_click = kind == PointerKind::Touch && self.config.item_touch_sends_click;
        if self.is_selected(item) || touch_click {
            Some(TimelineEvent::ItemClick { item, time })
        } else {
            self.selected = vec![item];
            Some(TimelineEvent::ItemSelect { item, time })
        }
    }

    /// Group and floor-snapped time under screen `(x, y)` on the canvas, or
    /// `None` below the last group.
    fn canvas_point(&self, x: f64, y: f64) -> Option<(GroupId, Millis)> {
        let index = self.layout.group_at(self.surface.canvas_y(y))?;
        let band = self.layout.groups.get(index)?;
        let raw = self.viewport.axis().pixel_to_time(self.surface.canvas_x(x));
        Some((band.group, snap_floor(raw, self.config.drag_snap_millis, 0)))
    }

    /// Time under screen `x` for an item click: visible-range relative,
    /// floor-snapped without the UTC offset.
    fn item_click_time(&self, x: f64) -> Millis {
        let width = self.viewport.width_px;
        if !(width > 0.0) {
            return self.viewport.visible_start;
        }
        let fraction = (x - self.surface.origin_x) / width;
        let raw = (self.viewport.visible_start as f64 + fraction * self.viewport.zoom() as f64).round();
        snap_floor(raw, self.config.drag_snap_millis, 0)
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Everything needed to paint the current state. `now` positions the
    /// today marker.
    #[must_use]
    pub fn render_pass(&self, now: Millis) -> RenderPass {
        let axis = self.viewport.axis();
        RenderPass {
            canvas_start: self.viewport.canvas_start,
            canvas_end: self.viewport.canvas_end,
            canvas_width: self.viewport.canvas_width(),
            visible_start: self.viewport.visible_start,
            visible_end: self.viewport.visible_end,
            items: self.layout.items.clone(),
            groups: self.layout.groups.clone(),
            total_height: self.layout.total_height,
            unit: self.unit,
            columns: iterate_times(
                &axis,
                self.unit,
                &self.config.time_steps,
                self.config.utc_offset_minutes,
            ),
            markers: self.children.markers(&axis, now, self.cursor_time),
            headers: self.children.headers,
            scroll_left: self.surface.scroll_left,
            selected: self.selected.clone(),
            interaction: self.machine.state(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn restack(&mut self) {
        self.layout = self.window.stack(
            &self.viewport,
            &self.items,
            &self.groups,
            self.machine.interaction_override(),
        );
    }

    fn compute_unit(&self) -> TimeUnit {
        min_unit(
            self.viewport.zoom(),
            self.viewport.width_px,
            &self.config.time_steps,
            self.config.min_cell_width_px,
        )
    }

    fn refresh_unit(&mut self, events: &mut Vec<TimelineEvent>) {
        let unit = self.compute_unit();
        if unit != self.unit {
            debug!(target: "tline.timeline", from = %self.unit, to = %unit, "unit changed");
            self.unit = unit;
            events.push(TimelineEvent::UnitChange { unit });
        }
    }
}
