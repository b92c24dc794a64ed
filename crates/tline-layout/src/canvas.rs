#![forbid(unsafe_code)]

//! Buffered canvas window around the visible range.
//!
//! The canvas is laid out `buffer_factor` times wider than the visible range
//! so that panning only shifts a scroll offset; a new layout is needed only
//! once the visible range drifts out of the buffer or the zoom changes.
//!
//! # Invariants
//!
//! 1. `canvas_span == buffer_factor * visible_span`.
//! 2. The visible range is centred in a freshly computed canvas.
//! 3. A kept canvas still contains the requested range with at least half a
//!    side-buffer of margin on both sides.
//!
//! # Failure Modes
//!
//! None. A `buffer_factor` of 0 is treated as 1.

use serde::{Deserialize, Serialize};
use tline_core::{Group, Item, Millis, TimelineConfig, Viewport, VisibleRange};

use crate::stacking::{InteractionOverride, StackInput, StackLayout, stack_items};

/// Canvas `[start, end]` for a visible range: `buffer` visible spans wide,
/// with the visible range in the middle.
#[must_use]
pub fn canvas_bounds(visible: VisibleRange, buffer_factor: u32) -> (Millis, Millis) {
    let buffer = buffer_factor.max(1);
    let zoom = visible.span();
    let side = (zoom as f64 * f64::from(buffer - 1) / 2.0).round() as Millis;
    let start = visible.start.saturating_sub(side);
    let end = start.saturating_add(zoom.saturating_mul(Millis::from(buffer)));
    (start, end)
}

/// Pixel width of the canvas for a visible width.
#[must_use]
pub fn canvas_width(width_px: f64, buffer_factor: u32) -> f64 {
    width_px * f64::from(buffer_factor.max(1))
}

/// Result of a scroll/zoom request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollCanvas {
    pub viewport: Viewport,
    /// Fresh layout when the canvas was recomputed; `None` means the previous
    /// layout is still valid.
    pub layout: Option<StackLayout>,
    pub recentered: bool,
}

/// Canvas-window calculator bound to the layout parameters of one timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasWindow {
    pub buffer_factor: u32,
    pub row_height: f64,
    pub item_height_ratio: f64,
    pub stacking: bool,
}

impl CanvasWindow {
    #[must_use]
    pub fn from_config(config: &TimelineConfig) -> Self {
        Self {
            buffer_factor: config.buffer_factor.max(1),
            row_height: config.row_height_px,
            item_height_ratio: config.item_height_ratio,
            stacking: config.stacking_enabled,
        }
    }

    /// Viewport with a freshly centred canvas.
    #[must_use]
    pub fn viewport_for(&self, visible: VisibleRange, width_px: f64) -> Viewport {
        let (canvas_start, canvas_end) = canvas_bounds(visible, self.buffer_factor);
        Viewport {
            visible_start: visible.start,
            visible_end: visible.end,
            canvas_start,
            canvas_end,
            width_px,
            buffer_factor: self.buffer_factor,
        }
    }

    /// Run a stacking pass over the canvas of `viewport`.
    #[must_use]
    pub fn stack(
        &self,
        viewport: &Viewport,
        items: &[Item],
        groups: &[Group],
        interaction: Option<InteractionOverride>,
    ) -> StackLayout {
        stack_items(StackInput {
            items,
            groups,
            canvas_start: viewport.canvas_start,
            canvas_end: viewport.canvas_end,
            canvas_width: viewport.canvas_width(),
            row_height: self.row_height,
            item_height_ratio: self.item_height_ratio,
            stacking: self.stacking,
            interaction,
        })
    }

    /// Whether `current`'s canvas can serve `requested` without relayout.
    #[must_use]
    pub fn can_keep_canvas(&self, current: &Viewport, requested: VisibleRange) -> bool {
        let zoom = current.zoom();
        if requested.span() != zoom {
            return false;
        }
        let margin = zoom as f64 * f64::from(self.buffer_factor.saturating_sub(1)) / 4.0;
        let lower = current.canvas_start as f64 + margin;
        let upper = current.canvas_end as f64 - margin;
        requested.start as f64 >= lower && requested.end as f64 <= upper
    }

    /// Compute the next viewport for a requested visible range, recentring
    /// the canvas (and relaying out) only when needed or forced.
    #[must_use]
    pub fn calculate_scroll_canvas(
        &self,
        current: &Viewport,
        requested: VisibleRange,
        force_update: bool,
        items: &[Item],
        groups: &[Group],
        interaction: Option<InteractionOverride>,
    ) -> ScrollCanvas {
        if !force_update && self.can_keep_canvas(current, requested) {
            let mut viewport = *current;
            viewport.visible_start = requested.start;
            viewport.visible_end = requested.end;
            return ScrollCanvas {
                viewport,
                layout: None,
                recentered: false,
            };
        }

        let viewport = self.viewport_for(requested, current.width_px);
        tracing::debug!(
            target: "tline.canvas",
            visible_start = requested.start,
            visible_end = requested.end,
            canvas_start = viewport.canvas_start,
            canvas_end = viewport.canvas_end,
            forced = force_update,
            "canvas recentred"
        );
        let layout = self.stack(&viewport, items, groups, interaction);
        ScrollCanvas {
            viewport,
            layout: Some(layout),
            recentered: true,
        }
    }

    /// Relayout at a new container width; the canvas time range is kept.
    #[must_use]
    pub fn resize(
        &self,
        current: &Viewport,
        width_px: f64,
        items: &[Item],
        groups: &[Group],
        interaction: Option<InteractionOverride>,
    ) -> (Viewport, StackLayout) {
        let mut viewport = *current;
        viewport.width_px = width_px.max(0.0);
        let layout = self.stack(&viewport, items, groups, interaction);
        (viewport, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> CanvasWindow {
        CanvasWindow {
            buffer_factor: 3,
            row_height: 30.0,
            item_height_ratio: 0.65,
            stacking: true,
        }
    }

    fn groups() -> Vec<Group> {
        vec![Group::new(1, "A")]
    }

    #[test]
    fn bounds_are_centred_and_buffered() {
        let (start, end) = canvas_bounds(VisibleRange::new(1_000, 2_000), 3);
        assert_eq!(start, 0);
        assert_eq!(end, 3_000);

        let (start, end) = canvas_bounds(VisibleRange::new(1_000, 2_000), 5);
        assert_eq!(start, -1_000);
        assert_eq!(end, 4_000);
    }

    #[test]
    fn buffer_of_one_matches_visible_range() {
        let (start, end) = canvas_bounds(VisibleRange::new(10, 20), 1);
        assert_eq!((start, end), (10, 20));
        assert_eq!(canvas_bounds(VisibleRange::new(10, 20), 0), (10, 20));
    }

    #[test]
    fn canvas_width_scales_with_buffer() {
        assert_eq!(canvas_width(800.0, 3), 2_400.0);
    }

    #[test]
    fn small_pan_keeps_canvas() {
        let cw = window();
        let current = cw.viewport_for(VisibleRange::new(1_000, 2_000), 500.0);
        let next = cw.calculate_scroll_canvas(
            &current,
            VisibleRange::new(1_300, 2_300),
            false,
            &[],
            &groups(),
            None,
        );
        assert!(!next.recentered);
        assert!(next.layout.is_none());
        assert_eq!(next.viewport.canvas_start, current.canvas_start);
        assert_eq!(next.viewport.visible_start, 1_300);
        assert!(next.viewport.is_consistent());
    }

    #[test]
    fn pan_past_buffer_margin_recentres() {
        let cw = window();
        let current = cw.viewport_for(VisibleRange::new(1_000, 2_000), 500.0);
        let next = cw.calculate_scroll_canvas(
            &current,
            VisibleRange::new(1_600, 2_600),
            false,
            &[],
            &groups(),
            None,
        );
        assert!(next.recentered);
        assert_eq!(next.viewport.canvas_start, 600);
        assert_eq!(next.viewport.canvas_end, 3_600);
        assert!(next.layout.is_some());
    }

    #[test]
    fn zoom_change_recentres() {
        let cw = window();
        let current = cw.viewport_for(VisibleRange::new(1_000, 2_000), 500.0);
        let next = cw.calculate_scroll_canvas(
            &current,
            VisibleRange::new(1_000, 1_900),
            false,
            &[],
            &groups(),
            None,
        );
        assert!(next.recentered);
        assert_eq!(next.viewport.canvas_span(), 3 * 900);
    }

    #[test]
    fn forced_update_always_relays_out() {
        let cw = window();
        let current = cw.viewport_for(VisibleRange::new(1_000, 2_000), 500.0);
        let items = [Item::new(1, 1, 1_100, 1_200)];
        let next = cw.calculate_scroll_canvas(
            &current,
            current.visible(),
            true,
            &items,
            &groups(),
            None,
        );
        assert!(next.recentered);
        assert_eq!(next.layout.unwrap().items.len(), 1);
    }

    #[test]
    fn resize_keeps_time_range() {
        let cw = window();
        let current = cw.viewport_for(VisibleRange::new(1_000, 2_000), 500.0);
        let items = [Item::new(1, 1, 1_000, 2_000)];
        let (vp, layout) = cw.resize(&current, 1_000.0, &items, &groups(), None);
        assert_eq!(vp.canvas_start, current.canvas_start);
        assert_eq!(vp.canvas_width(), 3_000.0);
        let dims = layout.items[0];
        assert_eq!(dims.left, 1_000.0);
        assert_eq!(dims.width, 1_000.0);
    }
}
