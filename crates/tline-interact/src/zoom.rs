#![forbid(unsafe_code)]

//! Anchored zoom, wheel/pinch interpretation, and scroll → time mapping.
//!
//! # Invariants
//!
//! 1. Every range produced by [`ZoomController::change_zoom`] has a span in
//!    `[min_zoom, max_zoom]`.
//! 2. The time under the anchor fraction stays put (up to rounding) unless
//!    the zoom was clamped.
//!
//! # Failure Modes
//!
//! A non-finite or non-positive scale leaves the range unchanged. A zero
//! container width maps every pointer to anchor `0`.

use serde::{Deserialize, Serialize};
use tline_core::{Millis, TimelineConfig, Viewport, VisibleRange};

// ---------------------------------------------------------------------------
// Zoom controller
// ---------------------------------------------------------------------------

/// Zoom bounds for one timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomController {
    pub min_zoom: Millis,
    pub max_zoom: Millis,
}

impl ZoomController {
    #[must_use]
    pub const fn new(min_zoom: Millis, max_zoom: Millis) -> Self {
        Self { min_zoom, max_zoom }
    }

    #[must_use]
    pub const fn from_config(config: &TimelineConfig) -> Self {
        Self::new(config.min_zoom_millis, config.max_zoom_millis)
    }

    /// Clamp a span into `[min_zoom, max_zoom]`.
    #[must_use]
    pub fn clamp(&self, zoom: Millis) -> Millis {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// Scale `visible` by `scale`, keeping the time at fraction `anchor` of
    /// the visible width in place.
    #[must_use]
    pub fn change_zoom(&self, visible: VisibleRange, scale: f64, anchor: f64) -> VisibleRange {
        if !scale.is_finite() || scale <= 0.0 {
            tracing::trace!(target: "tline.interact", scale, "ignored zoom scale");
            return visible;
        }
        let anchor = if anchor.is_finite() {
            anchor.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let old_zoom = visible.span();
        let new_zoom = self.clamp((old_zoom as f64 * scale).round() as Millis);
        let start = (visible.start as f64 + (old_zoom - new_zoom) as f64 * anchor).round() as Millis;
        VisibleRange::new(start, start.saturating_add(new_zoom))
    }

    /// Range for showing `[from, to]`; `None` when the span is below
    /// `min_zoom`.
    ///
    /// Spans above `max_zoom` are cut to `max_zoom` from `from`: the viewport
    /// requires its visible span to stay within `[min_zoom, max_zoom]`, and
    /// `from` stays the left edge the caller asked for.
    #[must_use]
    pub fn show_period(&self, from: Millis, to: Millis) -> Option<VisibleRange> {
        let span = to.saturating_sub(from);
        if span < self.min_zoom {
            return None;
        }
        Some(VisibleRange::new(from, from.saturating_add(span.min(self.max_zoom))))
    }
}

// ---------------------------------------------------------------------------
// Wheel
// ---------------------------------------------------------------------------

/// Zoom speed for ctrl+wheel.
pub const CTRL_WHEEL_SPEED: f64 = 10.0;
/// Zoom speed for meta+wheel.
pub const META_WHEEL_SPEED: f64 = 3.0;
/// Zoom speed for alt+wheel.
pub const ALT_WHEEL_SPEED: f64 = 1.0;
/// Wheel delta that, at speed 1, doubles the span.
pub const WHEEL_DELTA_DIVISOR: f64 = 500.0;

/// Modifier keys held during a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WheelModifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

/// One wheel event, with the pointer relative to the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub pointer_x: f64,
    pub modifiers: WheelModifiers,
}

/// What a wheel event should do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WheelAction {
    /// Zoom by `scale` around `anchor` (fraction of the visible width).
    Zoom { scale: f64, anchor: f64 },
    /// Scroll horizontally by `delta_px`.
    Scroll { delta_px: f64 },
    /// Leave the event to the host's native scrolling.
    Native,
}

/// Fraction of `width_px` at `x`, or 0 for an empty container.
#[must_use]
pub fn anchor_fraction(x: f64, width_px: f64) -> f64 {
    if width_px > 0.0 { x / width_px } else { 0.0 }
}

/// Interpret a wheel event: ctrl/meta/alt zoom, shift scrolls sideways.
#[must_use]
pub fn interpret_wheel(input: &WheelInput, width_px: f64) -> WheelAction {
    let m = input.modifiers;
    let speed = if m.ctrl {
        Some(CTRL_WHEEL_SPEED)
    } else if m.meta {
        Some(META_WHEEL_SPEED)
    } else if m.alt {
        Some(ALT_WHEEL_SPEED)
    } else {
        None
    };
    if let Some(speed) = speed {
        return WheelAction::Zoom {
            scale: 1.0 + speed * input.delta_y / WHEEL_DELTA_DIVISOR,
            anchor: anchor_fraction(input.pointer_x, width_px),
        };
    }
    if m.shift {
        // Touchpads report shift+scroll on the y axis, mice on x.
        let delta_px = if input.delta_y != 0.0 {
            input.delta_y
        } else {
            input.delta_x
        };
        return WheelAction::Scroll { delta_px };
    }
    WheelAction::Native
}

// ---------------------------------------------------------------------------
// Pinch & pan
// ---------------------------------------------------------------------------

/// Two-finger pinch tracker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinchTracker {
    last_distance: Option<f64>,
}

impl PinchTracker {
    pub fn start(&mut self, distance: f64) {
        self.last_distance = Some(distance);
    }

    /// Scale and anchor for a new finger distance; `None` when no pinch is
    /// active or either distance is zero.
    pub fn update(&mut self, distance: f64, center_x: f64, width_px: f64) -> Option<(f64, f64)> {
        let last = self.last_distance?;
        if last == 0.0 || distance == 0.0 {
            return None;
        }
        self.last_distance = Some(distance);
        Some((last / distance, anchor_fraction(center_x, width_px)))
    }

    pub fn end(&mut self) {
        self.last_distance = None;
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.last_distance.is_some()
    }
}

/// Background drag-to-pan tracker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanTracker {
    last_x: Option<f64>,
}

impl PanTracker {
    pub fn start(&mut self, x: f64) {
        self.last_x = Some(x);
    }

    /// Scroll delta for a pointer move; dragging right scrolls left.
    pub fn update(&mut self, x: f64) -> Option<f64> {
        let last = self.last_x.replace(x)?;
        Some(last - x)
    }

    pub fn end(&mut self) {
        self.last_x = None;
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.last_x.is_some()
    }
}

// ---------------------------------------------------------------------------
// Scroll
// ---------------------------------------------------------------------------

/// Visible start for horizontal scroll offset `scroll_x` over `viewport`'s
/// canvas at the current zoom.
#[must_use]
pub fn visible_start_for_scroll(viewport: &Viewport, scroll_x: f64) -> Millis {
    if viewport.width_px <= 0.0 {
        return viewport.visible_start;
    }
    let offset = viewport.zoom() as f64 * scroll_x / viewport.width_px;
    viewport.canvas_start + offset.round() as Millis
}
