#![forbid(unsafe_code)]

//! Visible range and buffered canvas range.
//!
//! # Invariants
//!
//! 1. `canvas_start <= visible_start <= visible_end <= canvas_end` whenever
//!    the viewport was produced by the canvas window.
//! 2. `canvas_span == buffer_factor * visible_span`.
//! 3. `canvas_width_px == width_px * buffer_factor`.

use serde::{Deserialize, Serialize};

use crate::model::Millis;
use crate::time_axis::TimeAxis;

/// A requested or current visible time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: Millis,
    pub end: Millis,
}

impl VisibleRange {
    #[must_use]
    pub const fn new(start: Millis, end: Millis) -> Self {
        Self { start, end }
    }

    /// Visible span ("zoom") in milliseconds.
    #[must_use]
    pub const fn span(&self) -> Millis {
        self.end.saturating_sub(self.start)
    }
}

/// Canonical viewport held by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub visible_start: Millis,
    pub visible_end: Millis,
    pub canvas_start: Millis,
    pub canvas_end: Millis,
    pub width_px: f64,
    pub buffer_factor: u32,
}

impl Viewport {
    #[must_use]
    pub const fn visible(&self) -> VisibleRange {
        VisibleRange::new(self.visible_start, self.visible_end)
    }

    /// Visible span in milliseconds.
    #[must_use]
    pub const fn zoom(&self) -> Millis {
        self.visible_end.saturating_sub(self.visible_start)
    }

    /// Canvas span in milliseconds.
    #[must_use]
    pub const fn canvas_span(&self) -> Millis {
        self.canvas_end.saturating_sub(self.canvas_start)
    }

    /// Width of the rendered canvas in pixels.
    #[must_use]
    pub fn canvas_width(&self) -> f64 {
        self.width_px * f64::from(self.buffer_factor)
    }

    /// Coordinate transform for the current canvas.
    #[must_use]
    pub fn axis(&self) -> TimeAxis {
        TimeAxis::new(self.canvas_start, self.canvas_end, self.canvas_width())
    }

    /// Horizontal scroll offset (pixels) that puts `visible_start` at the
    /// left edge of the scroll surface.
    #[must_use]
    pub fn scroll_left(&self) -> f64 {
        let zoom = self.zoom();
        if zoom <= 0 {
            return 0.0;
        }
        (self.width_px * (self.visible_start - self.canvas_start) as f64 / zoom as f64).round()
    }

    /// Whether the ordering invariant holds.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.canvas_start <= self.visible_start
            && self.visible_start <= self.visible_end
            && self.visible_end <= self.canvas_end
    }
}
