#![forbid(unsafe_code)]

//! Pixel ↔ time coordinate transform over a canvas range.
//!
//! # Invariants
//!
//! 1. `pixel_to_time(0) == canvas_start` and
//!    `pixel_to_time(canvas_width) == canvas_end` (up to float rounding).
//! 2. `time_to_pixel` is the algebraic inverse of `pixel_to_time`.
//! 3. Both functions are pure; identical inputs give bit-identical outputs.
//!
//! # Failure Modes
//!
//! A zero (or negative) canvas width or span degrades to a zero ratio so the
//! transform never produces NaN or infinities.

use crate::model::Millis;

/// Coordinate transform between canvas pixel offsets and timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    canvas_start: Millis,
    canvas_end: Millis,
    canvas_width: f64,
}

impl TimeAxis {
    /// Create an axis mapping `[canvas_start, canvas_end]` onto
    /// `[0, canvas_width]` pixels.
    #[must_use]
    pub const fn new(canvas_start: Millis, canvas_end: Millis, canvas_width: f64) -> Self {
        Self {
            canvas_start,
            canvas_end,
            canvas_width,
        }
    }

    #[must_use]
    pub const fn canvas_start(&self) -> Millis {
        self.canvas_start
    }

    #[must_use]
    pub const fn canvas_end(&self) -> Millis {
        self.canvas_end
    }

    #[must_use]
    pub const fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Canvas span in milliseconds.
    #[must_use]
    pub const fn span(&self) -> Millis {
        self.canvas_end.saturating_sub(self.canvas_start)
    }

    /// Milliseconds covered by one pixel.
    #[inline]
    #[must_use]
    pub fn millis_per_pixel(&self) -> f64 {
        if self.canvas_width <= 0.0 {
            return 0.0;
        }
        self.span() as f64 / self.canvas_width
    }

    /// Pixels covered by one millisecond.
    #[inline]
    #[must_use]
    pub fn pixels_per_milli(&self) -> f64 {
        let span = self.span();
        if span <= 0 {
            return 0.0;
        }
        self.canvas_width / span as f64
    }

    /// Timestamp under canvas pixel offset `px`.
    #[inline]
    #[must_use]
    pub fn pixel_to_time(&self, px: f64) -> f64 {
        self.canvas_start as f64 + px * self.millis_per_pixel()
    }

    /// Canvas pixel offset of timestamp `t`.
    #[inline]
    #[must_use]
    pub fn time_to_pixel(&self, t: f64) -> f64 {
        (t - self.canvas_start as f64) * self.pixels_per_milli()
    }

    /// Pixel offset of an integral timestamp.
    #[inline]
    #[must_use]
    pub fn millis_to_pixel(&self, t: Millis) -> f64 {
        self.time_to_pixel(t as f64)
    }

    /// Pixel width of `[start, end]`; negative for inverted ranges.
    #[must_use]
    pub fn pixel_span(&self, start: Millis, end: Millis) -> f64 {
        self.millis_to_pixel(end) - self.millis_to_pixel(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_to_canvas_edges() {
        let axis = TimeAxis::new(1_000, 4_000, 300.0);
        assert_eq!(axis.pixel_to_time(0.0), 1_000.0);
        assert_eq!(axis.pixel_to_time(300.0), 4_000.0);
        assert_eq!(axis.time_to_pixel(1_000.0), 0.0);
        assert_eq!(axis.time_to_pixel(4_000.0), 300.0);
    }

    #[test]
    fn ratio_is_linear() {
        let axis = TimeAxis::new(0, 1_000, 100.0);
        assert_eq!(axis.millis_per_pixel(), 10.0);
        assert_eq!(axis.pixel_to_time(25.0), 250.0);
        assert_eq!(axis.millis_to_pixel(750), 75.0);
        assert_eq!(axis.pixel_span(100, 300), 20.0);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let axis = TimeAxis::new(1_700_000_000_000, 1_700_086_400_000, 3_000.0);
        let a = axis.pixel_to_time(1234.5678);
        let b = axis.pixel_to_time(1234.5678);
        assert_eq!(a.to_bits(), b.to_bits());
        let p = axis.time_to_pixel(a);
        let q = axis.time_to_pixel(b);
        assert_eq!(p.to_bits(), q.to_bits());
    }

    #[test]
    fn degenerate_axis_never_produces_nan() {
        let zero_width = TimeAxis::new(0, 1_000, 0.0);
        assert_eq!(zero_width.pixel_to_time(50.0), 0.0);
        let zero_span = TimeAxis::new(500, 500, 100.0);
        assert_eq!(zero_span.time_to_pixel(900.0), 0.0);
        assert!(zero_span.pixel_to_time(10.0).is_finite());
    }

    #[test]
    fn round_trip_within_one_pixel_of_resolution() {
        let axis = TimeAxis::new(0, 86_400_000, 3_000.0);
        let resolution = axis.millis_per_pixel();
        for t in (0..86_400_000).step_by(3_600_007) {
            let back = axis.pixel_to_time(axis.time_to_pixel(t as f64));
            assert!((back - t as f64).abs() <= resolution);
        }
    }
}
