#![forbid(unsafe_code)]

//! Snapping of times and deltas to the drag-snap grid.
//!
//! A snap of `0` (or less) disables snapping: times are floored to whole
//! milliseconds and deltas rounded.

use tline_core::Millis;

/// Floor `time` to the snap grid, aligned to local time at `utc_offset`.
///
/// `floor((time + offset) / snap) * snap - offset`
#[must_use]
pub fn snap_floor(time: f64, snap: Millis, utc_offset: Millis) -> Millis {
    if snap <= 0 {
        return time.floor() as Millis;
    }
    let snap = snap as f64;
    let offset = utc_offset as f64;
    (((time + offset) / snap).floor() * snap - offset) as Millis
}

/// Round `value` to the nearest multiple of `snap`.
#[must_use]
pub fn snap_round(value: f64, snap: Millis) -> Millis {
    if snap <= 0 {
        return value.round() as Millis;
    }
    let snap = snap as f64;
    ((value / snap).round() * snap) as Millis
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUARTER_HOUR: Millis = 900_000;

    #[test]
    fn floor_snaps_to_grid_start() {
        assert_eq!(snap_floor(1_007.0, QUARTER_HOUR, 0), 0);
        assert_eq!(snap_floor(900_001.0, QUARTER_HOUR, 0), 900_000);
        assert_eq!(snap_floor(-1.0, QUARTER_HOUR, 0), -900_000);
    }

    #[test]
    fn floor_honours_utc_offset() {
        let hour = 3_600_000;
        // +00:30 shifts the hourly grid to :30 past every UTC hour.
        assert_eq!(snap_floor(hour as f64, hour, 1_800_000), 1_800_000);
    }

    #[test]
    fn zero_snap_floors_to_millis() {
        assert_eq!(snap_floor(1_007.9, 0, 0), 1_007);
        assert_eq!(snap_round(1_007.5, 0), 1_008);
    }

    #[test]
    fn round_picks_nearest_multiple() {
        assert_eq!(snap_round(449_999.0, QUARTER_HOUR), 0);
        assert_eq!(snap_round(450_001.0, QUARTER_HOUR), QUARTER_HOUR);
        assert_eq!(snap_round(-1_000_000.0, QUARTER_HOUR), -QUARTER_HOUR);
    }
}
