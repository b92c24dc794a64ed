#![forbid(unsafe_code)]

//! Time granularity derived from pixels-per-unit.
//!
//! [`min_unit`] picks the finest unit whose cells would not be narrower than
//! the configured minimum cell width. The presentational layer uses it for
//! header labels and column lines; the host reports a change of unit as an
//! event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Millis;

/// Calendar unit, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl TimeUnit {
    /// All units, finest first.
    pub const ALL: [Self; 6] = [
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Month,
        Self::Year,
    ];

    /// Factor from the previous (finer) unit; milliseconds for `Second`.
    #[must_use]
    pub const fn divider(self) -> f64 {
        match self {
            Self::Second => 1000.0,
            Self::Minute => 60.0,
            Self::Hour => 60.0,
            Self::Day => 24.0,
            Self::Month => 30.0,
            Self::Year => 12.0,
        }
    }

    /// Nominal length in milliseconds (months are 30 days, years 360).
    #[must_use]
    pub const fn nominal_millis(self) -> Millis {
        match self {
            Self::Second => 1_000,
            Self::Minute => 60_000,
            Self::Hour => 3_600_000,
            Self::Day => 86_400_000,
            Self::Month => 30 * 86_400_000,
            Self::Year => 360 * 86_400_000,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step multiplier per unit (e.g. `minute = 15` draws a column every 15
/// minutes). A zero step disables the minimum-cell-width check for that unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSteps {
    pub second: u32,
    pub minute: u32,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl Default for TimeSteps {
    fn default() -> Self {
        Self {
            second: 1,
            minute: 1,
            hour: 1,
            day: 1,
            month: 1,
            year: 1,
        }
    }
}

impl TimeSteps {
    #[must_use]
    pub const fn get(&self, unit: TimeUnit) -> u32 {
        match unit {
            TimeUnit::Second => self.second,
            TimeUnit::Minute => self.minute,
            TimeUnit::Hour => self.hour,
            TimeUnit::Day => self.day,
            TimeUnit::Month => self.month,
            TimeUnit::Year => self.year,
        }
    }
}

/// Finest unit whose cells are at least `min_cell_width` pixels wide when
/// `zoom` milliseconds span `width_px` pixels. Falls back to `Year`.
#[must_use]
pub fn min_unit(zoom: Millis, width_px: f64, steps: &TimeSteps, min_cell_width: f64) -> TimeUnit {
    let mut break_count = zoom as f64;
    for unit in TimeUnit::ALL {
        break_count /= unit.divider();
        let step = steps.get(unit);
        let cell_count = break_count / f64::from(step.max(1));
        let count_needed = width_px / if step > 0 { min_cell_width } else { 1.0 };
        if cell_count < count_needed {
            return unit;
        }
    }
    TimeUnit::Year
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Millis = 3_600_000;
    const DAY: Millis = 24 * HOUR;

    #[test]
    fn one_hour_over_1000px_is_hour() {
        // 60 minute cells still fit (≥ 58.8 needed); a single hour cell does not.
        let unit = min_unit(HOUR, 1000.0, &TimeSteps::default(), 17.0);
        assert_eq!(unit, TimeUnit::Hour);
    }

    #[test]
    fn narrow_zoom_picks_seconds() {
        let unit = min_unit(10_000, 1000.0, &TimeSteps::default(), 17.0);
        assert_eq!(unit, TimeUnit::Second);
    }

    #[test]
    fn week_over_1000px_is_day() {
        let unit = min_unit(7 * DAY, 1000.0, &TimeSteps::default(), 17.0);
        assert_eq!(unit, TimeUnit::Day);
    }

    #[test]
    fn huge_zoom_falls_back_to_year() {
        let unit = min_unit(1_000 * 365 * DAY, 10.0, &TimeSteps::default(), 17.0);
        assert_eq!(unit, TimeUnit::Year);
    }

    #[test]
    fn step_multiplier_reduces_cell_count() {
        let plain = min_unit(2 * DAY, 1000.0, &TimeSteps::default(), 17.0);
        assert_eq!(plain, TimeUnit::Hour);
        let steps = TimeSteps {
            minute: 60,
            ..TimeSteps::default()
        };
        assert_eq!(min_unit(2 * DAY, 1000.0, &steps, 17.0), TimeUnit::Minute);
    }

    #[test]
    fn unit_order_is_finest_first() {
        assert!(TimeUnit::Second < TimeUnit::Minute);
        assert!(TimeUnit::Month < TimeUnit::Year);
        assert_eq!(TimeUnit::Day.to_string(), "day");
    }
}
