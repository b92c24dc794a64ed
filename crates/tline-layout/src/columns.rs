#![forbid(unsafe_code)]

//! Calendar-aligned column grid over the canvas.
//!
//! Columns start at the last unit boundary at or before `canvas_start`
//! (local time, per the configured UTC offset) and advance by
//! `unit * step` until they pass `canvas_end`. Months and years use real
//! calendar lengths.
//!
//! # Failure Modes
//!
//! An out-of-range offset or timestamp yields an empty grid. The grid is
//! capped at [`MAX_COLUMNS`] entries.

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, TimeDelta, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use tline_core::{Millis, TimeAxis, TimeSteps, TimeUnit};

/// Upper bound on the number of generated columns.
pub const MAX_COLUMNS: usize = 10_000;

/// One vertical grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub start: Millis,
    pub end: Millis,
    pub left: f64,
    pub width: f64,
}

/// Build the column grid for `axis` at `unit` granularity.
#[must_use]
pub fn iterate_times(
    axis: &TimeAxis,
    unit: TimeUnit,
    steps: &TimeSteps,
    utc_offset_minutes: i32,
) -> Vec<Column> {
    let Some(offset) = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)) else {
        return Vec::new();
    };
    let step = steps.get(unit).max(1);
    let Some(first) = offset
        .timestamp_millis_opt(axis.canvas_start())
        .single()
        .and_then(|dt| floor_to_unit(dt, unit, step))
    else {
        return Vec::new();
    };

    let mut columns = Vec::new();
    let mut cursor = first;
    while cursor.timestamp_millis() < axis.canvas_end() && columns.len() < MAX_COLUMNS {
        let Some(next) = advance(cursor, unit, step) else {
            break;
        };
        let start = cursor.timestamp_millis();
        let end = next.timestamp_millis();
        let left = axis.millis_to_pixel(start);
        columns.push(Column {
            start,
            end,
            left,
            width: axis.millis_to_pixel(end) - left,
        });
        cursor = next;
    }

    tracing::trace!(
        target: "tline.layout",
        unit = %unit,
        step,
        columns = columns.len(),
        "column grid built"
    );
    columns
}

fn floor_to_unit(
    dt: DateTime<FixedOffset>,
    unit: TimeUnit,
    step: u32,
) -> Option<DateTime<FixedOffset>> {
    let floor = |value: u32, base: u32| value - (value - base) % step;
    let (mut year, mut month, mut day) = (dt.year(), dt.month(), dt.day());
    let (mut hour, mut minute, mut second) = (dt.hour(), dt.minute(), dt.second());

    match unit {
        TimeUnit::Second => second = floor(second, 0),
        TimeUnit::Minute => {
            second = 0;
            minute = floor(minute, 0);
        }
        TimeUnit::Hour => {
            (second, minute) = (0, 0);
            hour = floor(hour, 0);
        }
        TimeUnit::Day => {
            (second, minute, hour) = (0, 0, 0);
            day = floor(day, 1);
        }
        TimeUnit::Month => {
            (second, minute, hour, day) = (0, 0, 0, 1);
            month = floor(month, 1);
        }
        TimeUnit::Year => {
            (second, minute, hour, day, month) = (0, 0, 0, 1, 1);
            year -= year.rem_euclid(step as i32);
        }
    }

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    dt.offset().from_local_datetime(&naive).single()
}

fn advance(
    dt: DateTime<FixedOffset>,
    unit: TimeUnit,
    step: u32,
) -> Option<DateTime<FixedOffset>> {
    match unit {
        TimeUnit::Month => dt.checked_add_months(Months::new(step)),
        TimeUnit::Year => dt.checked_add_months(Months::new(step.checked_mul(12)?)),
        fixed => {
            let millis = fixed.nominal_millis().checked_mul(Millis::from(step))?;
            dt.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
        }
    }
}
