#![forbid(unsafe_code)]

//! Timeline configuration as data.
//!
//! Captures every tunable of the layout and interaction engine as a single
//! [`TimelineConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # tline.toml
//! drag_snap_millis = 900000
//! row_height_px = 30.0
//! stacking_enabled = true
//! can_resize = "both"
//! ```
//!
//! ```rust,ignore
//! let config = TimelineConfig::from_toml_file("tline.toml")?.validated()?;
//! let config = TimelineConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every field has a default, so a partial document only overrides what it
//! names: 15-minute snap, 30 px rows, 0.65 item height ratio, a 3× canvas
//! buffer, zoom bounded to `[1 hour, 5 years]`, right-edge resizing, and
//! selectable items.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Millis;
use crate::unit::TimeSteps;
use crate::viewport::VisibleRange;

/// Fifteen minutes.
pub const DEFAULT_DRAG_SNAP_MILLIS: Millis = 15 * 60 * 1000;

/// One hour.
pub const DEFAULT_MIN_ZOOM_MILLIS: Millis = 60 * 60 * 1000;

/// Five (Julian-average) years.
pub const DEFAULT_MAX_ZOOM_MILLIS: Millis = 157_766_400_000;

/// Duration floor used for resize clamping when snapping is disabled.
pub const FALLBACK_MIN_DURATION_MILLIS: Millis = 1000;

// ---------------------------------------------------------------------------
// Resize edges
// ---------------------------------------------------------------------------

/// One horizontal edge of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    Left,
    Right,
}

impl fmt::Display for ResizeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Which item edges may be resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdges {
    None,
    Left,
    #[default]
    Right,
    Both,
}

impl ResizeEdges {
    #[must_use]
    pub const fn allows(self, edge: ResizeEdge) -> bool {
        matches!(
            (self, edge),
            (Self::Both, _) | (Self::Left, ResizeEdge::Left) | (Self::Right, ResizeEdge::Right)
        )
    }

    #[must_use]
    pub const fn any(self) -> bool {
        !matches!(self, Self::None)
    }
}

// ---------------------------------------------------------------------------
// TimelineConfig
// ---------------------------------------------------------------------------

/// Tunables for layout, zoom, and interactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Snap granularity for drags and resizes (0 disables snapping).
    pub drag_snap_millis: Millis,
    /// Items narrower than this cannot be resized.
    pub min_resize_width_px: f64,
    /// Height of one stacking slot.
    pub row_height_px: f64,
    /// Item height as a fraction of the row height.
    pub item_height_ratio: f64,
    /// Stack overlapping items into separate slots.
    pub stacking_enabled: bool,
    /// Smallest visible span.
    pub min_zoom_millis: Millis,
    /// Largest visible span.
    pub max_zoom_millis: Millis,
    /// Canvas span as a multiple of the visible span.
    pub buffer_factor: u32,
    /// Dragging may move an item into another group.
    pub can_change_group: bool,
    /// Items may be dragged.
    pub can_move: bool,
    /// Edges that may be resized.
    pub can_resize: ResizeEdges,
    /// Items may be selected; when off, item clicks report nothing.
    pub can_select: bool,
    /// A touch tap on an unselected item reports a click instead of
    /// selecting it.
    pub item_touch_sends_click: bool,
    /// Pointer travel (px) below which a press is still a click.
    pub click_tolerance_px: f64,
    /// Offset applied around drag snapping so calendar-aligned steps stay
    /// aligned to local time.
    pub utc_offset_minutes: i32,
    /// Narrowest column allowed when deriving the time unit.
    pub min_cell_width_px: f64,
    /// Per-unit column step multipliers.
    pub time_steps: TimeSteps,
    /// Visible width assumed before the first container measurement.
    pub initial_width_px: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            drag_snap_millis: DEFAULT_DRAG_SNAP_MILLIS,
            min_resize_width_px: 20.0,
            row_height_px: 30.0,
            item_height_ratio: 0.65,
            stacking_enabled: false,
            min_zoom_millis: DEFAULT_MIN_ZOOM_MILLIS,
            max_zoom_millis: DEFAULT_MAX_ZOOM_MILLIS,
            buffer_factor: 3,
            can_change_group: true,
            can_move: true,
            can_resize: ResizeEdges::Right,
            can_select: true,
            item_touch_sends_click: false,
            click_tolerance_px: 3.0,
            utc_offset_minutes: 0,
            min_cell_width_px: 17.0,
            time_steps: TimeSteps::default(),
            initial_width_px: 1000.0,
        }
    }
}

impl TimelineConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.drag_snap_millis < 0 {
            errors.push(format!(
                "drag_snap_millis must be >= 0, got {}",
                self.drag_snap_millis
            ));
        }
        if !(self.row_height_px > 0.0) {
            errors.push(format!(
                "row_height_px must be > 0, got {}",
                self.row_height_px
            ));
        }
        if !(self.item_height_ratio > 0.0 && self.item_height_ratio <= 1.0) {
            errors.push(format!(
                "item_height_ratio must be in (0, 1], got {}",
                self.item_height_ratio
            ));
        }
        if self.min_zoom_millis <= 0 {
            errors.push(format!(
                "min_zoom_millis must be > 0, got {}",
                self.min_zoom_millis
            ));
        }
        if self.max_zoom_millis < self.min_zoom_millis {
            errors.push(format!(
                "max_zoom_millis ({}) must be >= min_zoom_millis ({})",
                self.max_zoom_millis, self.min_zoom_millis
            ));
        }
        if self.buffer_factor == 0 {
            errors.push("buffer_factor must be >= 1".into());
        }
        if self.min_resize_width_px < 0.0 {
            errors.push(format!(
                "min_resize_width_px must be >= 0, got {}",
                self.min_resize_width_px
            ));
        }
        if self.click_tolerance_px < 0.0 {
            errors.push(format!(
                "click_tolerance_px must be >= 0, got {}",
                self.click_tolerance_px
            ));
        }
        if self.utc_offset_minutes.abs() > 18 * 60 {
            errors.push(format!(
                "utc_offset_minutes must be within ±1080, got {}",
                self.utc_offset_minutes
            ));
        }
        if !(self.min_cell_width_px > 0.0) {
            errors.push(format!(
                "min_cell_width_px must be > 0, got {}",
                self.min_cell_width_px
            ));
        }
        if !(self.initial_width_px > 0.0) {
            errors.push(format!(
                "initial_width_px must be > 0, got {}",
                self.initial_width_px
            ));
        }

        errors
    }

    /// Consume the config, failing if [`validate`](Self::validate) reports
    /// any problem.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// UTC offset in milliseconds.
    #[must_use]
    pub const fn utc_offset_millis(&self) -> Millis {
        self.utc_offset_minutes as Millis * 60_000
    }

    /// Shortest duration an item may be resized to.
    #[must_use]
    pub const fn min_duration_millis(&self) -> Millis {
        if self.drag_snap_millis > 0 {
            self.drag_snap_millis
        } else {
            FALLBACK_MIN_DURATION_MILLIS
        }
    }

    /// Clamp a visible span into `[min_zoom, max_zoom]`.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: Millis) -> Millis {
        zoom.max(self.min_zoom_millis).min(self.max_zoom_millis)
    }
}

// ---------------------------------------------------------------------------
// Initial viewport
// ---------------------------------------------------------------------------

/// How the visible range is seeded at construction.
///
/// Either a default range (uncontrolled) or an explicit visible range
/// (controlled) must be supplied; defaults win when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialViewport {
    pub default_range: Option<VisibleRange>,
    pub visible_range: Option<VisibleRange>,
}

impl InitialViewport {
    #[must_use]
    pub const fn with_default(start: Millis, end: Millis) -> Self {
        Self {
            default_range: Some(VisibleRange::new(start, end)),
            visible_range: None,
        }
    }

    #[must_use]
    pub const fn with_visible(start: Millis, end: Millis) -> Self {
        Self {
            default_range: None,
            visible_range: Some(VisibleRange::new(start, end)),
        }
    }

    /// The range to start from.
    pub fn resolve(&self) -> Result<VisibleRange, ConfigError> {
        self.default_range
            .or(self.visible_range)
            .ok_or(ConfigError::MissingViewport)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or applying configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Neither a default nor an explicit visible range was supplied.
    MissingViewport,
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingViewport => f.write_str(
                "either a default range or a visible range must be provided to initialize the timeline",
            ),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::MissingViewport | Self::Validation(_) => None,
        }
    }
}
