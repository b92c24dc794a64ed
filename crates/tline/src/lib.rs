#![forbid(unsafe_code)]

//! tline public facade crate.
//!
//! [`Timeline`] is the host-side state container: it owns the viewport and
//! the last layout, routes pointer, wheel and scroll input through the
//! engine crates, and reports everything that happened as
//! [`TimelineEvent`]s. The engine itself lives in:
//!
//! - `tline-core`: time axis, data model, viewport, configuration;
//! - `tline-layout`: canvas window, stacking, column grid;
//! - `tline-interact`: zoom, gesture machine, snapping.
//!
//! ```
//! use tline::prelude::*;
//!
//! let groups = vec![Group::new(1, "Crew")];
//! let items = vec![Item::new(1, 1, 0, 3_600_000)];
//! let mut timeline = Timeline::new(
//!     TimelineConfig::default(),
//!     InitialViewport::with_default(0, 86_400_000),
//!     items,
//!     groups,
//! )?;
//! let events = timeline.change_zoom(0.5, 0.0);
//! assert!(!events.is_empty());
//! let pass = timeline.render_pass(0);
//! assert_eq!(pass.items.len(), 1);
//! # Ok::<(), tline::TimelineError>(())
//! ```

use std::fmt;

pub mod children;
pub mod events;
pub mod reconcile;
pub mod render;
pub mod timeline;

// --- Core re-exports -------------------------------------------------------

pub use tline_core::{
    ConfigError, Group, GroupId, InitialViewport, Item, ItemId, Millis, ResizeEdge, ResizeEdges,
    TimeAxis, TimeSteps, TimeUnit, TimelineConfig, Viewport, VisibleRange,
};

// --- Layout re-exports -----------------------------------------------------

pub use tline_layout::{
    CanvasWindow, Column, GroupLayout, InteractionOverride, ItemDimensions, StackLayout,
    iterate_times, stack_items,
};

// --- Interaction re-exports ------------------------------------------------

pub use tline_interact::{
    HitZone, InteractionEffect, InteractionState, MoveResizeValidator, PointerEvent, PointerKind,
    ScrollSurface, ValidatorAction, WheelInput, WheelModifiers, ZoomController,
};

// --- Host re-exports -------------------------------------------------------

pub use children::{ChildSpec, MarkerKind, MarkerPosition, ResolvedChildren};
pub use events::{ApplyTimeChange, TimeChange, TimeChangeHandler, TimelineEvent};
pub use reconcile::Reconciliation;
pub use render::RenderPass;
pub use timeline::Timeline;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for tline hosts.
#[derive(Debug)]
pub enum TimelineError {
    /// Invalid configuration or initial viewport.
    Config(ConfigError),
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "timeline config: {err}"),
        }
    }
}

impl std::error::Error for TimelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for TimelineError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for tline APIs.
pub type Result<T> = std::result::Result<T, TimelineError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ChildSpec, Group, GroupId, InitialViewport, Item, ItemId, Millis, PointerEvent,
        RenderPass, ScrollSurface, TimeChange, Timeline, TimelineConfig, TimelineEvent,
        VisibleRange, WheelInput,
    };
}
