#![forbid(unsafe_code)]

//! Core: time axis, data model, viewport, and configuration.
//!
//! # Role in tline
//! `tline-core` is the leaf of the workspace. It owns the pure pixel/time
//! coordinate transform, the host-owned data model (groups and items), the
//! viewport record, and the serde-backed configuration that every other
//! crate reads.
//!
//! # Primary responsibilities
//! - **TimeAxis**: bit-exact pixel ↔ timestamp transform over a canvas range.
//! - **Model**: `Group`, `Item`, and their stable ids.
//! - **Viewport**: visible range + buffered canvas range + width.
//! - **TimelineConfig**: tunables loaded from TOML/JSON with validation.
//! - **TimeUnit**: time granularity derived from pixels-per-unit.
//!
//! # How it fits in the system
//! `tline-layout` turns a viewport and the model into geometry,
//! `tline-interact` turns pointer gestures into proposed item mutations, and
//! `tline` wires both into a host-side state container.

pub mod config;
pub mod logging;
pub mod model;
pub mod time_axis;
pub mod unit;
pub mod viewport;

pub use config::{ConfigError, InitialViewport, ResizeEdge, ResizeEdges, TimelineConfig};
pub use model::{Group, GroupId, Item, ItemId, Millis};
pub use time_axis::TimeAxis;
pub use unit::{TimeSteps, TimeUnit};
pub use viewport::{VisibleRange, Viewport};
