#![forbid(unsafe_code)]

//! Canvas window, item stacking, and the column grid.
//!
//! Everything here is a pure function of the viewport and the host's model:
//! the same inputs always produce the same geometry.

pub mod canvas;
pub mod columns;
pub mod stacking;

pub use canvas::{CanvasWindow, ScrollCanvas, canvas_bounds, canvas_width};
pub use columns::{Column, MAX_COLUMNS, iterate_times};
pub use stacking::{
    GroupLayout, InteractionOverride, ItemDimensions, MIN_ITEM_WIDTH_PX, STACK_EPSILON_PX,
    StackInput, StackLayout, collides, group_index_at, stack_items,
};
