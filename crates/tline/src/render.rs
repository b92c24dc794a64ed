#![forbid(unsafe_code)]

//! Per-pass output for the presentational layer.

use serde::{Deserialize, Serialize};
use tline_core::{ItemId, Millis, TimeUnit};
use tline_interact::InteractionState;
use tline_layout::{Column, GroupLayout, ItemDimensions};

use crate::children::MarkerPosition;

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPass {
    pub canvas_start: Millis,
    pub canvas_end: Millis,
    pub canvas_width: f64,
    pub visible_start: Millis,
    pub visible_end: Millis,
    pub items: Vec<ItemDimensions>,
    pub groups: Vec<GroupLayout>,
    pub total_height: f64,
    pub unit: TimeUnit,
    pub columns: Vec<Column>,
    pub markers: Vec<MarkerPosition>,
    pub headers: bool,
    pub scroll_left: f64,
    pub selected: Vec<ItemId>,
    pub interaction: InteractionState,
}

impl RenderPass {
    /// Geometry for `item`, if it is on the canvas.
    #[must_use]
    pub fn item(&self, item: ItemId) -> Option<&ItemDimensions> {
        self.items.iter().find(|d| d.item == item)
    }
}
