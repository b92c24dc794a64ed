#![forbid(unsafe_code)]

//! Reconciliation of external updates against the current state.
//!
//! [`reconcile`] is a pure decision: given what the timeline currently holds
//! and what the host now supplies, it says whether the canvas must move, the
//! layout must be recomputed, or nothing needs to happen. The
//! [`Timeline`](crate::Timeline) applies the decision once per update.

use serde::{Deserialize, Serialize};
use tline_core::{Group, Item, Viewport, VisibleRange};

/// What an external update requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Reconciliation {
    /// Nothing changed.
    Keep,
    /// Items or groups changed; restack over the current canvas.
    Restack,
    /// A visible range was supplied; run the canvas window, relaying out
    /// unconditionally when `force` is set.
    ScrollCanvas { visible: VisibleRange, force: bool },
}

impl Reconciliation {
    #[must_use]
    pub const fn forces_relayout(&self) -> bool {
        matches!(
            self,
            Self::Restack | Self::ScrollCanvas { force: true, .. }
        )
    }
}

/// Decide how to absorb `next_items`/`next_groups` and an optional
/// host-controlled visible range.
#[must_use]
pub fn reconcile(
    current: &Viewport,
    prev_items: &[Item],
    prev_groups: &[Group],
    next_items: &[Item],
    next_groups: &[Group],
    requested: Option<VisibleRange>,
) -> Reconciliation {
    let force = prev_items != next_items || prev_groups != next_groups;
    if let Some(visible) = requested
        && (force || visible != current.visible())
    {
        return Reconciliation::ScrollCanvas { visible, force };
    }
    if force {
        Reconciliation::Restack
    } else {
        Reconciliation::Keep
    }
}
