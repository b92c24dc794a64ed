#![forbid(unsafe_code)]

//! Zoom control, snapping, and the drag/resize interaction machine.
//!
//! Nothing in this crate mutates host data: zoom functions return the next
//! visible range, and the interaction machine returns previews and commits
//! for the host to apply.

pub mod machine;
pub mod snap;
pub mod validator;
pub mod zoom;

pub use machine::{
    CancelReason, HitZone, InteractionContext, InteractionEffect, InteractionMachine,
    InteractionState, InteractionTransition, NoopReason, PointerEvent, PointerKind, ScrollSurface,
    step,
};
pub use snap::{snap_floor, snap_round};
pub use validator::{MoveResizeValidator, ValidatorAction, apply_validator};
pub use zoom::{
    PanTracker, PinchTracker, WheelAction, WheelInput, WheelModifiers, ZoomController,
    interpret_wheel, visible_start_for_scroll,
};
