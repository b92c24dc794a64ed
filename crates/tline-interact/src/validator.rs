#![forbid(unsafe_code)]

//! Host-supplied veto/adjust hook for moves and resizes.
//!
//! The validator sees the item as stored by the host plus the proposed time
//! and returns the time to use instead. Its answer is authoritative: the
//! machine previews and commits whatever it returns, without re-snapping.

use serde::{Deserialize, Serialize};
use tline_core::{Item, Millis, ResizeEdge};

/// Which gesture is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorAction {
    Move,
    Resize,
}

/// Adjusts a proposed move start or resize edge time.
pub trait MoveResizeValidator {
    /// Return the time to use for `item`; `edge` is `Some` for resizes.
    fn validate(
        &self,
        action: ValidatorAction,
        item: &Item,
        time: Millis,
        edge: Option<ResizeEdge>,
    ) -> Millis;
}

impl<F> MoveResizeValidator for F
where
    F: Fn(ValidatorAction, &Item, Millis, Option<ResizeEdge>) -> Millis,
{
    fn validate(
        &self,
        action: ValidatorAction,
        item: &Item,
        time: Millis,
        edge: Option<ResizeEdge>,
    ) -> Millis {
        self(action, item, time, edge)
    }
}

/// Run `validator` if present, otherwise pass `time` through.
#[must_use]
pub fn apply_validator(
    validator: Option<&dyn MoveResizeValidator>,
    action: ValidatorAction,
    item: &Item,
    time: Millis,
    edge: Option<ResizeEdge>,
) -> Millis {
    match validator {
        Some(validator) => validator.validate(action, item, time, edge),
        None => time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_validators() {
        let no_past = |_: ValidatorAction, _: &Item, time: Millis, _: Option<ResizeEdge>| {
            time.max(0)
        };
        let validator: &dyn MoveResizeValidator = &no_past;
        let item = Item::new(1, 1, 0, 10);
        assert_eq!(
            apply_validator(Some(validator), ValidatorAction::Move, &item, -5, None),
            0
        );
    }

    #[test]
    fn absent_validator_passes_through() {
        let item = Item::new(1, 1, 0, 10);
        assert_eq!(
            apply_validator(None, ValidatorAction::Resize, &item, 42, Some(ResizeEdge::Left)),
            42
        );
    }
}
