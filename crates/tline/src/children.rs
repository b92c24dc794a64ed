#![forbid(unsafe_code)]

//! Declarative timeline children (headers and markers).
//!
//! Children are described once as [`ChildSpec`] values and folded into a
//! [`ResolvedChildren`] record at construction; render passes only read the
//! resolved record.

use serde::{Deserialize, Serialize};
use tline_core::{Millis, TimeAxis};

/// One declared child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChildSpec {
    /// Date header rows above the canvas.
    Headers,
    /// Vertical line at the current time.
    TodayMarker,
    /// Vertical line at a fixed time.
    CustomMarker { at: Millis },
    /// Vertical line following the pointer while it hovers the canvas.
    CursorMarker,
}

/// Children folded into what a render pass needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedChildren {
    pub headers: bool,
    pub today_marker: bool,
    pub custom_markers: Vec<Millis>,
    pub cursor_marker: bool,
}

/// Fold `specs` into a [`ResolvedChildren`]. Custom markers keep their
/// declaration order; duplicates of the flag-like children collapse.
#[must_use]
pub fn resolve_children(specs: &[ChildSpec]) -> ResolvedChildren {
    let mut resolved = ResolvedChildren::default();
    for spec in specs {
        match *spec {
            ChildSpec::Headers => resolved.headers = true,
            ChildSpec::TodayMarker => resolved.today_marker = true,
            ChildSpec::CustomMarker { at } => resolved.custom_markers.push(at),
            ChildSpec::CursorMarker => resolved.cursor_marker = true,
        }
    }
    resolved
}

/// Which marker a position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Today,
    Custom,
    Cursor,
}

/// A marker placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    pub kind: MarkerKind,
    pub time: Millis,
    pub left: f64,
}

impl ResolvedChildren {
    /// Marker positions on `axis`; markers outside the canvas are dropped.
    #[must_use]
    pub fn markers(&self, axis: &TimeAxis, now: Millis, cursor: Option<Millis>) -> Vec<MarkerPosition> {
        let today = self.today_marker.then_some((MarkerKind::Today, now));
        let custom = self
            .custom_markers
            .iter()
            .map(|&at| (MarkerKind::Custom, at));
        let cursor = cursor
            .filter(|_| self.cursor_marker)
            .map(|at| (MarkerKind::Cursor, at));

        today
            .into_iter()
            .chain(custom)
            .chain(cursor)
            .filter(|&(_, time)| time >= axis.canvas_start() && time <= axis.canvas_end())
            .map(|(kind, time)| MarkerPosition {
                kind,
                time,
                left: axis.millis_to_pixel(time),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_once_in_declaration_order() {
        let resolved = resolve_children(&[
            ChildSpec::CustomMarker { at: 30 },
            ChildSpec::Headers,
            ChildSpec::CustomMarker { at: 10 },
            ChildSpec::TodayMarker,
            ChildSpec::TodayMarker,
        ]);
        assert!(resolved.headers);
        assert!(resolved.today_marker);
        assert!(!resolved.cursor_marker);
        assert_eq!(resolved.custom_markers, vec![30, 10]);
    }

    #[test]
    fn markers_outside_canvas_are_dropped() {
        let resolved = resolve_children(&[
            ChildSpec::TodayMarker,
            ChildSpec::CustomMarker { at: 500 },
            ChildSpec::CustomMarker { at: 5_000 },
            ChildSpec::CursorMarker,
        ]);
        let axis = TimeAxis::new(0, 1_000, 100.0);
        let markers = resolved.markers(&axis, 250, Some(900));
        assert_eq!(
            markers,
            vec![
                MarkerPosition {
                    kind: MarkerKind::Today,
                    time: 250,
                    left: 25.0
                },
                MarkerPosition {
                    kind: MarkerKind::Custom,
                    time: 500,
                    left: 50.0
                },
                MarkerPosition {
                    kind: MarkerKind::Cursor,
                    time: 900,
                    left: 90.0
                },
            ]
        );
    }

    #[test]
    fn cursor_needs_declared_marker() {
        let resolved = resolve_children(&[ChildSpec::Headers]);
        let axis = TimeAxis::new(0, 1_000, 100.0);
        assert!(resolved.markers(&axis, 0, Some(10)).is_empty());
    }

    #[test]
    fn specs_deserialize_from_tagged_json() {
        let specs: Vec<ChildSpec> =
            serde_json::from_str(r#"[{"kind":"headers"},{"kind":"custom_marker","at":42}]"#)
                .unwrap();
        assert_eq!(specs, vec![ChildSpec::Headers, ChildSpec::CustomMarker { at: 42 }]);
    }
}
