//! End-to-end flows through the timeline host.
//!
//! Fixture geometry: visible range 0..10 h over 1000 px with a 3x buffer, so
//! the canvas spans -10 h..20 h over 3000 px, one pixel is 36 s, and with the
//! surface at the origin a screen x maps to `x * 36 s`.

use tline::prelude::*;
use tline::{
    ConfigError, HitZone, InteractionState, PointerKind, ResizeEdge, TimeUnit, TimelineError,
    ValidatorAction, WheelModifiers,
};

const MINUTE: Millis = 60_000;
const HOUR: Millis = 60 * MINUTE;
const DAY: Millis = 24 * HOUR;

fn config() -> TimelineConfig {
    TimelineConfig {
        stacking_enabled: true,
        initial_width_px: 1_000.0,
        ..TimelineConfig::default()
    }
}

fn groups() -> Vec<Group> {
    vec![Group::new(1, "A"), Group::new(2, "B")]
}

fn items() -> Vec<Item> {
    vec![
        Item::new(1, 1, HOUR, 2 * HOUR),
        Item::new(2, 2, 3 * HOUR, 4 * HOUR),
    ]
}

fn timeline() -> Timeline {
    Timeline::new(
        config(),
        InitialViewport::with_default(0, 10 * HOUR),
        items(),
        groups(),
    )
    .unwrap()
}

fn down(item: u64, hit: HitZone, x: f64, y: f64) -> PointerEvent {
    PointerEvent::Down {
        item: ItemId::new(item),
        hit,
        kind: PointerKind::Mouse,
        x,
        y,
    }
}

fn touch(item: u64, x: f64, y: f64) -> PointerEvent {
    PointerEvent::Down {
        item: ItemId::new(item),
        hit: HitZone::Body,
        kind: PointerKind::Touch,
        x,
        y,
    }
}

/// Click item 1 once so it becomes selected.
fn select_first(tl: &mut Timeline) {
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    tl.pointer(PointerEvent::Up { x: 120.0, y: 10.0 });
    assert_eq!(tl.selected(), &[ItemId::new(1)]);
}

#[test]
fn construction_requires_a_viewport() {
    let err = Timeline::new(config(), InitialViewport::default(), items(), groups()).unwrap_err();
    assert!(matches!(
        err,
        TimelineError::Config(ConfigError::MissingViewport)
    ));
}

#[test]
fn construction_rejects_invalid_config() {
    let bad = TimelineConfig {
        row_height_px: -1.0,
        ..config()
    };
    let err = Timeline::new(bad, InitialViewport::with_default(0, HOUR), items(), groups())
        .unwrap_err();
    assert!(matches!(err, TimelineError::Config(ConfigError::Validation(_))));
}

#[test]
fn overlapping_items_stack_within_their_group() {
    let items = vec![
        Item::new(1, 1, 0, 100 * MINUTE),
        Item::new(2, 1, 50 * MINUTE, 150 * MINUTE),
        Item::new(3, 2, 0, 100 * MINUTE),
    ];
    let tl = Timeline::new(
        TimelineConfig {
            row_height_px: 30.0,
            ..config()
        },
        InitialViewport::with_default(0, 10 * HOUR),
        items,
        groups(),
    )
    .unwrap();

    let pass = tl.render_pass(0);
    assert_eq!(pass.item(ItemId::new(1)).unwrap().stack_slot, 0);
    assert_eq!(pass.item(ItemId::new(2)).unwrap().stack_slot, 1);
    assert_eq!(pass.item(ItemId::new(3)).unwrap().stack_slot, 0);
    assert_eq!(pass.groups[0].height, 60.0);
    assert_eq!(pass.groups[1].height, 30.0);
    assert_eq!(pass.groups[1].top, 60.0);
    assert_eq!(pass.total_height, 90.0);
}

#[test]
fn click_selects_then_reports_clicks() {
    let mut tl = timeline();
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    let events = tl.pointer(PointerEvent::Up { x: 120.0, y: 10.0 });
    // 1.2 h floored to the 15 min grid.
    assert_eq!(
        events,
        vec![TimelineEvent::ItemSelect {
            item: ItemId::new(1),
            time: HOUR,
        }]
    );

    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    let events = tl.pointer(PointerEvent::Up { x: 120.0, y: 10.0 });
    assert_eq!(
        events,
        vec![TimelineEvent::ItemClick {
            item: ItemId::new(1),
            time: HOUR,
        }]
    );

    let events = tl.canvas_click(500.0, 10.0);
    assert_eq!(events[0], TimelineEvent::ItemDeselect);
    assert_eq!(
        events[1],
        TimelineEvent::CanvasClick {
            group: GroupId::new(1),
            time: 5 * HOUR,
        }
    );
}

#[test]
fn unselected_item_does_not_drag() {
    let mut tl = timeline();
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    let events = tl.pointer(PointerEvent::Move { x: 170.0, y: 10.0 });
    assert!(events.is_empty());
    assert!(matches!(
        tl.interaction_state(),
        InteractionState::Pressed { .. }
    ));
}

#[test]
fn touch_tap_sends_click_when_configured() {
    let mut tl = Timeline::new(
        TimelineConfig {
            item_touch_sends_click: true,
            ..config()
        },
        InitialViewport::with_default(0, 10 * HOUR),
        items(),
        groups(),
    )
    .unwrap();
    tl.pointer(touch(1, 120.0, 10.0));
    let events = tl.pointer(PointerEvent::Up { x: 120.0, y: 10.0 });
    assert_eq!(
        events,
        vec![TimelineEvent::ItemClick {
            item: ItemId::new(1),
            time: HOUR,
        }]
    );
    assert!(tl.selected().is_empty());

    // A mouse click still selects.
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    let events = tl.pointer(PointerEvent::Up { x: 120.0, y: 10.0 });
    assert!(matches!(events[0], TimelineEvent::ItemSelect { .. }));
}

#[test]
fn touch_tap_selects_by_default() {
    let mut tl = timeline();
    tl.pointer(touch(1, 120.0, 10.0));
    let events = tl.pointer(PointerEvent::Up { x: 120.0, y: 10.0 });
    assert!(matches!(events[0], TimelineEvent::ItemSelect { .. }));
    assert!(tl.is_selected(ItemId::new(1)));
}

#[test]
fn clicks_report_nothing_when_selection_disabled() {
    let mut tl = Timeline::new(
        TimelineConfig {
            can_select: false,
            ..config()
        },
        InitialViewport::with_default(0, 10 * HOUR),
        items(),
        groups(),
    )
    .unwrap();
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    assert!(tl.pointer(PointerEvent::Up { x: 120.0, y: 10.0 }).is_empty());
    assert!(tl.selected().is_empty());

    // Never selected, so never draggable.
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    assert!(tl.pointer(PointerEvent::Move { x: 170.0, y: 10.0 }).is_empty());
}

#[test]
fn every_controlled_selection_entry_can_drag() {
    let mut tl = timeline();
    tl.set_selected(&[ItemId::new(1), ItemId::new(2)]);
    tl.pointer(down(2, HitZone::Body, 320.0, 40.0));
    let events = tl.pointer(PointerEvent::Move { x: 370.0, y: 40.0 });
    assert_eq!(
        events,
        vec![TimelineEvent::DragPreview {
            item: ItemId::new(2),
            time: 210 * MINUTE,
            group: GroupId::new(2),
        }]
    );
    assert_eq!(tl.render_pass(0).selected, vec![ItemId::new(1), ItemId::new(2)]);
}

#[test]
fn canvas_pan_is_ignored_during_item_drag() {
    let mut tl = timeline();
    select_first(&mut tl);

    // A pan already in progress ends when an item is pressed.
    tl.pan_start(500.0);
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    tl.pointer(PointerEvent::Move { x: 170.0, y: 10.0 });
    assert!(tl.pan_move(450.0).is_empty());

    // A pan started mid-drag never begins.
    tl.pan_start(500.0);
    assert!(tl.pan_move(450.0).is_empty());
    assert_eq!(tl.viewport().visible_start, 0);
    assert_eq!(tl.scroll_left(), 1_000.0);

    let events = tl.pointer(PointerEvent::Up { x: 170.0, y: 10.0 });
    assert!(matches!(events[0], TimelineEvent::MoveCommit { .. }));
    assert!(tl.pan_move(400.0).is_empty());
    assert_eq!(tl.viewport().visible_start, 0);
}

#[test]
fn drag_previews_then_commits_across_groups() {
    let mut tl = timeline();
    select_first(&mut tl);

    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    let events = tl.pointer(PointerEvent::Move { x: 170.0, y: 40.0 });
    // Grabbed 0.2 h into the item; pointer at 1.7 h, start at 1.5 h.
    assert_eq!(
        events,
        vec![TimelineEvent::DragPreview {
            item: ItemId::new(1),
            time: 90 * MINUTE,
            group: GroupId::new(2),
        }]
    );
    let preview = tl.layout().dimensions(ItemId::new(1)).unwrap();
    assert_eq!(preview.group, GroupId::new(2));

    let events = tl.pointer(PointerEvent::Up { x: 170.0, y: 40.0 });
    assert_eq!(
        events,
        vec![TimelineEvent::MoveCommit {
            item: ItemId::new(1),
            time: 90 * MINUTE,
            group: GroupId::new(2),
        }]
    );
    assert!(tl.interaction_state().is_idle());
    // The host has not applied the move yet, so the layout shows the
    // stored item again.
    let settled = tl.layout().dimensions(ItemId::new(1)).unwrap();
    assert_eq!(settled.group, GroupId::new(1));
}

#[test]
fn explicit_cancel_discards_drag() {
    let mut tl = timeline();
    select_first(&mut tl);
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    tl.pointer(PointerEvent::Move { x: 170.0, y: 40.0 });
    let events = tl.pointer(PointerEvent::Cancel);
    assert!(events.is_empty());
    assert!(tl.interaction_state().is_idle());
    assert_eq!(
        tl.layout().dimensions(ItemId::new(1)).unwrap().group,
        GroupId::new(1)
    );
}

#[test]
fn resize_handle_moves_right_edge() {
    let mut tl = timeline();
    select_first(&mut tl);

    tl.pointer(down(1, HitZone::ResizeHandle, 200.0, 10.0));
    let events = tl.pointer(PointerEvent::Move { x: 225.0, y: 10.0 });
    assert_eq!(
        events,
        vec![TimelineEvent::ResizePreview {
            item: ItemId::new(1),
            time: 2 * HOUR + 15 * MINUTE,
            edge: ResizeEdge::Right,
        }]
    );
    let preview = tl.layout().dimensions(ItemId::new(1)).unwrap();
    assert!((preview.width - 125.0).abs() < 1e-9);

    let events = tl.pointer(PointerEvent::Up { x: 225.0, y: 10.0 });
    assert_eq!(
        events,
        vec![TimelineEvent::ResizeCommit {
            item: ItemId::new(1),
            time: 2 * HOUR + 15 * MINUTE,
            edge: ResizeEdge::Right,
            delta: 15 * MINUTE,
        }]
    );
}

#[test]
fn validator_answer_is_committed_verbatim() {
    let mut tl = timeline().with_validator(
        |action: ValidatorAction, _: &Item, time: Millis, edge: Option<ResizeEdge>| -> Millis {
            match (action, edge) {
                (ValidatorAction::Move, None) => -5 * HOUR,
                (ValidatorAction::Resize, Some(ResizeEdge::Right)) => 3 * HOUR,
                _ => time,
            }
        },
    );
    select_first(&mut tl);
    tl.pointer(down(1, HitZone::Body, 120.0, 10.0));
    tl.pointer(PointerEvent::Move { x: 170.0, y: 10.0 });
    let events = tl.pointer(PointerEvent::Up { x: 170.0, y: 10.0 });
    assert_eq!(
        events,
        vec![TimelineEvent::MoveCommit {
            item: ItemId::new(1),
            time: -5 * HOUR,
            group: GroupId::new(1),
        }]
    );

    tl.pointer(down(1, HitZone::ResizeHandle, 200.0, 10.0));
    tl.pointer(PointerEvent::Move { x: 225.0, y: 10.0 });
    let events = tl.pointer(PointerEvent::Up { x: 225.0, y: 10.0 });
    assert_eq!(
        events,
        vec![TimelineEvent::ResizeCommit {
            item: ItemId::new(1),
            time: 3 * HOUR,
            edge: ResizeEdge::Right,
            delta: HOUR,
        }]
    );
}

#[test]
fn zoom_in_clamps_to_min_zoom() {
    let mut tl = timeline();
    tl.change_zoom(0.01, 0.5);
    assert_eq!(tl.viewport().zoom(), HOUR);
    assert_eq!(tl.viewport().visible_start, 9 * HOUR / 2);
    assert!(tl.viewport().is_consistent());
}

#[test]
fn ctrl_wheel_zooms_around_pointer() {
    let mut tl = timeline();
    let events = tl.wheel(WheelInput {
        delta_y: 50.0,
        pointer_x: 500.0,
        modifiers: WheelModifiers {
            ctrl: true,
            ..WheelModifiers::default()
        },
        ..WheelInput::default()
    });
    assert_eq!(tl.viewport().visible_start, -5 * HOUR);
    assert_eq!(tl.viewport().visible_end, 15 * HOUR);
    assert!(events.iter().any(|e| matches!(e, TimelineEvent::Zoom { .. })));
}

#[test]
fn shift_wheel_scrolls_sideways() {
    let mut tl = timeline();
    tl.wheel(WheelInput {
        delta_y: 100.0,
        modifiers: WheelModifiers {
            shift: true,
            ..WheelModifiers::default()
        },
        ..WheelInput::default()
    });
    assert_eq!(tl.viewport().visible_start, HOUR);
    assert_eq!(tl.viewport().zoom(), 10 * HOUR);
}

#[test]
fn plain_wheel_is_left_to_the_host() {
    let mut tl = timeline();
    let events = tl.wheel(WheelInput {
        delta_y: 100.0,
        ..WheelInput::default()
    });
    assert!(events.is_empty());
}

#[test]
fn pinch_out_zooms_in() {
    let mut tl = timeline();
    tl.pinch_start(100.0);
    tl.pinch_move(200.0, 0.0);
    tl.pinch_end();
    assert_eq!(tl.viewport().visible_start, 0);
    assert_eq!(tl.viewport().zoom(), 5 * HOUR);
    assert!(tl.pinch_move(400.0, 0.0).is_empty());
}

#[test]
fn drag_pan_scrolls_against_the_pointer() {
    let mut tl = timeline();
    tl.pan_start(500.0);
    tl.pan_move(450.0);
    tl.pan_end();
    assert_eq!(tl.viewport().visible_start, 30 * MINUTE);
    assert_eq!(tl.scroll_left(), 1_050.0);
}

#[test]
fn wide_period_changes_unit() {
    let mut tl = timeline();
    assert_eq!(tl.unit(), TimeUnit::Hour);
    let events = tl.show_period(0, 5 * DAY);
    assert_eq!(events.last(), Some(&TimelineEvent::UnitChange { unit: TimeUnit::Day }));
    assert_eq!(tl.render_pass(0).unit, TimeUnit::Day);
}

#[test]
fn overlong_period_keeps_its_start_at_max_zoom() {
    let mut tl = timeline();
    let max_zoom = tl.config().max_zoom_millis;
    tl.show_period(DAY, DAY + 2 * max_zoom);
    assert_eq!(tl.viewport().visible_start, DAY);
    assert_eq!(tl.viewport().zoom(), max_zoom);
    assert!(tl.viewport().is_consistent());
}

#[test]
fn short_period_is_ignored() {
    let mut tl = timeline();
    assert!(tl.show_period(0, 10 * MINUTE).is_empty());
    assert_eq!(tl.viewport().zoom(), 10 * HOUR);
}

#[test]
fn resize_reports_canvas_and_recentres_scroll() {
    let mut tl = timeline();
    let events = tl.resize(2_000.0);
    assert_eq!(
        events,
        vec![TimelineEvent::CanvasResize {
            canvas_width: 6_000.0,
            visible_width: 2_000.0,
            height: tl.layout().total_height,
        }]
    );
    assert_eq!(tl.scroll_left(), 2_000.0);
    let item = tl.layout().dimensions(ItemId::new(1)).unwrap();
    assert!((item.left - 2_200.0).abs() < 1e-9);
}

#[test]
fn reconcile_restacks_on_new_items() {
    let mut tl = timeline();
    let mut next = items();
    next.push(Item::new(3, 1, HOUR, 2 * HOUR));
    let events = tl.reconcile(next, groups(), None);
    assert!(events.is_empty());
    assert_eq!(tl.layout().items.len(), 3);
    assert_eq!(tl.layout().dimensions(ItemId::new(3)).unwrap().stack_slot, 1);
}

#[test]
fn controlled_range_moves_canvas() {
    let mut tl = timeline();
    let events = tl.reconcile(items(), groups(), Some(VisibleRange::new(DAY, DAY + 10 * HOUR)));
    assert_eq!(
        events,
        vec![TimelineEvent::BoundsChange {
            canvas_start: DAY - 10 * HOUR,
            canvas_end: DAY + 20 * HOUR,
        }]
    );
    assert!(tl.layout().items.is_empty());
}

#[test]
fn render_pass_carries_markers_and_columns() {
    let tl = timeline().with_children(&[
        ChildSpec::Headers,
        ChildSpec::TodayMarker,
        ChildSpec::CustomMarker { at: 30 * HOUR },
    ]);
    let pass = tl.render_pass(2 * HOUR);
    assert!(pass.headers);
    // The custom marker lies past the canvas end.
    assert_eq!(pass.markers.len(), 1);
    assert!((pass.markers[0].left - 1_200.0).abs() < 1e-9);
    assert_eq!(pass.columns.len(), 30);
    assert_eq!(pass.scroll_left, 1_000.0);

    let json = serde_json::to_value(&pass).unwrap();
    assert_eq!(json["headers"], true);
    assert_eq!(json["markers"][0]["kind"], "today");
    assert_eq!(json["unit"], pass.unit.as_str());
}
