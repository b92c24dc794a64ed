#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tline_core::{Group, Item, ItemId, ResizeEdges, TimelineConfig, VisibleRange};
use tline_interact::{
    HitZone, InteractionContext, InteractionEffect, InteractionMachine, PointerEvent, PointerKind,
    ScrollSurface,
};
use tline_layout::CanvasWindow;

#[derive(Debug, Arbitrary)]
enum Op {
    Down { item: u8, handle: bool, touch: bool, x: i16, y: i16 },
    Move { x: i16, y: i16 },
    Up { x: i16, y: i16 },
    Lost,
    Cancel,
}

#[derive(Debug, Arbitrary)]
struct Script {
    both_edges: bool,
    can_change_group: bool,
    snap_minutes: u8,
    selected: u8,
    ops: Vec<Op>,
}

const HOUR: i64 = 3_600_000;

fuzz_target!(|script: Script| {
    let config = TimelineConfig {
        stacking_enabled: true,
        drag_snap_millis: i64::from(script.snap_minutes) * 60_000,
        can_change_group: script.can_change_group,
        can_resize: if script.both_edges {
            ResizeEdges::Both
        } else {
            ResizeEdges::Right
        },
        ..TimelineConfig::default()
    };
    let groups = vec![Group::new(1, "A"), Group::new(2, "B")];
    let items = vec![
        Item::new(1, 1, HOUR, 2 * HOUR),
        Item::new(2, 1, 90 * 60_000, 3 * HOUR),
        Item::new(3, 2, 0, HOUR),
    ];
    let window = CanvasWindow::from_config(&config);
    let viewport = window.viewport_for(VisibleRange::new(0, 10 * HOUR), 1_000.0);
    let surface = ScrollSurface {
        scroll_left: viewport.scroll_left(),
        ..ScrollSurface::default()
    };

    let selected = [ItemId::new(u64::from(script.selected % 4))];
    let mut machine = InteractionMachine::new();
    let mut terminal = 0usize;
    for op in script.ops.iter().take(128) {
        let event = match *op {
            Op::Down { item, handle, touch, x, y } => PointerEvent::Down {
                item: ItemId::new(u64::from(item % 4)),
                hit: if handle { HitZone::ResizeHandle } else { HitZone::Body },
                kind: if touch { PointerKind::Touch } else { PointerKind::Mouse },
                x: f64::from(x),
                y: f64::from(y),
            },
            Op::Move { x, y } => PointerEvent::Move { x: f64::from(x), y: f64::from(y) },
            Op::Up { x, y } => PointerEvent::Up { x: f64::from(x), y: f64::from(y) },
            Op::Lost => PointerEvent::Lost,
            Op::Cancel => PointerEvent::Cancel,
        };
        let layout = window.stack(&viewport, &items, &groups, machine.interaction_override());
        let ctx = InteractionContext {
            config: &config,
            axis: viewport.axis(),
            surface,
            items: &items,
            groups: &groups,
            layout: &layout,
            selected: &selected,
            validator: None,
        };
        let was_active = machine.is_active();
        let transition = machine.apply(&event, &ctx);

        // Post-conditions that must always hold:
        assert!(!transition.effects.is_empty(), "every step reports an effect");
        for effect in &transition.effects {
            match effect {
                InteractionEffect::MoveCommit { group, .. } => {
                    assert!(was_active);
                    assert!(groups.iter().any(|g| g.id == *group), "commit to unknown group");
                    terminal += 1;
                }
                InteractionEffect::ResizeCommit { delta, .. } => {
                    assert!(was_active);
                    assert_ne!(*delta, 0);
                    terminal += 1;
                }
                _ => {}
            }
        }
        if transition.to.is_idle() {
            assert!(machine.interaction_override().is_none());
        }
    }
    assert!(terminal <= script.ops.len());
});
