#![no_main]

use libfuzzer_sys::fuzz_target;
use tline_core::{Group, Item};
use tline_layout::{StackInput, collides, stack_items};

fuzz_target!(|data: &[u8]| {
    // Header: canvas start/span (4 bytes each), width, stacking flag.
    if data.len() < 10 {
        return;
    }
    let canvas_start = i64::from(i32::from_le_bytes([data[0], data[1], data[2], data[3]]));
    let span = i64::from(u32::from_le_bytes([data[4], data[5], data[6], data[7]])).max(1);
    let width = f64::from(data[8]) * 8.0 + 1.0;
    let stacking = data[9] & 1 == 1;
    let payload = &data[10..];

    let groups: Vec<Group> = (1..=4).map(|id| Group::new(id, "g")).collect();
    // Each 7-byte chunk: ignored, group (0..=4, 0 is unknown), start, length,
    // end nudge.
    let items: Vec<Item> = payload
        .chunks_exact(7)
        .take(256)
        .zip(0u64..)
        .map(|(c, id)| {
            let start = canvas_start - span / 2 + i64::from(u16::from_le_bytes([c[2], c[3]])) * span / 4096;
            let length = i64::from(i16::from_le_bytes([c[4], c[5]])) * span / 4096;
            Item::new(id, u64::from(c[1] % 5), start, start + length + i64::from(c[6] % 2))
        })
        .collect();

    let layout = stack_items(StackInput {
        items: &items,
        groups: &groups,
        canvas_start,
        canvas_end: canvas_start + span,
        canvas_width: width,
        row_height: 30.0,
        item_height_ratio: 0.65,
        stacking,
        interaction: None,
    });

    // Post-conditions that must always hold:
    assert_eq!(layout.groups.len(), groups.len());
    assert!(layout.total_height.is_finite());
    for pair in layout.groups.windows(2) {
        assert!(pair[1].top >= pair[0].top, "group tops not monotonic");
    }
    for dims in &layout.items {
        assert!(dims.width >= 0.0);
        let band = &layout.groups[dims.group_index];
        assert!(dims.top >= band.top && dims.top + dims.height <= band.top + band.height + 1e-6);
    }
    if stacking {
        for a in &layout.items {
            for b in &layout.items {
                if a.item != b.item && a.group == b.group && a.stack_slot == b.stack_slot {
                    assert!(!collides(a.left, a.width, b.left, b.width), "slot-mates collide");
                }
            }
        }
    }
});
