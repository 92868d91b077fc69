//! Full fixed-width table: one box per chassis, slots as columns, channels as rows.

use chrono::NaiveDateTime;

use super::{created_line, display_name, warn_outside, GridLayout};
use crate::domain::io_map::IoMap;

const CELL: usize = 17;

/// Points outside `layout` are not drawn; each one is logged at `warn`.
pub fn render_grid(map: &IoMap, layout: GridLayout, created: &NaiveDateTime) -> String {
    warn_outside(map, layout, "grid");
    let mut out = created_line(created);
    out.push('\n');

    let slots: Vec<u32> = (0..layout.slots).collect();
    let width = 4 + slots.len() * (CELL + 1);

    for chassis in map.chassis_ids() {
        out.push_str("\n\n");
        out.push_str(&format!("{:^width$}\n", format!("CHASSIS {chassis}")));
        out.push_str(&rule('╒', '═', '╤', '╕', slots.len()));
        out.push('\n');

        out.push_str("│ch│");
        for slot in &slots {
            out.push_str(&format!("{:^w$}│", format!("SLOT {slot}"), w = CELL));
        }
        out.push('\n');
        out.push_str(&rule('├', '─', '┼', '┤', slots.len()));

        for channel in 0..layout.channels {
            out.push_str(&format!("\n│{channel:02}│"));
            for slot in &slots {
                let name = display_name(map, chassis, *slot, channel);
                out.push_str(&format!("{name:>w$}│", w = CELL));
            }
        }
        out.push('\n');
        out.push_str(&rule('└', '─', '┴', '┘', slots.len()));
        out.push('\n');
    }

    out
}

/// Horizontal border: channel column of width 2, then one cell per slot.
fn rule(left: char, fill: char, joint: char, right: char, cells: usize) -> String {
    let cell: String = std::iter::repeat(fill).take(CELL).collect();
    let mut line = String::new();
    line.push(left);
    line.push(fill);
    line.push(fill);
    for _ in 0..cells {
        line.push(joint);
        line.push_str(&cell);
    }
    line.push(right);
    line
}
