//! Compact listing: occupied slots only, one line per occupied channel with
//! its description.

use chrono::NaiveDateTime;

use super::{created_line, display_name};
use crate::domain::io_map::IoMap;

pub fn render_compact(map: &IoMap, created: &NaiveDateTime) -> String {
    let mut out = created_line(created);
    out.push('\n');

    for chassis in map.chassis_ids() {
        out.push_str(&format!("\n\n{:=^22}\n", format!("CHASSIS {chassis}")));
        for slot in map.slot_ids(chassis) {
            out.push_str("\n╒══╤═════════════════╕");
            out.push_str(&format!("\n│ch│     SLOT {slot:02}     │"));
            out.push_str("\n├──┼─────────────────┤");
            for channel in map.channel_ids(chassis, slot) {
                let name = display_name(map, chassis, slot, channel);
                let description = map
                    .description(chassis, slot, channel)
                    .unwrap_or_default()
                    .replace('\n', " ");
                out.push_str(&format!("\n│{channel:02}│{name:>17}│ {description}"));
            }
            out.push_str("\n└──┴─────────────────┘");
        }
        out.push('\n');
    }

    out
}
