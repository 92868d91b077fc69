//! `Chassis,Slot,Point,Tagname` listing.

use chrono::NaiveDateTime;

use super::{created_line, display_name};
use crate::domain::io_map::IoMap;

pub fn render_cspt(map: &IoMap, sep: char, created: &NaiveDateTime) -> String {
    let mut lines = vec![
        created_line(created),
        format!("Chassis{sep}Slot{sep}Point{sep}Tagname"),
    ];
    for chassis in map.chassis_ids() {
        for slot in map.slot_ids(chassis) {
            for channel in map.channel_ids(chassis, slot) {
                let name = display_name(map, chassis, slot, channel);
                lines.push(format!("{chassis}{sep}{slot}{sep}{channel}{sep}{name}"));
            }
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn one_line_per_point_in_sorted_order() {
        let text = render_cspt(&fixtures::map(), ',', &fixtures::created());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Created 2024-05-17T08:30:00",
                "Chassis,Slot,Point,Tagname",
                "FLEX1,2,7,LS-7",
                "RIO1,0,0,PT_01",
                "RIO1,3,5,FT-101",
                "RIO1,3,6,XV-200",
            ]
        );
    }

    #[test]
    fn custom_separator() {
        let text = render_cspt(&fixtures::map(), ':', &fixtures::created());
        assert!(text.contains("Chassis:Slot:Point:Tagname"));
        assert!(text.contains("RIO1:3:5:FT-101"));
    }
}
