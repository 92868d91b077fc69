//! Presentation of a finished [`IoMap`]. Renderers only read the map.

pub mod compact;
pub mod cspt;
pub mod grid;
pub mod xlsx;

use chrono::NaiveDateTime;
use log::warn;

use crate::domain::io_map::IoMap;
use crate::domain::kip::canonicalize;

pub const DEFAULT_SLOTS: u32 = 10;
pub const DEFAULT_CHANNELS: u32 = 16;

/// Fixed slot/channel geometry of grid-style outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub slots: u32,
    pub channels: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS,
            channels: DEFAULT_CHANNELS,
        }
    }
}

/// KIP name of the tag at a location, empty when the channel is free.
pub fn display_name(map: &IoMap, chassis: &str, slot: u32, channel: u32) -> String {
    map.get(chassis, slot, channel)
        .map(canonicalize)
        .unwrap_or_default()
}

/// A resolved point that a fixed layout has no cell for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmittedPoint {
    pub chassis_id: String,
    pub slot_id: u32,
    pub channel_id: u32,
    pub tag_name: String,
}

/// Points with `slot >= layout.slots` or `channel >= layout.channels`, in map order.
pub fn points_outside(map: &IoMap, layout: GridLayout) -> Vec<OmittedPoint> {
    let mut omitted = Vec::new();
    for chassis in map.chassis_ids() {
        for slot in map.slot_ids(chassis) {
            for channel in map.channel_ids(chassis, slot) {
                if slot < layout.slots && channel < layout.channels {
                    continue;
                }
                omitted.push(OmittedPoint {
                    chassis_id: chassis.to_string(),
                    slot_id: slot,
                    channel_id: channel,
                    tag_name: map.get(chassis, slot, channel).unwrap_or_default().to_string(),
                });
            }
        }
    }
    omitted
}

/// Log every point `output` cannot show; returns how many there are.
pub(crate) fn warn_outside(map: &IoMap, layout: GridLayout, output: &str) -> usize {
    let omitted = points_outside(map, layout);
    for point in &omitted {
        warn!(
            "{}: '{}' at {}/{}/{} is outside {} slots x {} channels, not shown",
            output,
            point.tag_name,
            point.chassis_id,
            point.slot_id,
            point.channel_id,
            layout.slots,
            layout.channels
        );
    }
    omitted.len()
}

pub(crate) fn created_line(created: &NaiveDateTime) -> String {
    format!("Created {}", created.format("%Y-%m-%dT%H:%M:%S"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::io_map::IoMap;
    use crate::domain::point::{Direction, TagPoint};

    pub fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap()
    }

    pub fn point(chassis: &str, slot: u32, channel: u32, tag: &str) -> TagPoint {
        TagPoint {
            chassis_id: chassis.to_string(),
            slot_id: slot,
            channel_id: channel,
            direction: Direction::Input,
            tag_name: tag.to_string(),
            description: String::new(),
        }
    }

    pub fn map() -> IoMap {
        let mut map = IoMap::new();
        for (chassis, slot, channel, tag, description) in [
            ("RIO1", 3, 5, "iFT101", "Flow"),
            ("RIO1", 3, 6, "oXV200", "Valve\nopen"),
            ("RIO1", 0, 0, "iPT_01", ""),
            ("FLEX1", 2, 7, "iLS7", "Level"),
        ] {
            map.insert(TagPoint {
                chassis_id: chassis.to_string(),
                slot_id: slot,
                channel_id: channel,
                direction: Direction::Input,
                tag_name: tag.to_string(),
                description: description.to_string(),
            });
        }
        map
    }
}
