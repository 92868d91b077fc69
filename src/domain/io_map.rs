//! Sparse chassis -> slot -> channel table.
//!
//! Owned by whoever runs ingestion (see `application::session` for the
//! shared variant). The type holds no lock; writers and readers must be
//! serialized by the caller.

use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use super::point::TagPoint;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEntry {
    pub tag_name: String,
    pub description: String,
}

/// An insert that replaced an occupied channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collision {
    pub chassis_id: String,
    pub slot_id: u32,
    pub channel_id: u32,
    pub previous: String,
    pub replacement: String,
}

type ChannelMap = BTreeMap<u32, MapEntry>;
type SlotMap = BTreeMap<u32, ChannelMap>;

#[derive(Debug, Clone, Default)]
pub struct IoMap {
    chassis: BTreeMap<String, SlotMap>,
    collisions: usize,
}

impl IoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a point. An occupied channel is overwritten with the newer tag;
    /// the replaced tag is logged, counted and returned.
    pub fn insert(&mut self, point: TagPoint) -> Option<Collision> {
        let TagPoint {
            chassis_id,
            slot_id,
            channel_id,
            tag_name,
            description,
            ..
        } = point;

        let slot = self
            .chassis
            .entry(chassis_id.clone())
            .or_default()
            .entry(slot_id)
            .or_default();

        let previous = slot.insert(
            channel_id,
            MapEntry {
                tag_name: tag_name.clone(),
                description,
            },
        )?;

        self.collisions += 1;
        warn!(
            "channel {}/{}/{} reassigned: '{}' -> '{}'",
            chassis_id, slot_id, channel_id, previous.tag_name, tag_name
        );
        Some(Collision {
            chassis_id,
            slot_id,
            channel_id,
            previous: previous.tag_name,
            replacement: tag_name,
        })
    }

    pub fn entry(&self, chassis: &str, slot: u32, channel: u32) -> Option<&MapEntry> {
        self.chassis.get(chassis)?.get(&slot)?.get(&channel)
    }

    pub fn get(&self, chassis: &str, slot: u32, channel: u32) -> Option<&str> {
        self.entry(chassis, slot, channel)
            .map(|entry| entry.tag_name.as_str())
    }

    pub fn description(&self, chassis: &str, slot: u32, channel: u32) -> Option<&str> {
        self.entry(chassis, slot, channel)
            .map(|entry| entry.description.as_str())
    }

    /// Chassis ids, lexicographic.
    pub fn chassis_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.chassis.keys().map(String::as_str)
    }

    /// Occupied slots of a chassis, ascending. Empty for an unknown chassis.
    pub fn slot_ids<'a>(&'a self, chassis: &str) -> impl Iterator<Item = u32> + 'a {
        self.chassis
            .get(chassis)
            .into_iter()
            .flat_map(|slots| slots.keys().copied())
    }

    /// Occupied channels of a slot, ascending.
    pub fn channel_ids<'a>(&'a self, chassis: &str, slot: u32) -> impl Iterator<Item = u32> + 'a {
        self.chassis
            .get(chassis)
            .and_then(|slots| slots.get(&slot))
            .into_iter()
            .flat_map(|channels| channels.keys().copied())
    }

    /// Highest occupied channel in a slot.
    pub fn max_channel(&self, chassis: &str, slot: u32) -> Option<u32> {
        self.channel_ids(chassis, slot).last()
    }

    /// Number of occupied channels across all chassis.
    pub fn len(&self) -> usize {
        self.chassis
            .values()
            .flat_map(|slots| slots.values())
            .map(|channels| channels.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chassis.is_empty()
    }

    pub fn collision_count(&self) -> usize {
        self.collisions
    }

    /// Reset to the empty state of a new session.
    pub fn clear(&mut self) {
        self.chassis.clear();
        self.collisions = 0;
    }
}
