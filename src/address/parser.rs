//! Alias address -> physical location.
//!
//! Accepted shapes:
//! - `<CHASSIS>:<SLOT>:<PATH>`, e.g. `RIO2_B:8:I.Ch1Data`, `RIO_SD:0:I.4`
//! - `<CHASSIS>:<PATH>` where the path carries the slot, e.g. `FLEX1:I.Data[3].7`
//!
//! `PATH` is `<DIR>.<BODY>` with `DIR` in `I`/`O`; the body grammars live in
//! [`super::matchers`].

use log::trace;
use serde::Serialize;
use thiserror::Error;

use super::matchers::{match_path, PathMatch};
use super::substitution::SubstitutionTable;
use crate::domain::point::{Direction, TagPoint};

/// Why a record was not placed. Every variant is per-record and non-fatal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ParseOutcome {
    #[error("address is not <chassis>:<slot>:<path> or <chassis>:<path>")]
    InvalidFormat,
    #[error("slot segment is not a non-negative integer")]
    InvalidSlot,
    #[error("path matches no known I/O data grammar")]
    UnrecognizedPath,
    #[error("path is a diagnostic or configuration field")]
    ServiceField,
    #[error("address carries no slot")]
    MissingSlot,
}

/// Substrings (case-insensitive) marking diagnostic/configuration members.
const SERVICE_MARKERS: [&str; 4] = ["fault", "status", "cfg", "config"];

/// Direction letter of configuration members, e.g. `C.Ch0Config.HighEngineering`.
const CONFIG_DIRECTION: &str = "C";

/// Substitute, then resolve.
pub fn parse(
    tag_name: &str,
    raw_alias: &str,
    table: &SubstitutionTable,
) -> Result<TagPoint, ParseOutcome> {
    let mapped = table.apply(raw_alias.trim());
    parse_mapped(tag_name, &mapped)
}

/// Resolve an address the substitution table has already been applied to.
pub fn parse_mapped(tag_name: &str, address: &str) -> Result<TagPoint, ParseOutcome> {
    let address = address.trim();
    let segments: Vec<&str> = address.splitn(3, ':').collect();

    let (chassis, slot, path) = match segments.as_slice() {
        [chassis, slot, path] => {
            let slot = parse_slot(slot)?;
            (*chassis, Some(slot), *path)
        }
        [chassis, path] => (*chassis, None, *path),
        _ => return Err(ParseOutcome::InvalidFormat),
    };
    if chassis.is_empty() {
        return Err(ParseOutcome::InvalidFormat);
    }

    if is_service_field(path) {
        return Err(ParseOutcome::ServiceField);
    }

    let Some((letter, body)) = path.split_once('.') else {
        return Err(ParseOutcome::UnrecognizedPath);
    };
    if letter == CONFIG_DIRECTION {
        return Err(ParseOutcome::ServiceField);
    }
    let direction = Direction::from_letter(letter).ok_or(ParseOutcome::UnrecognizedPath)?;

    let (flex_slot, channel) = match match_path(body) {
        Some((form, PathMatch::Matched { flex_slot, channel })) => {
            trace!("'{}': '{}' matched {} form", tag_name, address, form);
            (flex_slot, channel)
        }
        _ => return Err(ParseOutcome::UnrecognizedPath),
    };

    let slot_id = flex_slot.or(slot).ok_or(ParseOutcome::MissingSlot)?;

    Ok(TagPoint {
        chassis_id: chassis.to_string(),
        slot_id,
        channel_id: channel,
        direction,
        tag_name: tag_name.to_string(),
        description: String::new(),
    })
}

fn parse_slot(text: &str) -> Result<u32, ParseOutcome> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseOutcome::InvalidSlot);
    }
    text.parse().map_err(|_| ParseOutcome::InvalidSlot)
}

fn is_service_field(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    SERVICE_MARKERS.iter().any(|marker| lower.contains(marker))
}
