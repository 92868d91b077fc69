use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::parser::ParseOutcome;

/// Skipped records per reason.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkipTally {
    pub invalid_format: usize,
    pub invalid_slot: usize,
    pub unrecognized_path: usize,
    pub service_field: usize,
    pub missing_slot: usize,
}

impl SkipTally {
    pub fn record(&mut self, outcome: ParseOutcome) {
        match outcome {
            ParseOutcome::InvalidFormat => self.invalid_format += 1,
            ParseOutcome::InvalidSlot => self.invalid_slot += 1,
            ParseOutcome::UnrecognizedPath => self.unrecognized_path += 1,
            ParseOutcome::ServiceField => self.service_field += 1,
            ParseOutcome::MissingSlot => self.missing_slot += 1,
        }
    }

    pub fn get(&self, outcome: ParseOutcome) -> usize {
        match outcome {
            ParseOutcome::InvalidFormat => self.invalid_format,
            ParseOutcome::InvalidSlot => self.invalid_slot,
            ParseOutcome::UnrecognizedPath => self.unrecognized_path,
            ParseOutcome::ServiceField => self.service_field,
            ParseOutcome::MissingSlot => self.missing_slot,
        }
    }

    pub fn total(&self) -> usize {
        self.invalid_format
            + self.invalid_slot
            + self.unrecognized_path
            + self.service_field
            + self.missing_slot
    }
}

/// Result of one ingestion run, the audit surface of an export.
///
/// `total == resolved + skipped.total()` always holds. `collisions` counts
/// resolved records that replaced an earlier tag on the same channel.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub source: String,
    pub total: usize,
    pub resolved: usize,
    /// Records whose alias was rewritten by a substitution rule.
    pub substituted: usize,
    pub collisions: usize,
    pub skipped: SkipTally,
}

impl IngestReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.total()
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "source:      {}", self.source)?;
        writeln!(f, "records:     {}", self.total)?;
        writeln!(f, "resolved:    {}", self.resolved)?;
        writeln!(f, "substituted: {}", self.substituted)?;
        writeln!(f, "collisions:  {}", self.collisions)?;
        write!(f, "skipped:     {}", self.skipped_total())?;
        for outcome in [
            ParseOutcome::InvalidFormat,
            ParseOutcome::InvalidSlot,
            ParseOutcome::UnrecognizedPath,
            ParseOutcome::ServiceField,
            ParseOutcome::MissingSlot,
        ] {
            let count = self.skipped.get(outcome);
            if count > 0 {
                write!(f, "\n  {count:>5}  {outcome}")?;
            }
        }
        Ok(())
    }
}
