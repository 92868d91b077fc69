use std::fmt;

use serde::{Deserialize, Serialize};

/// One record handed over by an ingestion adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    pub tag_name: String,
    /// Alias target before substitution, e.g. `RIO1:3:I.Data.5`.
    pub raw_alias: String,
    /// Escape-coded description; `None` when the source has none.
    #[serde(default)]
    pub raw_description: Option<String>,
    /// Program name for program-scoped tags, `None` for controller scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TagRecord {
    pub fn new(
        tag_name: impl Into<String>,
        raw_alias: impl Into<String>,
        raw_description: Option<String>,
    ) -> Self {
        Self {
            tag_name: tag_name.into(),
            raw_alias: raw_alias.into(),
            raw_description,
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Data direction encoded by the leading letter of the address path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "I" => Some(Direction::Input),
            "O" => Some(Direction::Output),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::Input => 'I',
            Direction::Output => 'O',
        }
    }
}

/// A tag resolved to its physical I/O location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPoint {
    pub chassis_id: String,
    pub slot_id: u32,
    pub channel_id: u32,
    pub direction: Direction,
    pub tag_name: String,
    #[serde(default)]
    pub description: String,
}

impl TagPoint {
    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }
}

impl fmt::Display for TagPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}/{}/{} ({})",
            self.tag_name,
            self.chassis_id,
            self.slot_id,
            self.channel_id,
            self.direction.letter()
        )
    }
}
