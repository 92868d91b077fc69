//! Address substitution ("N11 mapping").
//!
//! Rule file: one `<prefix> <replacement>` pair per line, `#` starts a
//! comment line. Example:
//!
//! ```text
//! # logical            physical
//! N11[0]               CP_P0024JA:6:I.Data
//! ```

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRule {
    pub prefix: String,
    pub replacement: String,
}

/// Ordered prefix-rewrite rules. The default table rewrites nothing.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    rules: Vec<SubstitutionRule>,
}

impl SubstitutionTable {
    /// Load rules from a file. Only an unreadable file is an error; bad rows
    /// are logged and skipped.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse_str(&text, &path.display().to_string());
        info!(
            "read {} substitution rules from '{}'",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse rule text. `origin` only labels log messages.
    pub fn parse_str(text: &str, origin: &str) -> Self {
        let mut rules: Vec<SubstitutionRule> = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = trimmed.split_whitespace();
            let (Some(prefix), Some(replacement)) = (fields.next(), fields.next()) else {
                warn!("unparsed row {} in map file '{}': '{}'", line_no, origin, trimmed);
                continue;
            };

            // First loaded rule wins for a repeated prefix.
            if rules.iter().any(|rule| rule.prefix == prefix) {
                warn!(
                    "duplicate prefix '{}' at row {} in map file '{}' ignored",
                    prefix, line_no, origin
                );
                continue;
            }

            rules.push(SubstitutionRule {
                prefix: prefix.to_string(),
                replacement: replacement.to_string(),
            });
        }

        Self { rules }
    }

    pub fn from_rules(rules: Vec<SubstitutionRule>) -> Self {
        Self { rules }
    }

    /// Rewrite the prefix of `address` with the first matching rule.
    /// Borrows the input when no rule matches.
    pub fn apply<'a>(&self, address: &'a str) -> Cow<'a, str> {
        for rule in &self.rules {
            if let Some(rest) = address.strip_prefix(rule.prefix.as_str()) {
                return Cow::Owned(format!("{}{}", rule.replacement, rest));
            }
        }
        Cow::Borrowed(address)
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
# N11 mapping
N11[0] CP_P0024JA:6:I.Data
N11[1]  CP_P0024JA:7:O.Data   trailing-notes

broken-row
N11[0] SHOULD_NOT:WIN
";

    #[test]
    fn parses_rules_skipping_comments_and_bad_rows() {
        let table = SubstitutionTable::parse_str(RULES, "test");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[0].prefix, "N11[0]");
        assert_eq!(table.rules()[0].replacement, "CP_P0024JA:6:I.Data");
        assert_eq!(table.rules()[1].replacement, "CP_P0024JA:7:O.Data");
    }

    #[test]
    fn first_rule_wins_for_duplicate_prefix() {
        let table = SubstitutionTable::parse_str(RULES, "test");
        assert_eq!(table.apply("N11[0].3"), "CP_P0024JA:6:I.Data.3");
    }

    #[test]
    fn only_the_prefix_is_replaced() {
        let table = SubstitutionTable::parse_str("AB XY\n", "test");
        assert_eq!(table.apply("AB.AB.AB"), "XY.AB.AB");
    }

    #[test]
    fn unmatched_input_is_borrowed_and_idempotent() {
        let table = SubstitutionTable::parse_str(RULES, "test");
        let address = "RIO1:3:I.Data.5";
        let once = table.apply(address);
        assert!(matches!(once, Cow::Borrowed(_)));
        assert_eq!(table.apply(&once), once);
    }

    #[test]
    fn default_table_is_identity() {
        let table = SubstitutionTable::default();
        assert!(table.is_empty());
        assert_eq!(table.apply("N11[0].3"), "N11[0].3");
    }

    #[test]
    fn missing_file_is_config_error() {
        let path = std::env::temp_dir().join("iogen-no-such-map-file.txt");
        let err = SubstitutionTable::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
