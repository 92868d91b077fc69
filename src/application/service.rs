use std::borrow::Cow;

use log::{debug, info};

use super::report::IngestReport;
use crate::address::parser::parse_mapped;
use crate::address::substitution::SubstitutionTable;
use crate::domain::comment::decode;
use crate::domain::io_map::IoMap;
use crate::error::SourceError;
use crate::ports::source::TagSource;

/// Ingestion use case: source records -> substitution -> parse -> map.
/// Adapters stay behind [`TagSource`]; the map is owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct IngestService {
    table: SubstitutionTable,
}

impl IngestService {
    pub fn new(table: SubstitutionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    /// Run one full pass over `source` into `map`.
    ///
    /// Per-record outcomes are tallied and never abort the run. A failure
    /// of the source itself does; points inserted before it stay in `map`.
    pub fn ingest<S: TagSource>(
        &self,
        source: S,
        map: &mut IoMap,
    ) -> Result<IngestReport, SourceError> {
        let mut report = IngestReport::new(source.describe());
        info!("ingesting '{}'", report.source);

        for record in source.produce()? {
            let record = record?;
            report.total += 1;

            let address = self.table.apply(record.raw_alias.trim());
            if matches!(address, Cow::Owned(_)) {
                report.substituted += 1;
            }

            match parse_mapped(&record.tag_name, &address) {
                Ok(point) => {
                    let description = decode(record.raw_description.as_deref());
                    if map.insert(point.with_description(description)).is_some() {
                        report.collisions += 1;
                    }
                    report.resolved += 1;
                }
                Err(outcome) => {
                    debug!(
                        "skip '{}' ({}): {}",
                        record.tag_name, record.raw_alias, outcome
                    );
                    report.skipped.record(outcome);
                }
            }
        }

        info!(
            "'{}': {} records, {} resolved, {} skipped, {} collisions",
            report.source,
            report.total,
            report.resolved,
            report.skipped_total(),
            report.collisions
        );
        Ok(report)
    }
}
