//! Delimited-text tag export (RSLogix / Studio 5000 "Export Tags" CSV).
//!
//! Row layout:
//! `TYPE,SCOPE,NAME,DESCRIPTION,DATATYPE,SPECIFIER[,ATTRIBUTES]`
//! Older exports use `?` instead of `,`. Files are single-byte Latin text,
//! decoded as Windows-1252: it agrees with ISO-8859-1 except that bytes
//! 0x80-0x9F map to printable characters instead of C1 controls. Descriptions
//! carry their non-ASCII text as `$HHHH` escapes.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use encoding_rs::WINDOWS_1252;

use crate::domain::point::TagRecord;
use crate::error::SourceError;
use crate::ports::source::TagSource;

pub const DEFAULT_DELIMITER: u8 = b',';
pub const LEGACY_DELIMITER: u8 = b'?';

/// Tag type marker of alias rows.
const ALIAS_TYPE: &str = "ALIAS";

const COL_TYPE: usize = 0;
const COL_NAME: usize = 2;
const COL_DESCRIPTION: usize = 3;
const COL_SPECIFIER: usize = 5;
const MIN_COLUMNS: usize = 6;

#[derive(Debug, Clone)]
pub struct CsvTagSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvTagSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

impl TagSource for CsvTagSource {
    type Records = CsvRecords<Cursor<Vec<u8>>>;

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn produce(self) -> Result<Self::Records, SourceError> {
        let bytes = fs::read(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let (text, _, _) = WINDOWS_1252.decode(&bytes);
        let cursor = Cursor::new(text.into_owned().into_bytes());
        Ok(CsvRecords::from_reader(cursor, self.delimiter))
    }
}

/// Alias rows of one CSV pass.
pub struct CsvRecords<R: Read> {
    rows: csv::StringRecordsIntoIter<R>,
}

impl<R: Read> CsvRecords<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Self {
        let rows = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(b'"')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();
        Self { rows }
    }
}

impl<R: Read> Iterator for CsvRecords<R> {
    type Item = Result<TagRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.rows.next()? {
                Ok(row) => {
                    if let Some(record) = alias_record(&row) {
                        return Some(Ok(record));
                    }
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}

/// `None` for short rows and every non-alias row (remarks, headers, base tags).
fn alias_record(row: &StringRecord) -> Option<TagRecord> {
    if row.len() < MIN_COLUMNS {
        return None;
    }
    if row.get(COL_TYPE)?.trim() != ALIAS_TYPE {
        return None;
    }
    let name = row.get(COL_NAME)?.trim();
    let specifier = row.get(COL_SPECIFIER)?.trim();
    let description = row
        .get(COL_DESCRIPTION)
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    Some(TagRecord::new(name, specifier, description))
}
