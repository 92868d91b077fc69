use crate::domain::point::TagRecord;
use crate::error::SourceError;

/// Ingestion adapter port.
/// The core only depends on this shape; one adapter exists per export format.
pub trait TagSource {
    /// Iterator over the alias records of one pass.
    type Records: Iterator<Item = Result<TagRecord, SourceError>>;

    /// Human-readable origin (usually the file path) for logs and reports.
    fn describe(&self) -> String;

    /// Open the source and hand out its records lazily.
    /// Consumes the adapter: a second pass needs a new adapter.
    fn produce(self) -> Result<Self::Records, SourceError>;
}

/// In-memory source, handy for callers that already hold records.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    label: String,
    records: Vec<TagRecord>,
}

impl VecSource {
    pub fn new(label: impl Into<String>, records: Vec<TagRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }
}

impl TagSource for VecSource {
    type Records = std::iter::Map<
        std::vec::IntoIter<TagRecord>,
        fn(TagRecord) -> Result<TagRecord, SourceError>,
    >;

    fn describe(&self) -> String {
        self.label.clone()
    }

    fn produce(self) -> Result<Self::Records, SourceError> {
        Ok(self
            .records
            .into_iter()
            .map(Ok as fn(TagRecord) -> Result<TagRecord, SourceError>))
    }
}
