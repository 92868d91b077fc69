//! Shared map for callers that load in the background and render in the
//! foreground.
//!
//! The ingestion worker holds the write lock for its whole pass, so a reader
//! sees either the map before the run or the finished result. Joining the
//! returned handle is the completion signal.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::info;
use parking_lot::RwLock;

use super::report::IngestReport;
use super::service::IngestService;
use crate::domain::io_map::IoMap;
use crate::error::SourceError;
use crate::ports::source::TagSource;

#[derive(Debug, Clone, Default)]
pub struct IoSession {
    map: Arc<RwLock<IoMap>>,
    service: Arc<IngestService>,
}

impl IoSession {
    pub fn new(service: IngestService) -> Self {
        Self {
            map: Arc::new(RwLock::new(IoMap::new())),
            service: Arc::new(service),
        }
    }

    /// Ingest `source` into the session map on a worker thread.
    pub fn spawn_ingest<S>(&self, source: S) -> JoinHandle<Result<IngestReport, SourceError>>
    where
        S: TagSource + Send + 'static,
    {
        let map = Arc::clone(&self.map);
        let service = Arc::clone(&self.service);
        thread::spawn(move || {
            let mut guard = map.write();
            service.ingest(source, &mut guard)
        })
    }

    /// Ingest on the calling thread.
    pub fn ingest<S: TagSource>(&self, source: S) -> Result<IngestReport, SourceError> {
        let mut guard = self.map.write();
        self.service.ingest(source, &mut guard)
    }

    pub fn read<T>(&self, f: impl FnOnce(&IoMap) -> T) -> T {
        let guard = self.map.read();
        f(&guard)
    }

    pub fn reset(&self) {
        self.map.write().clear();
        info!("session map cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::point::TagRecord;
    use crate::ports::source::VecSource;

    fn source(records: &[(&str, &str)]) -> VecSource {
        VecSource::new(
            "mem",
            records
                .iter()
                .map(|(tag, alias)| TagRecord::new(*tag, *alias, None))
                .collect(),
        )
    }

    #[test]
    fn background_ingest_is_visible_after_join() {
        let session = IoSession::default();
        let handle = session.spawn_ingest(source(&[
            ("iFT101", "RIO1:3:I.Data.5"),
            ("oXV200", "RIO1:3:O.Ch6Data"),
        ]));

        let report = handle.join().unwrap().unwrap();
        assert_eq!(report.resolved, 2);
        assert_eq!(session.read(|map| map.len()), 2);
        assert_eq!(
            session.read(|map| map.get("RIO1", 3, 6).map(str::to_string)),
            Some("oXV200".to_string())
        );
    }

    #[test]
    fn runs_accumulate_until_reset() {
        let session = IoSession::default();
        session.ingest(source(&[("iA", "RIO1:0:I.Data.0")])).unwrap();
        session.ingest(source(&[("iB", "RIO2:0:I.Data.0")])).unwrap();
        assert_eq!(session.read(|map| map.chassis_ids().count()), 2);

        session.reset();
        assert!(session.read(IoMap::is_empty));
    }

    #[test]
    fn clones_share_one_map() {
        let session = IoSession::default();
        let other = session.clone();
        other.ingest(source(&[("iA", "RIO1:0:I.Data.0")])).unwrap();
        assert_eq!(session.read(|map| map.len()), 1);
    }
}
