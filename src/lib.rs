//! PLC I/O table generator core.
//! Responsibilities: resolve alias tags from controller exports into a
//! chassis/slot/channel map and render that map as text or xlsx tables.
//! Non-goals: GUI, persistence of the map, PLC logic validation.

pub mod domain;
pub mod address;
pub mod ports;
pub mod adapters;
pub mod application;

pub mod config;
pub mod error;

pub use domain::comment::decode;
pub use domain::io_map::{Collision, IoMap, MapEntry};
pub use domain::kip::canonicalize;
pub use domain::point::{Direction, TagPoint, TagRecord};
pub use address::parser::{parse, parse_mapped, ParseOutcome};
pub use address::substitution::SubstitutionTable;
pub use ports::source::TagSource;
pub use application::report::IngestReport;
pub use application::service::IngestService;
pub use application::session::IoSession;
pub use config::IogenConfig;
pub use error::{ConfigError, RenderError, SourceError};
