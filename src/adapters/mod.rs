//! Concrete ingestion adapters and output renderers.

pub mod csv_tags;
pub mod l5x;
pub mod render;

pub use csv_tags::CsvTagSource;
pub use l5x::L5xTagSource;
