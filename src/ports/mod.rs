pub mod source;

pub use source::TagSource;
