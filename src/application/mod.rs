pub mod report;
pub mod service;
pub mod session;
