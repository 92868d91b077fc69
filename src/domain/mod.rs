pub mod comment;
pub mod io_map;
pub mod kip;
pub mod point;
