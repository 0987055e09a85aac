//! I/O layer: the ENVI cube reader/writer and `writers` for histogram reports.
pub mod envi;
pub use envi::{EnviError, EnviHeader, read_envi, write_envi};

pub mod writers;
