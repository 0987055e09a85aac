//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, JSON, and ENVI errors, and provides semantic variants
//! for cube validation and histogram configuration failures.
use thiserror::Error;

use crate::types::Shape;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ENVI error: {0}")]
    Envi(#[from] crate::io::EnviError),

    #[error("Cube shapes differ: first is {first}, second is {second}")]
    ShapeMismatch { first: Shape, second: Shape },

    #[error("Unrecognized interleave: {0:?} (expected bip, bil or bsq)")]
    UnrecognizedInterleave(String),

    #[error("Missing required attribute: {0}")]
    MissingAttribute(&'static str),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Cube shape {0} has more elements than fit in memory")]
    ShapeTooLarge(Shape),

    #[error("Flat view holds {actual} elements, cube shape needs {expected}")]
    DataLength { expected: usize, actual: usize },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),
}

impl Error {
    pub fn invalid<V: std::fmt::Display>(arg: &'static str, value: V) -> Self {
        Error::InvalidArgument {
            arg,
            value: value.to_string(),
        }
    }
}
