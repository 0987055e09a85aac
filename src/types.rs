//! Shared types and enums used across cubediff.
//! Includes `Shape`, `Interleave`, `ElementType` and `ParallelStrategy`.
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Logical dimensions of a cube
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Shape {
    pub samples: usize,
    pub lines: usize,
    pub bands: usize,
}

impl Shape {
    pub fn new(samples: usize, lines: usize, bands: usize) -> Self {
        Self {
            samples,
            lines,
            bands,
        }
    }

    /// Number of elements in the flat view.
    ///
    /// Shapes accepted by [`Cube::new`](crate::Cube::new) and the ENVI reader
    /// always fit; use [`Shape::checked_len`] for untrusted dimensions.
    pub fn len(&self) -> usize {
        self.samples * self.lines * self.bands
    }

    /// Element count, or `None` when it does not fit in `usize`
    pub fn checked_len(&self) -> Option<usize> {
        self.samples
            .checked_mul(self.lines)?
            .checked_mul(self.bands)
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0 || self.lines == 0 || self.bands == 0
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "samples={} lines={} bands={}",
            self.samples, self.lines, self.bands
        )
    }
}

/// Physical storage order of a cube's flat data
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Interleave {
    /// Band interleaved by pixel: (line, sample, band)
    Bip,
    /// Band interleaved by line: (line, band, sample)
    Bil,
    /// Band sequential: (band, line, sample)
    Bsq,
}

impl Interleave {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interleave::Bip => "bip",
            Interleave::Bil => "bil",
            Interleave::Bsq => "bsq",
        }
    }

    /// Number of flat elements to step over before the band changes
    pub fn default_band_boundary(&self, shape: Shape) -> usize {
        match self {
            Interleave::Bip => 1,
            Interleave::Bil => shape.samples,
            Interleave::Bsq => shape.samples.saturating_mul(shape.lines),
        }
    }
}

impl FromStr for Interleave {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bip" => Ok(Interleave::Bip),
            "bil" => Ok(Interleave::Bil),
            "bsq" => Ok(Interleave::Bsq),
            _ => Err(Error::UnrecognizedInterleave(s.to_string())),
        }
    }
}

impl std::fmt::Display for Interleave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared storage type of a cube's samples.
///
/// The discriminants follow the ENVI `data type` header codes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    U8,
    I16,
    I32,
    F32,
    F64,
    U16,
    U32,
    I64,
    U64,
}

impl ElementType {
    pub fn from_envi_code(code: u32) -> Result<Self, Error> {
        match code {
            1 => Ok(ElementType::U8),
            2 => Ok(ElementType::I16),
            3 => Ok(ElementType::I32),
            4 => Ok(ElementType::F32),
            5 => Ok(ElementType::F64),
            12 => Ok(ElementType::U16),
            13 => Ok(ElementType::U32),
            14 => Ok(ElementType::I64),
            15 => Ok(ElementType::U64),
            6 | 9 => Err(Error::UnsupportedDataType(format!(
                "complex ENVI data type {code}"
            ))),
            other => Err(Error::UnsupportedDataType(format!(
                "ENVI data type {other}"
            ))),
        }
    }

    pub fn envi_code(&self) -> u32 {
        match self {
            ElementType::U8 => 1,
            ElementType::I16 => 2,
            ElementType::I32 => 3,
            ElementType::F32 => 4,
            ElementType::F64 => 5,
            ElementType::U16 => 12,
            ElementType::U32 => 13,
            ElementType::I64 => 14,
            ElementType::U64 => 15,
        }
    }

    /// Bytes per element
    pub fn size(&self) -> usize {
        match self {
            ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::U64 | ElementType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    /// Scale factor assumed when a cube does not declare one: integer data is
    /// taken to be stored as reflectance x 10000, floating data as 0.0 - 1.0.
    pub fn default_scale_factor(&self) -> f64 {
        if self.is_float() { 1.0 } else { 10000.0 }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ElementType::U8 => "u8",
            ElementType::I16 => "i16",
            ElementType::I32 => "i32",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
            ElementType::U16 => "u16",
            ElementType::U32 => "u32",
            ElementType::I64 => "i64",
            ElementType::U64 => "u64",
        };
        write!(f, "{}", s)
    }
}

/// How the binning pass is scheduled
#[derive(Copy, Clone, PartialEq, Eq, Default, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallelStrategy {
    /// One pass over the whole flat range on the calling thread
    #[default]
    Sequential,
    /// Fixed-length shards on the rayon pool, merged afterwards
    Sharded,
}

impl std::fmt::Display for ParallelStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParallelStrategy::Sequential => write!(f, "Sequential"),
            ParallelStrategy::Sharded => write!(f, "Sharded"),
        }
    }
}
