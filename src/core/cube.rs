//! Cube collaborator: the `CubeSource` contract the histogram engine reads from,
//! plus an in-memory `Cube` implementation backed by typed flat storage.
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{ElementType, Interleave, Shape};

/// Owned flat storage of a cube, in its native interleave order
#[derive(Debug, Clone, PartialEq)]
pub enum CubeData {
    U8(Vec<u8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
}

/// Read-only flat view with a declared element type
#[derive(Debug, Clone, Copy)]
pub enum FlatView<'a> {
    U8(&'a [u8]),
    I16(&'a [i16]),
    I32(&'a [i32]),
    F32(&'a [f32]),
    F64(&'a [f64]),
    U16(&'a [u16]),
    U32(&'a [u32]),
    I64(&'a [i64]),
    U64(&'a [u64]),
}

macro_rules! impl_from_vec {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for CubeData {
                fn from(v: Vec<$ty>) -> Self {
                    CubeData::$variant(v)
                }
            }

            impl<'a> From<&'a [$ty]> for FlatView<'a> {
                fn from(v: &'a [$ty]) -> Self {
                    FlatView::$variant(v)
                }
            }
        )*
    };
}

impl_from_vec!(
    U8 => u8,
    I16 => i16,
    I32 => i32,
    F32 => f32,
    F64 => f64,
    U16 => u16,
    U32 => u32,
    I64 => i64,
    U64 => u64,
);

impl CubeData {
    pub fn zeros(element_type: ElementType, len: usize) -> Self {
        match element_type {
            ElementType::U8 => CubeData::U8(vec![0; len]),
            ElementType::I16 => CubeData::I16(vec![0; len]),
            ElementType::I32 => CubeData::I32(vec![0; len]),
            ElementType::F32 => CubeData::F32(vec![0.0; len]),
            ElementType::F64 => CubeData::F64(vec![0.0; len]),
            ElementType::U16 => CubeData::U16(vec![0; len]),
            ElementType::U32 => CubeData::U32(vec![0; len]),
            ElementType::I64 => CubeData::I64(vec![0; len]),
            ElementType::U64 => CubeData::U64(vec![0; len]),
        }
    }

    pub fn view(&self) -> FlatView<'_> {
        match self {
            CubeData::U8(v) => FlatView::U8(v),
            CubeData::I16(v) => FlatView::I16(v),
            CubeData::I32(v) => FlatView::I32(v),
            CubeData::F32(v) => FlatView::F32(v),
            CubeData::F64(v) => FlatView::F64(v),
            CubeData::U16(v) => FlatView::U16(v),
            CubeData::U32(v) => FlatView::U32(v),
            CubeData::I64(v) => FlatView::I64(v),
            CubeData::U64(v) => FlatView::U64(v),
        }
    }

    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        self.view().element_type()
    }
}

impl FlatView<'_> {
    pub fn len(&self) -> usize {
        match self {
            FlatView::U8(v) => v.len(),
            FlatView::I16(v) => v.len(),
            FlatView::I32(v) => v.len(),
            FlatView::F32(v) => v.len(),
            FlatView::F64(v) => v.len(),
            FlatView::U16(v) => v.len(),
            FlatView::U32(v) => v.len(),
            FlatView::I64(v) => v.len(),
            FlatView::U64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            FlatView::U8(_) => ElementType::U8,
            FlatView::I16(_) => ElementType::I16,
            FlatView::I32(_) => ElementType::I32,
            FlatView::F32(_) => ElementType::F32,
            FlatView::F64(_) => ElementType::F64,
            FlatView::U16(_) => ElementType::U16,
            FlatView::U32(_) => ElementType::U32,
            FlatView::I64(_) => ElementType::I64,
            FlatView::U64(_) => ElementType::U64,
        }
    }
}

/// Attributes the histogram engine needs from a cube.
///
/// Every accessor is fallible so that adapters over loosely typed sources can
/// report `Error::MissingAttribute` instead of guessing.
pub trait CubeSource {
    fn shape(&self) -> Result<Shape>;

    /// Raw interleave tag; parsed (case-insensitively) by the caller
    fn interleave(&self) -> Result<&str>;

    /// Value the stored samples have already been multiplied by
    fn scale_factor(&self) -> Result<f64>;

    /// Flat elements assigned to one histogram band slot before advancing
    fn band_boundary(&self) -> Result<usize>;

    fn flat_view(&self) -> Result<FlatView<'_>>;
}

/// In-memory cube
#[derive(Debug, Clone)]
pub struct Cube {
    pub interleave: Interleave,
    pub shape: Shape,
    /// None means "guess from the element type"
    pub scale_factor: Option<f64>,
    /// None means the interleave's natural band boundary
    pub band_boundary: Option<usize>,
    pub description: String,
    data: CubeData,
}

impl Cube {
    pub fn new(interleave: Interleave, shape: Shape, data: impl Into<CubeData>) -> Result<Self> {
        let data = data.into();
        let expected = shape.checked_len().ok_or(Error::ShapeTooLarge(shape))?;
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Cube {
            interleave,
            shape,
            scale_factor: None,
            band_boundary: None,
            description: String::new(),
            data,
        })
    }

    /// Zero-filled cube with the conventional integer scale of 10000
    pub fn zeros(interleave: Interleave, shape: Shape, element_type: ElementType) -> Result<Self> {
        let len = shape.checked_len().ok_or(Error::ShapeTooLarge(shape))?;
        Ok(Cube {
            interleave,
            shape,
            scale_factor: Some(10000.0),
            band_boundary: None,
            description: String::new(),
            data: CubeData::zeros(element_type, len),
        })
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = Some(scale_factor);
        self
    }

    pub fn with_band_boundary(mut self, band_boundary: usize) -> Self {
        self.band_boundary = Some(band_boundary);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn data(&self) -> &CubeData {
        &self.data
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn summary(&self) -> CubeSummary {
        CubeSummary {
            description: self.description.clone(),
            interleave: self.interleave,
            shape: self.shape,
            element_type: self.element_type(),
            scale_factor: self.effective_scale_factor(),
        }
    }

    fn effective_scale_factor(&self) -> f64 {
        self.scale_factor
            .unwrap_or_else(|| self.element_type().default_scale_factor())
    }
}

impl CubeSource for Cube {
    fn shape(&self) -> Result<Shape> {
        Ok(self.shape)
    }

    fn interleave(&self) -> Result<&str> {
        Ok(self.interleave.as_str())
    }

    fn scale_factor(&self) -> Result<f64> {
        Ok(self.effective_scale_factor())
    }

    fn band_boundary(&self) -> Result<usize> {
        Ok(self
            .band_boundary
            .unwrap_or_else(|| self.interleave.default_band_boundary(self.shape)))
    }

    fn flat_view(&self) -> Result<FlatView<'_>> {
        Ok(self.data.view())
    }
}

/// Description of a cube as recorded in reports
#[derive(Debug, Clone, Serialize)]
pub struct CubeSummary {
    pub description: String,
    pub interleave: Interleave,
    pub shape: Shape,
    pub element_type: ElementType,
    pub scale_factor: f64,
}
