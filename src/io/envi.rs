//! ENVI cube reader and writer.
//!
//! An ENVI cube is a raw binary data file plus a plain-text `.hdr` header of
//! `key = value` pairs. Values wrapped in braces may span several lines.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::core::cube::{Cube, CubeData};
use crate::error::Result;
use crate::types::{ElementType, Interleave, Shape};

/// Errors encountered when reading ENVI headers and data files
#[derive(Debug, Error)]
pub enum EnviError {
    #[error("Not an ENVI header: {0}")]
    NotEnvi(PathBuf),
    #[error("No ENVI header found for {0}")]
    HeaderNotFound(PathBuf),
    #[error("No data file found next to header {0}")]
    DataNotFound(PathBuf),
    #[error("Missing field `{0}` in ENVI header")]
    MissingField(&'static str),
    #[error("Cannot parse `{key}` value {value:?}")]
    Parse { key: String, value: String },
    #[error("Cube {0} is too large to address")]
    TooLarge(Shape),
    #[error("Unterminated brace value for `{0}`")]
    Unterminated(String),
    #[error("Data file holds {actual} bytes after the header offset, cube needs {expected}")]
    Truncated { expected: usize, actual: usize },
}

const HEADER_EXTENSIONS: [&str; 2] = ["hdr", "HDR"];

/// Parsed header fields, keyed by lower-case name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnviHeader {
    fields: BTreeMap<String, String>,
}

impl EnviHeader {
    pub fn parse(text: &str) -> std::result::Result<Self, EnviError> {
        let mut fields = BTreeMap::new();
        let mut pending: Option<(String, String)> = None;

        for line in text.lines() {
            if let Some((key, mut value)) = pending.take() {
                if let Some(end) = line.find('}') {
                    value.push_str(&line[..end]);
                    fields.insert(key, value.trim().to_string());
                } else {
                    value.push_str(line);
                    value.push('\n');
                    pending = Some((key, value));
                }
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();
            if let Some(rest) = value.strip_prefix('{') {
                match rest.find('}') {
                    Some(end) => {
                        fields.insert(key, rest[..end].trim().to_string());
                    }
                    None => {
                        let mut start = rest.to_string();
                        if !start.is_empty() {
                            start.push('\n');
                        }
                        pending = Some((key, start));
                    }
                }
            } else {
                fields.insert(key, value.to_string());
            }
        }

        if let Some((key, _)) = pending {
            return Err(EnviError::Unterminated(key));
        }
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    fn parse_field<T: std::str::FromStr>(
        &self,
        key: &'static str,
    ) -> std::result::Result<Option<T>, EnviError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value.trim().parse().map(Some).map_err(|_| EnviError::Parse {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn required<T: std::str::FromStr>(
        &self,
        key: &'static str,
    ) -> std::result::Result<T, EnviError> {
        self.parse_field(key)?.ok_or(EnviError::MissingField(key))
    }

    /// Cube dimensions; the element count must fit in `usize`
    pub fn shape(&self) -> std::result::Result<Shape, EnviError> {
        let shape = Shape::new(
            self.required("samples")?,
            self.required("lines")?,
            self.required("bands")?,
        );
        match shape.checked_len() {
            Some(_) => Ok(shape),
            None => Err(EnviError::TooLarge(shape)),
        }
    }

    pub fn interleave(&self) -> Result<Interleave> {
        self.get("interleave")
            .ok_or(EnviError::MissingField("interleave"))?
            .parse()
    }

    pub fn element_type(&self) -> Result<ElementType> {
        ElementType::from_envi_code(self.required("data type")?)
    }

    /// True for big-endian data (`byte order = 1`)
    pub fn big_endian(&self) -> std::result::Result<bool, EnviError> {
        Ok(self.parse_field::<u8>("byte order")?.unwrap_or(0) == 1)
    }

    pub fn header_offset(&self) -> std::result::Result<usize, EnviError> {
        Ok(self.parse_field("header offset")?.unwrap_or(0))
    }

    pub fn scale_factor(&self) -> std::result::Result<Option<f64>, EnviError> {
        self.parse_field("reflectance scale factor")
    }

    pub fn description(&self) -> &str {
        self.get("description").unwrap_or("")
    }
}

fn is_header(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| HEADER_EXTENSIONS.contains(&e))
}

/// Header for `path`, which may name the header itself or its data file
pub fn find_header(path: &Path) -> std::result::Result<PathBuf, EnviError> {
    if is_header(path) {
        return Ok(path.to_path_buf());
    }
    let mut candidates = Vec::new();
    for ext in HEADER_EXTENSIONS {
        let mut appended = path.as_os_str().to_owned();
        appended.push(".");
        appended.push(ext);
        candidates.push(PathBuf::from(appended));
    }
    for ext in HEADER_EXTENSIONS {
        candidates.push(path.with_extension(ext));
    }
    candidates
        .into_iter()
        .find(|c| c.is_file())
        .ok_or_else(|| EnviError::HeaderNotFound(path.to_path_buf()))
}

/// Data file sitting next to `header`
pub fn find_data_file(
    header: &Path,
    interleave: Interleave,
) -> std::result::Result<PathBuf, EnviError> {
    let stem = header.with_extension("");
    if stem.is_file() {
        return Ok(stem);
    }
    let il = interleave.as_str();
    let il_upper = il.to_ascii_uppercase();
    let exts = [
        "img", "IMG", il, il_upper.as_str(), "dat", "DAT", "sli", "SLI", "bin", "BIN",
    ];
    exts.iter()
        .map(|ext| stem.with_extension(ext))
        .find(|c| c.is_file())
        .ok_or_else(|| EnviError::DataNotFound(header.to_path_buf()))
}

fn decode<T, const N: usize>(
    bytes: &[u8],
    big_endian: bool,
    from_le: fn([u8; N]) -> T,
    from_be: fn([u8; N]) -> T,
) -> Vec<T> {
    let convert = if big_endian { from_be } else { from_le };
    bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut raw = [0u8; N];
            raw.copy_from_slice(chunk);
            convert(raw)
        })
        .collect()
}

/// Decode raw sample bytes of `element_type`
pub fn decode_samples(bytes: &[u8], element_type: ElementType, big_endian: bool) -> CubeData {
    macro_rules! decode_as {
        ($variant:ident, $ty:ty) => {
            CubeData::$variant(decode(
                bytes,
                big_endian,
                <$ty>::from_le_bytes,
                <$ty>::from_be_bytes,
            ))
        };
    }

    match element_type {
        ElementType::U8 => CubeData::U8(bytes.to_vec()),
        ElementType::I16 => decode_as!(I16, i16),
        ElementType::I32 => decode_as!(I32, i32),
        ElementType::F32 => decode_as!(F32, f32),
        ElementType::F64 => decode_as!(F64, f64),
        ElementType::U16 => decode_as!(U16, u16),
        ElementType::U32 => decode_as!(U32, u32),
        ElementType::I64 => decode_as!(I64, i64),
        ElementType::U64 => decode_as!(U64, u64),
    }
}

/// Read an ENVI cube given either its header or its data file
pub fn read_envi(path: &Path) -> Result<Cube> {
    let header_path = find_header(path)?;
    let text = std::fs::read_to_string(&header_path)?;
    if !text.trim_start().starts_with("ENVI") {
        return Err(EnviError::NotEnvi(header_path).into());
    }
    let header = EnviHeader::parse(&text)?;

    let shape = header.shape()?;
    let interleave = header.interleave()?;
    let element_type = header.element_type()?;
    let big_endian = header.big_endian()?;
    let offset = header.header_offset()?;

    let data_path = if is_header(path) {
        find_data_file(&header_path, interleave)?
    } else {
        path.to_path_buf()
    };
    debug!("ENVI header {:?} -> data {:?}", header_path, data_path);

    let expected = shape
        .len()
        .checked_mul(element_type.size())
        .ok_or(EnviError::TooLarge(shape))?;
    let bytes = std::fs::read(&data_path)?;
    let available = bytes.len().saturating_sub(offset);
    if available < expected {
        return Err(EnviError::Truncated {
            expected,
            actual: available,
        }
        .into());
    }
    let data = decode_samples(&bytes[offset..offset + expected], element_type, big_endian);

    info!(
        "Loaded ENVI cube {:?}: {} interleave={} type={}",
        data_path, shape, interleave, element_type
    );

    let mut cube = Cube::new(interleave, shape, data)?.with_description(header.description());
    cube.scale_factor = header.scale_factor()?;
    Ok(cube)
}

fn encode(data: &CubeData) -> Vec<u8> {
    match data {
        CubeData::U8(v) => v.clone(),
        CubeData::I16(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        CubeData::I32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        CubeData::F32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        CubeData::F64(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        CubeData::U16(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        CubeData::U32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        CubeData::I64(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        CubeData::U64(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
    }
}

/// Header text describing `cube` with little-endian data at offset 0
pub fn header_text(cube: &Cube) -> String {
    let mut text = String::from("ENVI\n");
    text.push_str(&format!("description = {{{}}}\n", cube.description));
    text.push_str(&format!("samples = {}\n", cube.shape.samples));
    text.push_str(&format!("lines = {}\n", cube.shape.lines));
    text.push_str(&format!("bands = {}\n", cube.shape.bands));
    text.push_str("header offset = 0\n");
    text.push_str("file type = ENVI Standard\n");
    text.push_str(&format!("data type = {}\n", cube.element_type().envi_code()));
    text.push_str(&format!("interleave = {}\n", cube.interleave));
    text.push_str("byte order = 0\n");
    if let Some(scale) = cube.scale_factor {
        text.push_str(&format!("reflectance scale factor = {}\n", scale));
    }
    text
}

/// Write `cube` to `data_path` and its header to `data_path` with a `.hdr`
/// extension. Returns the header path.
pub fn write_envi(cube: &Cube, data_path: &Path) -> Result<PathBuf> {
    let file = File::create(data_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&encode(cube.data()))?;
    writer.flush()?;

    let header_path = data_path.with_extension("hdr");
    std::fs::write(&header_path, header_text(cube))?;
    info!("Wrote ENVI cube {:?} with header {:?}", data_path, header_path);
    Ok(header_path)
}
