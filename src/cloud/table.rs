//! Columnar point storage.
//!
//! Decoded bodies land in a [`PointTable`]: one typed [`Column`] per layout
//! entry, all columns sharing the same row count. Projections come out as a
//! dense row-major [`PointMatrix`].

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use glam::DVec3;

use crate::pcd::FieldLayout;
use crate::util::{Error, Result, ScalarType};

/// Dispatch a closure over whichever typed vector the column holds.
macro_rules! each_column {
    ($col:expr, $v:ident => $body:expr) => {
        match $col {
            Column::U8($v) => $body,
            Column::U16($v) => $body,
            Column::U32($v) => $body,
            Column::U64($v) => $body,
            Column::I16($v) => $body,
            Column::I32($v) => $body,
            Column::I64($v) => $body,
            Column::F32($v) => $body,
            Column::F64($v) => $body,
        }
    };
}

/// One decoded field column, typed per its declared storage scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Column {
    /// Empty column of the given scalar type with room for `n` rows.
    pub fn with_capacity(ty: ScalarType, n: usize) -> Self {
        match ty {
            ScalarType::Uint8 => Self::U8(Vec::with_capacity(n)),
            ScalarType::Uint16 => Self::U16(Vec::with_capacity(n)),
            ScalarType::Uint32 => Self::U32(Vec::with_capacity(n)),
            ScalarType::Uint64 => Self::U64(Vec::with_capacity(n)),
            ScalarType::Int16 => Self::I16(Vec::with_capacity(n)),
            ScalarType::Int32 => Self::I32(Vec::with_capacity(n)),
            ScalarType::Int64 => Self::I64(Vec::with_capacity(n)),
            ScalarType::Float32 => Self::F32(Vec::with_capacity(n)),
            ScalarType::Float64 => Self::F64(Vec::with_capacity(n)),
        }
    }

    /// The storage scalar of this column.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::U8(_) => ScalarType::Uint8,
            Self::U16(_) => ScalarType::Uint16,
            Self::U32(_) => ScalarType::Uint32,
            Self::U64(_) => ScalarType::Uint64,
            Self::I16(_) => ScalarType::Int16,
            Self::I32(_) => ScalarType::Int32,
            Self::I64(_) => ScalarType::Int64,
            Self::F32(_) => ScalarType::Float32,
            Self::F64(_) => ScalarType::Float64,
        }
    }

    /// Number of rows stored.
    pub fn len(&self) -> usize {
        each_column!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode one little-endian scalar off `raw` and append it.
    ///
    /// `raw` must hold exactly `scalar_type().num_bytes()` bytes.
    pub(crate) fn push_le_bytes(&mut self, raw: &[u8]) {
        match self {
            Self::U8(v) => v.push(raw[0]),
            Self::U16(v) => v.push(LittleEndian::read_u16(raw)),
            Self::U32(v) => v.push(LittleEndian::read_u32(raw)),
            Self::U64(v) => v.push(LittleEndian::read_u64(raw)),
            Self::I16(v) => v.push(LittleEndian::read_i16(raw)),
            Self::I32(v) => v.push(LittleEndian::read_i32(raw)),
            Self::I64(v) => v.push(LittleEndian::read_i64(raw)),
            Self::F32(v) => v.push(LittleEndian::read_f32(raw)),
            Self::F64(v) => v.push(LittleEndian::read_f64(raw)),
        }
    }

    /// Decode a whole column from contiguous little-endian scalars.
    ///
    /// `raw` must be a multiple of the scalar width.
    pub(crate) fn from_le_bytes(ty: ScalarType, raw: &[u8]) -> Self {
        let mut col = Self::with_capacity(ty, raw.len() / ty.num_bytes());
        for chunk in raw.chunks_exact(ty.num_bytes()) {
            col.push_le_bytes(chunk);
        }
        col
    }

    /// Append a value parsed as `f32`, cast to the column type (the ascii
    /// fast path treats every column as floating point).
    pub(crate) fn push_f32_cast(&mut self, value: f32) {
        match self {
            Self::U8(v) => v.push(value as u8),
            Self::U16(v) => v.push(value as u16),
            Self::U32(v) => v.push(value as u32),
            Self::U64(v) => v.push(value as u64),
            Self::I16(v) => v.push(value as i16),
            Self::I32(v) => v.push(value as i32),
            Self::I64(v) => v.push(value as i64),
            Self::F32(v) => v.push(value),
            Self::F64(v) => v.push(value as f64),
        }
    }

    /// Append a token parsed with the column's own scalar semantics (the
    /// ascii row-by-row path, where integer columns stay integers).
    pub(crate) fn push_token(&mut self, token: &str) -> Result<()> {
        fn parsed<T: std::str::FromStr>(token: &str, ty: ScalarType) -> Result<T> {
            token.parse::<T>().map_err(|_| {
                Error::body(format!("invalid {} token {token:?}", ty.name()))
            })
        }

        let ty = self.scalar_type();
        match self {
            Self::U8(v) => v.push(parsed(token, ty)?),
            Self::U16(v) => v.push(parsed(token, ty)?),
            Self::U32(v) => v.push(parsed(token, ty)?),
            Self::U64(v) => v.push(parsed(token, ty)?),
            Self::I16(v) => v.push(parsed(token, ty)?),
            Self::I32(v) => v.push(parsed(token, ty)?),
            Self::I64(v) => v.push(parsed(token, ty)?),
            Self::F32(v) => v.push(parsed(token, ty)?),
            Self::F64(v) => v.push(parsed(token, ty)?),
        }
        Ok(())
    }

    /// Row `i` widened to `f32`.
    pub fn get_f32(&self, i: usize) -> f32 {
        each_column!(self, v => v[i] as f32)
    }

    /// Row `i` widened to `f64`.
    pub fn get_f64(&self, i: usize) -> f64 {
        each_column!(self, v => v[i] as f64)
    }

    /// Write row `i` as little-endian bytes.
    pub(crate) fn write_le<W: Write>(&self, i: usize, w: &mut W) -> std::io::Result<()> {
        match self {
            Self::U8(v) => w.write_u8(v[i]),
            Self::U16(v) => w.write_u16::<LittleEndian>(v[i]),
            Self::U32(v) => w.write_u32::<LittleEndian>(v[i]),
            Self::U64(v) => w.write_u64::<LittleEndian>(v[i]),
            Self::I16(v) => w.write_i16::<LittleEndian>(v[i]),
            Self::I32(v) => w.write_i32::<LittleEndian>(v[i]),
            Self::I64(v) => w.write_i64::<LittleEndian>(v[i]),
            Self::F32(v) => w.write_f32::<LittleEndian>(v[i]),
            Self::F64(v) => w.write_f64::<LittleEndian>(v[i]),
        }
    }

    /// Keep only rows whose mask entry is true. `keep` must match the
    /// column length.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        each_column!(self, v => {
            let mut i = 0;
            v.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        })
    }
}

/// Columnar table of decoded points.
///
/// Parallel `names` and `columns`; every column has the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointTable {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl PointTable {
    /// Empty table shaped after `layout`, with capacity for `rows` rows.
    pub(crate) fn with_layout(layout: &FieldLayout, rows: usize) -> Self {
        Self {
            names: layout.names().map(str::to_string).collect(),
            columns: layout
                .iter()
                .map(|f| Column::with_capacity(f.ty, rows))
                .collect(),
        }
    }

    /// Build a table from externally constructed columns.
    ///
    /// Converter pipelines use this to assemble a table for
    /// [`crate::pcd::write_pcd`]. Names must be unique and columns equal
    /// in length.
    pub fn from_columns(names: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(Error::body(format!(
                "{} names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::body(format!("duplicate column name {name:?}")));
            }
        }
        if let Some(first) = columns.first() {
            let rows = first.len();
            if columns.iter().any(|c| c.len() != rows) {
                return Err(Error::body("columns differ in length"));
            }
        }
        Ok(Self { names, columns })
    }

    /// Number of rows (zero for a table with no columns).
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in storage order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Look a column up by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index_of(name).map(|i| &self.columns[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Keep only rows whose mask entry is true, across every column.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for col in &mut self.columns {
            col.retain_rows(keep);
        }
    }
}

/// Dense row-major `f32` projection of selected columns.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl PointMatrix {
    pub(crate) fn new(rows: usize, cols: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `i` as a column-ordered slice.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// The raw row-major backing data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The first three columns as double-precision positions.
    ///
    /// This is what the geometry functions consume. Fails when fewer than
    /// three columns were projected.
    pub fn xyz(&self) -> Result<Vec<DVec3>> {
        if self.cols < 3 {
            return Err(Error::ShapeMismatch {
                expected: "at least 3 projected columns",
                actual: self.cols,
            });
        }
        Ok((0..self.rows)
            .map(|i| {
                let r = self.row(i);
                DVec3::new(r[0] as f64, r[1] as f64, r[2] as f64)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_le_round_trip() {
        let mut col = Column::with_capacity(ScalarType::Float32, 2);
        col.push_le_bytes(&1.5f32.to_le_bytes());
        col.push_le_bytes(&(-2.0f32).to_le_bytes());
        assert_eq!(col, Column::F32(vec![1.5, -2.0]));

        let mut out = Vec::new();
        col.write_le(0, &mut out).unwrap();
        col.write_le(1, &mut out).unwrap();
        assert_eq!(out[..4], 1.5f32.to_le_bytes());
        assert_eq!(out[4..], (-2.0f32).to_le_bytes());
    }

    #[test]
    fn test_column_from_le_bytes() {
        let mut raw = Vec::new();
        for v in [7u16, 8, 9] {
            raw.extend_from_slice(&v.to_le_bytes());
        }
        let col = Column::from_le_bytes(ScalarType::Uint16, &raw);
        assert_eq!(col, Column::U16(vec![7, 8, 9]));
    }

    #[test]
    fn test_push_token_respects_scalar_type() {
        let mut col = Column::with_capacity(ScalarType::Uint32, 1);
        col.push_token("4210884").unwrap();
        assert_eq!(col, Column::U32(vec![4210884]));
        assert!(col.push_token("1.5").is_err());

        let mut col = Column::with_capacity(ScalarType::Float32, 1);
        col.push_token("1.5").unwrap();
        assert_eq!(col, Column::F32(vec![1.5]));
    }

    #[test]
    fn test_retain_rows() {
        let mut col = Column::I32(vec![1, 2, 3, 4]);
        col.retain_rows(&[true, false, true, false]);
        assert_eq!(col, Column::I32(vec![1, 3]));
    }

    #[test]
    fn test_from_columns_validation() {
        let names = vec!["x".to_string(), "y".to_string()];
        let cols = vec![Column::F32(vec![1.0]), Column::F32(vec![2.0])];
        let table = PointTable::from_columns(names, cols).unwrap();
        assert_eq!(table.rows(), 1);
        assert_eq!(table.num_columns(), 2);

        let err = PointTable::from_columns(
            vec!["x".to_string(), "x".to_string()],
            vec![Column::F32(vec![1.0]), Column::F32(vec![2.0])],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidBody(_)));

        let err = PointTable::from_columns(
            vec!["x".to_string(), "y".to_string()],
            vec![Column::F32(vec![1.0]), Column::F32(vec![2.0, 3.0])],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidBody(_)));
    }

    #[test]
    fn test_matrix_rows_and_xyz() {
        let m = PointMatrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row(1), [4.0, 5.0, 6.0]);
        let pts = m.xyz().unwrap();
        assert_eq!(pts[0], DVec3::new(1.0, 2.0, 3.0));

        let narrow = PointMatrix::new(1, 2, vec![1.0, 2.0]);
        assert!(narrow.xyz().is_err());
    }
}
