//! Decoded point clouds.
//!
//! A [`PointCloud`] owns the header metadata and the columnar point table
//! produced by the decoder, and offers the projections the annotation
//! pipeline feeds on: dense coordinate matrices, the normalized field
//! order, and the NaN/zero validity filter.

mod table;

pub use table::{Column, PointMatrix, PointTable};

use std::io::Write;
use std::path::Path;

use glam::DVec3;

use crate::pcd::{self, PcdMetadata};
use crate::util::{Error, Result};

/// A decoded PCD file: header metadata plus the columnar point table.
#[derive(Debug)]
pub struct PointCloud {
    metadata: PcdMetadata,
    table: PointTable,
    invalid_points: usize,
}

impl PointCloud {
    pub(crate) fn new(metadata: PcdMetadata, table: PointTable) -> Self {
        Self {
            metadata,
            table,
            invalid_points: 0,
        }
    }

    pub fn metadata(&self) -> &PcdMetadata {
        &self.metadata
    }

    pub fn table(&self) -> &PointTable {
        &self.table
    }

    pub fn into_table(self) -> PointTable {
        self.table
    }

    /// Rows dropped by the last [`validate_points`](Self::validate_points)
    /// call.
    pub fn invalid_points(&self) -> usize {
        self.invalid_points
    }

    /// Field names in storage order.
    pub fn fields(&self) -> Vec<&str> {
        self.table.names().collect()
    }

    /// Drop rows whose coordinate triple is unusable.
    ///
    /// A row is kept when its `(x, y, z)` values contain no NaN and are not
    /// all exactly zero (the zero vector is the sensor's "no return"
    /// sentinel). Dropping is destructive; the removed count is recorded
    /// and returned. Running it again on a filtered table drops nothing.
    pub fn validate_points(&mut self) -> usize {
        let pc = self.project(&["x", "y", "z"]);
        if pc.cols() == 0 {
            self.invalid_points = 0;
            return 0;
        }

        let keep: Vec<bool> = (0..pc.rows())
            .map(|i| {
                let row = pc.row(i);
                row.iter().all(|v| !v.is_nan()) && row.iter().any(|v| *v != 0.0)
            })
            .collect();

        let dropped = keep.iter().filter(|k| !**k).count();
        if dropped > 0 {
            self.table.retain_rows(&keep);
        }
        self.invalid_points = dropped;
        dropped
    }

    /// Project the requested fields into a dense `f32` matrix.
    ///
    /// Columns come out in the requested order, not storage order; names
    /// absent from storage are silently skipped.
    pub fn project(&self, fields: &[&str]) -> PointMatrix {
        let cols: Vec<&Column> = fields
            .iter()
            .filter_map(|f| self.table.column(f))
            .collect();
        let rows = self.table.rows();
        let mut data = Vec::with_capacity(rows * cols.len());
        for i in 0..rows {
            for col in &cols {
                data.push(col.get_f32(i));
            }
        }
        PointMatrix::new(rows, cols.len(), data)
    }

    /// The coordinate columns as double-precision positions.
    pub fn xyz(&self) -> Result<Vec<DVec3>> {
        self.project(&["x", "y", "z"]).xyz()
    }

    /// The canonical field order for export: `x`, `y`, `z` (required),
    /// then `intensity` or `i` when stored, then any `extra` names that
    /// exist, in that order.
    pub fn normalized_fields(&self, extra: &[&str]) -> Result<Vec<String>> {
        let mut fields: Vec<String> = Vec::with_capacity(4 + extra.len());
        for f in ["x", "y", "z"] {
            if !self.table.contains(f) {
                return Err(Error::MissingField(f.to_string()));
            }
            fields.push(f.to_string());
        }

        if self.table.contains("intensity") {
            fields.push("intensity".to_string());
        } else if self.table.contains("i") {
            fields.push("i".to_string());
        }

        for f in extra {
            if self.table.contains(f) {
                fields.push(f.to_string());
            }
        }
        Ok(fields)
    }

    /// [`project`](Self::project) over [`normalized_fields`](Self::normalized_fields).
    pub fn normalized_points(&self, extra: &[&str]) -> Result<PointMatrix> {
        let fields = self.normalized_fields(extra)?;
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        Ok(self.project(&refs))
    }

    /// Serialize the table to a PCD byte stream (always `binary`).
    pub fn save_pcd<W: Write>(&self, sink: &mut W) -> Result<()> {
        pcd::write_pcd(&self.table, sink)
    }

    /// Serialize the table to a PCD file, creating or overwriting it.
    pub fn save_pcd_file(&self, path: impl AsRef<Path>) -> Result<()> {
        pcd::write_pcd_file(&self.table, path)
    }
}
