//! PCD serialization.
//!
//! The writer always emits a `binary` body with a flattened schema: one
//! COUNT-1 entry per column, whatever encoding the data originally came
//! from. Multi-count groups must be flattened by the caller before they
//! reach the writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cloud::PointTable;
use crate::util::Result;

/// Serialize `table` as a PCD byte stream.
///
/// The header is derived from the table schema; the body is row-major
/// little-endian records with no footer or padding.
pub fn write_pcd<W: Write>(table: &PointTable, w: &mut W) -> Result<()> {
    let names: Vec<&str> = table.names().collect();
    let sizes: Vec<String> = table
        .columns()
        .iter()
        .map(|c| c.scalar_type().num_bytes().to_string())
        .collect();
    let types: Vec<String> = table
        .columns()
        .iter()
        .map(|c| c.scalar_type().type_char().to_string())
        .collect();
    let counts = vec!["1"; names.len()];
    let points = table.rows();

    writeln!(w, "# .PCD v0.7 - Point Cloud Data file format")?;
    writeln!(w, "VERSION 0.7")?;
    writeln!(w, "FIELDS {}", names.join(" "))?;
    writeln!(w, "SIZE {}", sizes.join(" "))?;
    writeln!(w, "TYPE {}", types.join(" "))?;
    writeln!(w, "COUNT {}", counts.join(" "))?;
    writeln!(w, "WIDTH {points}")?;
    writeln!(w, "HEIGHT 1")?;
    writeln!(w, "VIEWPOINT 0 0 0 1 0 0 0")?;
    writeln!(w, "POINTS {points}")?;
    writeln!(w, "DATA binary")?;

    for i in 0..points {
        for col in table.columns() {
            col.write_le(i, w)?;
        }
    }
    Ok(())
}

/// Serialize `table` to `path`, creating or overwriting the file.
///
/// Parent directories are not created.
pub fn write_pcd_file<P: AsRef<Path>>(table: &PointTable, path: P) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_pcd(table, &mut w)?;
    w.flush()?;
    Ok(())
}
