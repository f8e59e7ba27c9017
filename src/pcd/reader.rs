//! PCD decoding: header scan, layout derivation, body decode.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::cloud::{Column, PointCloud, PointTable};
use crate::pcd::{compression, parse_header, Encoding, FieldLayout, PcdMetadata};
use crate::util::{Error, Result};

/// Read a point cloud from a file and drop invalid points (NaN or all-zero
/// coordinates), the way annotation consumers expect their input.
pub fn read_pcd_file<P: AsRef<Path>>(p: P) -> Result<PointCloud> {
    let mut cloud = read_pcd_file_raw(p)?;
    cloud.validate_points();
    Ok(cloud)
}

/// Read a point cloud from a file without the validity filter.
///
/// Segmentation consumers index label columns positionally against a
/// sibling file and need every decoded row kept.
pub fn read_pcd_file_raw<P: AsRef<Path>>(p: P) -> Result<PointCloud> {
    let path = p.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    read_pcd_raw(BufReader::new(file))
}

/// Read a point cloud from any buffered source, dropping invalid points.
pub fn read_pcd<R: BufRead>(r: R) -> Result<PointCloud> {
    let mut cloud = read_pcd_raw(r)?;
    cloud.validate_points();
    Ok(cloud)
}

/// Read a point cloud from any buffered source without the validity filter.
pub fn read_pcd_raw<R: BufRead>(mut r: R) -> Result<PointCloud> {
    let metadata = parse_header(&mut r)?;
    let layout = FieldLayout::from_metadata(&metadata)?;

    let table = if layout.is_empty() {
        PointTable::with_layout(&layout, 0)
    } else {
        match metadata.data {
            Encoding::Ascii => decode_ascii(&mut r, &metadata, &layout)?,
            Encoding::Binary => decode_binary(&mut r, &metadata, &layout)?,
            Encoding::BinaryCompressed => decode_compressed(&mut r, &metadata, &layout)?,
        }
    };

    Ok(PointCloud::new(metadata, table))
}

/// Read only the header of a PCD stream.
pub fn read_pcd_header<R: BufRead>(mut r: R) -> Result<PcdMetadata> {
    parse_header(&mut r)
}

/// Row-major interleaved records: `points * stride` bytes, fields packed
/// back to back in layout order.
fn decode_binary<R: Read>(
    r: &mut R,
    meta: &PcdMetadata,
    layout: &FieldLayout,
) -> Result<PointTable> {
    let stride = layout.stride();
    let need = meta
        .points
        .checked_mul(stride)
        .ok_or_else(|| Error::body("declared point count overflows"))?;

    let mut buf = Vec::with_capacity(need);
    r.take(need as u64).read_to_end(&mut buf)?;
    if buf.len() < need {
        return Err(Error::body(format!(
            "binary body truncated: expected {need} bytes, got {}",
            buf.len()
        )));
    }

    let mut table = PointTable::with_layout(layout, meta.points);
    for row in buf.chunks_exact(stride) {
        let mut offset = 0;
        for (j, field) in layout.iter().enumerate() {
            let width = field.ty.num_bytes();
            table.columns_mut()[j].push_le_bytes(&row[offset..offset + width]);
            offset += width;
        }
    }
    Ok(table)
}

/// LZF-compressed field-major body: two u32 sizes, then one compressed
/// stream holding each field's whole column back to back.
fn decode_compressed<R: Read>(
    r: &mut R,
    meta: &PcdMetadata,
    layout: &FieldLayout,
) -> Result<PointTable> {
    let compressed_size = r.read_u32::<LittleEndian>()? as usize;
    let uncompressed_size = r.read_u32::<LittleEndian>()? as usize;

    let mut compressed = vec![0u8; compressed_size];
    r.read_exact(&mut compressed).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::body(format!(
                "compressed body truncated: expected {compressed_size} bytes"
            ))
        } else {
            Error::Io(e)
        }
    })?;

    let buf = compression::decompress(&compressed, uncompressed_size)?;

    let mut table = PointTable::with_layout(layout, meta.points);
    let mut start = 0usize;
    for (j, field) in layout.iter().enumerate() {
        let bytes = field
            .ty
            .num_bytes()
            .checked_mul(meta.points)
            .ok_or_else(|| Error::body("declared point count overflows"))?;
        let chunk = buf.get(start..start + bytes).ok_or_else(|| {
            Error::body(format!(
                "decompressed body holds {} bytes, field columns need {}",
                buf.len(),
                start + bytes
            ))
        })?;
        table.columns_mut()[j] = Column::from_le_bytes(field.ty, chunk);
        start += bytes;
    }
    Ok(table)
}

/// Whitespace-delimited text body.
fn decode_ascii<R: Read>(
    r: &mut R,
    meta: &PcdMetadata,
    layout: &FieldLayout,
) -> Result<PointTable> {
    let mut text = String::new();
    r.read_to_string(&mut text).map_err(|e| {
        if e.kind() == ErrorKind::InvalidData {
            Error::body("ascii body is not valid UTF-8")
        } else {
            Error::Io(e)
        }
    })?;

    let mut table = PointTable::with_layout(layout, meta.points);

    if layout.contains("rgb") {
        // row-by-row with per-column parsing: packed rgb floats and
        // integer columns keep their declared semantics
        let mut rows = 0usize;
        for line in text.lines() {
            if rows == meta.points {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != layout.len() {
                return Err(Error::body(format!(
                    "row {rows} holds {} values, layout has {} fields",
                    tokens.len(),
                    layout.len()
                )));
            }
            for (j, token) in tokens.iter().enumerate() {
                table.columns_mut()[j].push_token(token)?;
            }
            rows += 1;
        }
        if rows < meta.points {
            return Err(Error::body(format!(
                "ascii body holds {rows} rows, header declares {}",
                meta.points
            )));
        }
    } else {
        // fast path: one flat float parse, then redistribute columns
        let need = meta
            .points
            .checked_mul(layout.len())
            .ok_or_else(|| Error::body("declared point count overflows"))?;
        let mut values: Vec<f32> = Vec::with_capacity(need);
        for token in text.split_whitespace().take(need) {
            let v = token
                .parse::<f32>()
                .map_err(|_| Error::body(format!("invalid float token {token:?}")))?;
            values.push(v);
        }
        if values.len() < need {
            return Err(Error::body(format!(
                "ascii body holds {} values, header declares {need}",
                values.len()
            )));
        }
        for row in values.chunks_exact(layout.len()) {
            for (j, v) in row.iter().enumerate() {
                table.columns_mut()[j].push_f32_cast(*v);
            }
        }
    }

    Ok(table)
}
