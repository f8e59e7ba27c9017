//! Point Cloud Data (PCD) file format.
//!
//! A PCD file is an ASCII `KEY value` header terminated by a `DATA` line,
//! followed by the point records in one of three encodings:
//!
//! - `ascii` - whitespace-delimited text
//! - `binary` - row-major packed records, little-endian
//! - `binary_compressed` - two `u32` sizes, then an LZF stream holding the
//!   columns field-major
//!
//! Reading goes header → field layout → body decode and produces a
//! [`crate::cloud::PointCloud`]; writing always emits a `binary` body.

pub mod compression;

mod header;
mod layout;
mod reader;
mod writer;

pub use header::{parse_header, Encoding, PcdMetadata};
pub use layout::{FieldLayout, FieldSpec};
pub use reader::{
    read_pcd, read_pcd_file, read_pcd_file_raw, read_pcd_header, read_pcd_raw,
};
pub use writer::{write_pcd, write_pcd_file};
