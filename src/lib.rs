//! # pcd-cloud
//!
//! Rust implementation of the PCD (Point Cloud Data) point set format used
//! by LiDAR pipelines, plus the oriented-box geometry that annotation
//! tooling computes over decoded point sets.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (storage scalars, errors)
//! - [`pcd`] - The PCD codec: header parsing, the three body encodings
//!   (`ascii`, `binary`, `binary_compressed`), LZF, and the writer
//! - [`cloud`] - Decoded point clouds: columnar tables, projections,
//!   validity filtering
//! - [`geom`] - Oriented-box geometry: poses, corners, membership counts,
//!   origin distance bounds
//!
//! ## Example
//!
//! ```no_run
//! use pcd_cloud::pcd::read_pcd_file;
//!
//! fn main() -> pcd_cloud::Result<()> {
//!     let cloud = read_pcd_file("scan.pcd")?;
//!     println!(
//!         "{} points ({} dropped as invalid)",
//!         cloud.table().rows(),
//!         cloud.invalid_points()
//!     );
//!     let xyz = cloud.project(&["x", "y", "z"]);
//!     println!("projected {} rows x {} cols", xyz.rows(), xyz.cols());
//!     Ok(())
//! }
//! ```

pub mod cloud;
pub mod geom;
pub mod pcd;
pub mod util;

// Re-export commonly used types
pub use cloud::{Column, PointCloud, PointMatrix, PointTable};
pub use pcd::{read_pcd_file, write_pcd_file, Encoding, PcdMetadata};
pub use util::{Error, Result, ScalarType};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cloud::{Column, PointCloud, PointMatrix, PointTable};
    pub use crate::geom::*;
    pub use crate::pcd::{
        read_pcd, read_pcd_file, read_pcd_file_raw, write_pcd, write_pcd_file, Encoding,
        FieldLayout, PcdMetadata,
    };
    pub use crate::util::{Error, Result, ScalarType};
}
