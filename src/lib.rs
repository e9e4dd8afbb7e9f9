//! # nion
//!
//! Reader for Nion Swift microscopy files (`.ndata` and `.h5`).
//!
//! Nion Swift stores each data item as an array plus a JSON property tree.
//! This crate locates both payloads, decodes the array, and maps the
//! properties onto a generic [`Dataset`] with calibrated, classified axes.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (element types, shapes, errors)
//! - [`ndata`] - Low-level `.ndata` ZIP container scanning
//! - [`npy`] - NumPy `.npy` payload decoding
//! - [`array`] - Runtime-typed n-dimensional arrays
//! - [`dataset`] - Dataset assembly and axis classification
//! - [`reader`] - High-level reader over both container kinds
//!
//! ## Example
//!
//! ```no_run
//! use nion::NionReader;
//!
//! let mut reader = NionReader::open("spectrum.ndata")?;
//! let dataset = reader.read()?;
//!
//! println!("{} ({})", dataset.title, dataset.data_type);
//! for dim in &dataset.dimensions {
//!     println!("  {} [{}] {}", dim.name, dim.units, dim.dimension_type);
//! }
//! # Ok::<(), nion::Error>(())
//! ```

pub mod util;
pub mod ndata;
pub mod npy;
pub mod array;
pub mod dataset;
pub mod reader;

use std::path::Path;

// Re-export commonly used types
pub use array::RawArray;
pub use dataset::{Dataset, DataType, Dimension, DimensionType};
pub use reader::{NionReader, ReaderOptions};
pub use util::{Error, Result, ScalarType, Shape};

/// Reader version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open a Nion file, validating its container.
pub fn open(path: impl AsRef<Path>) -> Result<NionReader> {
    NionReader::open(path)
}

/// Open and read a Nion file in one step.
pub fn read(path: impl AsRef<Path>) -> Result<Dataset> {
    NionReader::open(path)?.read()
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::array::RawArray;
    pub use crate::dataset::{Calibration, Dataset, DataType, Dimension, DimensionType};
    pub use crate::ndata::{ContainerIndex, NDataArchive};
    pub use crate::reader::{ContainerKind, NionReader, ReaderOptions};
    pub use crate::util::{Element, Error, Result, ScalarType, Shape};
}
