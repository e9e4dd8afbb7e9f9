//! Reading Nion Swift files.
//!
//! - [`NionReader`] - validates a file and assembles a [`Dataset`](crate::Dataset)
//! - [`ReaderOptions`] - memory mapping and checksum settings
//! - [`Container`] / [`ContainerKind`] - the `.ndata` and `.h5` backends

mod options;
mod container;
mod nion;
#[cfg(feature = "hdf5")]
pub mod hdf5;

pub use options::*;
pub use container::*;
pub use nion::*;
