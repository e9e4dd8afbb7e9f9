//! Container backends behind one payload-loading interface.

use std::ffi::OsStr;
use std::path::Path;

use super::ReaderOptions;
use crate::array::RawArray;
use crate::ndata::NDataArchive;
use crate::util::Result;

/// The container formats Nion Swift writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Store-only ZIP with `data.npy` and `metadata.json`
    NData,
    /// HDF5 file with a `data` dataset and a `properties` attribute
    Hdf5,
}

impl ContainerKind {
    /// Pick the container kind from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension().and_then(OsStr::to_str) {
            Some("ndata") => Some(Self::NData),
            Some("h5") => Some(Self::Hdf5),
            _ => None,
        }
    }
}

/// An open container of either kind.
pub enum Container {
    NData(NDataArchive),
    #[cfg(feature = "hdf5")]
    Hdf5(super::hdf5::Hdf5Container),
}

impl Container {
    /// Open and validate a container.
    pub fn open(kind: ContainerKind, path: &Path, options: &ReaderOptions) -> Result<Self> {
        match kind {
            ContainerKind::NData => Ok(Self::NData(NDataArchive::open(path, options)?)),
            #[cfg(feature = "hdf5")]
            ContainerKind::Hdf5 => Ok(Self::Hdf5(super::hdf5::Hdf5Container::open(path)?)),
            #[cfg(not(feature = "hdf5"))]
            ContainerKind::Hdf5 => Err(crate::util::Error::FeatureDisabled("hdf5")),
        }
    }

    /// Extract the array and the metadata JSON text.
    pub fn load(&mut self) -> Result<(RawArray, Vec<u8>)> {
        match self {
            Self::NData(archive) => archive.load(),
            #[cfg(feature = "hdf5")]
            Self::Hdf5(file) => file.load(),
        }
    }
}
