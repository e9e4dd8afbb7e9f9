//! Error types for the Nion reader.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for Nion file operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File extension is neither `.ndata` nor `.h5`
    #[error("Unsupported file extension: {0} (expected .ndata or .h5)")]
    UnsupportedExtension(PathBuf),

    /// Unknown record signature in the ZIP structure
    #[error("Malformed container: unexpected signature {signature:#010x} at offset {offset}")]
    MalformedContainer { offset: u64, signature: u32 },

    /// A record or payload runs past the end of the stream
    #[error("Truncated container: {needed} bytes needed at offset {offset}, stream is {len} bytes")]
    TruncatedContainer { offset: u64, needed: u64, len: u64 },

    /// Required entry is absent from the container
    #[error("Missing entry: {0}")]
    MissingEntry(String),

    /// Stored CRC32 does not match the payload
    #[error("Checksum mismatch for {name}: stored {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { name: String, expected: u32, actual: u32 },

    /// Array payload is not a valid `.npy` stream
    #[error("Invalid npy payload: {0}")]
    InvalidNpy(String),

    /// Array element type has no in-memory representation here
    #[error("Unsupported dtype: {0}")]
    UnsupportedDtype(String),

    /// Metadata payload is not valid JSON
    #[error("Metadata is not valid JSON: {0}")]
    MetadataParse(#[from] serde_json::Error),

    /// Metadata is valid JSON but not shaped as expected
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Only 1, 2 and 3 dimensional data is supported
    #[error("Data type not implemented for {0}-dimensional data")]
    UnsupportedDimensionality(usize),

    /// The container kind needs a cargo feature that is not enabled
    #[error("Support for this container requires the `{0}` feature")]
    FeatureDisabled(&'static str),

    /// Container error annotated with the offending file
    #[error("File {} does not seem to be of Nion's format: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HDF5 library error
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

impl Error {
    /// Create an invalid npy error.
    pub fn npy(msg: impl Into<String>) -> Self {
        Self::InvalidNpy(msg.into())
    }

    /// Create an invalid metadata error.
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }

    /// Attach the file path to this error.
    ///
    /// `FileNotFound` already names its file and is returned as is.
    pub fn in_file(self, path: impl AsRef<Path>) -> Self {
        match self {
            Self::FileNotFound(_) | Self::InFile { .. } => self,
            other => Self::InFile {
                path: path.as_ref().to_path_buf(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, skipping any file annotation.
    pub fn inner(&self) -> &Error {
        match self {
            Self::InFile { source, .. } => source.inner(),
            other => other,
        }
    }
}

/// Result type alias for Nion operations.
pub type Result<T> = std::result::Result<T, Error>;
