//! The `NionReader` entry point.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{Container, ContainerKind, ReaderOptions};
use crate::array::RawArray;
use crate::dataset::{assemble, Dataset};
use crate::util::{Error, Result};

/// Reader for Nion Swift `.ndata` and `.h5` files.
///
/// Opening validates the container; every [`read`](Self::read) opens it
/// again, scans it and releases it before returning.
#[derive(Debug)]
pub struct NionReader {
    path: PathBuf,
    kind: ContainerKind,
    options: ReaderOptions,
    data: Option<RawArray>,
    original_metadata: Option<Map<String, Value>>,
}

impl NionReader {
    /// Open a file with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ReaderOptions::default())
    }

    /// Open a file, checking that it is a Nion container.
    pub fn open_with(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let kind = ContainerKind::from_path(&path)
            .ok_or_else(|| Error::UnsupportedExtension(path.clone()))?;

        Container::open(kind, &path, &options).map_err(|e| e.in_file(&path))?;

        Ok(Self {
            path,
            kind,
            options,
            data: None,
            original_metadata: None,
        })
    }

    /// Check whether a path has an extension this reader handles.
    pub fn can_read(path: impl AsRef<Path>) -> bool {
        ContainerKind::from_path(path).is_some()
    }

    /// Read the file into a [`Dataset`].
    ///
    /// On success the raw array and original metadata are also kept for
    /// [`data`](Self::data) and [`original_metadata`](Self::original_metadata).
    pub fn read(&mut self) -> Result<Dataset> {
        let (array, metadata) = Container::open(self.kind, &self.path, &self.options)
            .and_then(|mut container| container.load())
            .map_err(|e| e.in_file(&self.path))?;

        let dataset = assemble(array, &metadata, &self.basename())?;

        self.data = Some(dataset.data.clone());
        self.original_metadata = Some(dataset.original_metadata.clone());
        Ok(dataset)
    }

    /// Path the reader was opened with.
    #[inline]
    pub fn filename(&self) -> &Path {
        &self.path
    }

    /// Array from the last successful read.
    #[inline]
    pub fn data(&self) -> Option<&RawArray> {
        self.data.as_ref()
    }

    /// Metadata from the last successful read, with units backfilled.
    #[inline]
    pub fn original_metadata(&self) -> Option<&Map<String, Value>> {
        self.original_metadata.as_ref()
    }

    /// File name without directory or extension.
    fn basename(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
