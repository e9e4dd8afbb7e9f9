//! File access for `.ndata` containers.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::Mmap;

use crate::util::{Error, Result};

/// Seekable view over a container file.
/// Supports both memory-mapped and buffered I/O modes.
pub struct ContainerStream {
    inner: StreamInner,
    size: u64,
}

enum StreamInner {
    /// Memory-mapped file (preferred)
    Mmap(Cursor<Mmap>),
    /// Buffered file access (fallback, and for empty files)
    File(BufReader<File>),
}

impl ContainerStream {
    /// Open a file with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let size = file.metadata()?.len();

        let inner = if use_mmap && size > 0 {
            // Safety: the map is read-only and lives no longer than one scan
            let mmap = unsafe { Mmap::map(&file) }?;
            StreamInner::Mmap(Cursor::new(mmap))
        } else {
            StreamInner::File(BufReader::new(file))
        };

        tracing::debug!(path = %path.display(), size, mmap = matches!(inner, StreamInner::Mmap(_)), "opened container");

        Ok(Self { inner, size })
    }

    /// Total file size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Check whether the stream is memory mapped.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        matches!(self.inner, StreamInner::Mmap(_))
    }
}

impl Read for ContainerStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            StreamInner::Mmap(cursor) => cursor.read(buf),
            StreamInner::File(file) => file.read(buf),
        }
    }
}

impl Seek for ContainerStream {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match &mut self.inner {
            StreamInner::Mmap(cursor) => cursor.seek(pos),
            StreamInner::File(file) => file.seek(pos),
        }
    }
}
