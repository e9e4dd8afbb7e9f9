//! `.ndata` archive reader.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use super::format::{DATA_ENTRY, METADATA_ENTRY};
use super::index::{parse_zip, ContainerIndex, LocalFile};
use super::stream::ContainerStream;
use crate::array::RawArray;
use crate::npy;
use crate::reader::ReaderOptions;
use crate::util::{Error, Result};

/// An open `.ndata` file together with its scanned index.
pub struct NDataArchive {
    stream: ContainerStream,
    index: ContainerIndex,
    verify_checksums: bool,
}

impl NDataArchive {
    /// Open and scan a `.ndata` file.
    pub fn open(path: impl AsRef<Path>, options: &ReaderOptions) -> Result<Self> {
        let mut stream = ContainerStream::open_opts(path, options.use_mmap)?;
        let index = parse_zip(&mut stream)?;

        if index.len() > 2 {
            tracing::warn!(entries = ?index.entry_names(), "container holds unexpected entries");
        }

        Ok(Self {
            stream,
            index,
            verify_checksums: options.verify_checksums,
        })
    }

    /// The scanned container index.
    #[inline]
    pub fn index(&self) -> &ContainerIndex {
        &self.index
    }

    /// Size of the container file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        self.stream.size()
    }

    /// Check whether the file was memory mapped.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.stream.is_mapped()
    }

    /// Read the stored payload of a named entry.
    pub fn read_entry(&mut self, name: &[u8]) -> Result<Vec<u8>> {
        let entry = self.index.require(name)?.clone();
        self.read_local_file(&entry)
    }

    fn read_local_file(&mut self, entry: &LocalFile) -> Result<Vec<u8>> {
        self.stream.seek(SeekFrom::Start(entry.data_pos))?;
        let mut buf = vec![0u8; entry.data_len as usize];
        self.stream.read_exact(&mut buf)?;

        if self.verify_checksums {
            let mut crc = flate2::Crc::new();
            crc.update(&buf);
            let actual = crc.sum();
            if actual != entry.crc32 {
                return Err(Error::ChecksumMismatch {
                    name: entry.name_lossy().into_owned(),
                    expected: entry.crc32,
                    actual,
                });
            }
        }

        Ok(buf)
    }

    /// Decode the array payload and return it with the raw metadata text.
    pub fn load(&mut self) -> Result<(RawArray, Vec<u8>)> {
        // Resolve both names before reading either payload.
        let data = self.index.require(DATA_ENTRY)?.clone();
        let metadata = self.index.require(METADATA_ENTRY)?.clone();

        let array = npy::read_npy(&self.read_local_file(&data)?)?;
        let json = self.read_local_file(&metadata)?;
        Ok((array, json))
    }
}
