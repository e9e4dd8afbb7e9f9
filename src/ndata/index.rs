//! Container index - one forward scan over the ZIP records of a `.ndata` file.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;

use byteorder::{LittleEndian, ReadBytesExt};

use super::format::*;
use crate::util::{Error, Result};

/// A local file header and the payload that follows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFile {
    /// Raw entry name as stored.
    pub name: Vec<u8>,
    /// Offset of the first payload byte.
    pub data_pos: u64,
    /// Stored (uncompressed) payload length.
    pub data_len: u64,
    /// CRC-32 recorded in the header.
    pub crc32: u32,
}

impl LocalFile {
    /// Entry name, with invalid UTF-8 replaced.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Byte range of the payload within the file.
    pub fn data_range(&self) -> Range<u64> {
        self.data_pos..self.data_pos + self.data_len
    }
}

/// A central directory record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Offset of the central directory record itself.
    pub header_pos: u64,
    /// Offset of the local file header it refers to.
    pub local_file_pos: u64,
}

/// The end of central directory record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    /// Offset of the EOCD signature.
    pub pos: u64,
    /// Offset of the first central directory record, as stored.
    pub first_directory_pos: u64,
}

/// Everything one scan learns about a container.
///
/// Local files are keyed by header offset, directory records by entry
/// name. Names resolve to payloads through the directory's local header
/// offset.
#[derive(Clone, Debug)]
pub struct ContainerIndex {
    local_files: BTreeMap<u64, LocalFile>,
    directory: HashMap<Vec<u8>, DirectoryEntry>,
    eocd: EndOfCentralDirectory,
}

impl ContainerIndex {
    /// Scan a stream. See [`parse_zip`].
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        parse_zip(reader)
    }

    /// Local file headers keyed by offset.
    #[inline]
    pub fn local_files(&self) -> &BTreeMap<u64, LocalFile> {
        &self.local_files
    }

    /// Central directory records keyed by entry name.
    #[inline]
    pub fn directory(&self) -> &HashMap<Vec<u8>, DirectoryEntry> {
        &self.directory
    }

    /// The end of central directory record.
    #[inline]
    pub fn eocd(&self) -> EndOfCentralDirectory {
        self.eocd
    }

    /// Number of central directory entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// Check if the directory lists no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Check whether the directory lists `name`.
    pub fn contains(&self, name: &[u8]) -> bool {
        self.directory.contains_key(name)
    }

    /// Resolve a name to its payload through the central directory.
    pub fn entry(&self, name: &[u8]) -> Option<&LocalFile> {
        let dir = self.directory.get(name)?;
        self.local_files.get(&dir.local_file_pos)
    }

    /// Like [`entry`](Self::entry), but absence is an error.
    ///
    /// A directory record pointing at no scanned local header counts as absent.
    pub fn require(&self, name: &[u8]) -> Result<&LocalFile> {
        self.entry(name)
            .ok_or_else(|| Error::MissingEntry(String::from_utf8_lossy(name).into_owned()))
    }

    /// Directory entry names in the order they appear in the file.
    pub fn entry_names(&self) -> Vec<String> {
        let mut entries: Vec<_> = self.directory.iter().collect();
        entries.sort_by_key(|(_, dir)| dir.header_pos);
        entries
            .into_iter()
            .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
            .collect()
    }
}

/// Bounded little-endian field access over a seekable stream.
struct RecordReader<'a, R> {
    reader: &'a mut R,
    len: u64,
}

impl<R: Read + Seek> RecordReader<'_, R> {
    fn ensure(&self, offset: u64, needed: u64) -> Result<()> {
        match offset.checked_add(needed) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(Error::TruncatedContainer { offset, needed, len: self.len }),
        }
    }

    fn u16_at(&mut self, offset: u64) -> Result<u16> {
        self.ensure(offset, 2)?;
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(self.reader.read_u16::<LittleEndian>()?)
    }

    fn u32_at(&mut self, offset: u64) -> Result<u32> {
        self.ensure(offset, 4)?;
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(self.reader.read_u32::<LittleEndian>()?)
    }

    fn bytes_at(&mut self, offset: u64, len: u64) -> Result<Vec<u8>> {
        self.ensure(offset, len)?;
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len as usize];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// Parse the ZIP records of a store-only container.
///
/// The stream is rewound to offset 0 and walked record by record until the
/// end of central directory record. Every field is read within the measured
/// stream length. The stream is left at an unspecified position.
pub fn parse_zip<R: Read + Seek>(reader: &mut R) -> Result<ContainerIndex> {
    let len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut records = RecordReader { reader, len };
    let mut local_files = BTreeMap::new();
    let mut directory = HashMap::new();
    let mut pos = 0u64;

    let eocd = loop {
        let signature = records.u32_at(pos)?;
        match signature {
            LOCAL_FILE_HEADER_SIGNATURE => {
                let crc32 = records.u32_at(pos + LOCAL_CRC32_OFFSET)?;
                let data_len = u64::from(records.u32_at(pos + LOCAL_COMPRESSED_SIZE_OFFSET)?);
                let name_len = u64::from(records.u16_at(pos + LOCAL_NAME_LEN_OFFSET)?);
                let extra_len = u64::from(records.u16_at(pos + LOCAL_EXTRA_LEN_OFFSET)?);
                let name = records.bytes_at(pos + LOCAL_HEADER_SIZE, name_len)?;

                let data_pos = pos + LOCAL_HEADER_SIZE + name_len + extra_len;
                records.ensure(data_pos, data_len)?;

                tracing::trace!(
                    pos,
                    name = %String::from_utf8_lossy(&name),
                    data_pos,
                    data_len,
                    "local file header"
                );
                local_files.insert(pos, LocalFile { name, data_pos, data_len, crc32 });
                pos = data_pos + data_len;
            }
            CENTRAL_DIRECTORY_SIGNATURE => {
                let name_len = u64::from(records.u16_at(pos + CENTRAL_NAME_LEN_OFFSET)?);
                let extra_len = u64::from(records.u16_at(pos + CENTRAL_EXTRA_LEN_OFFSET)?);
                let comment_len = u64::from(records.u16_at(pos + CENTRAL_COMMENT_LEN_OFFSET)?);
                let local_file_pos = u64::from(records.u32_at(pos + CENTRAL_LOCAL_HEADER_OFFSET)?);
                let name = records.bytes_at(pos + CENTRAL_HEADER_SIZE, name_len)?;

                let next = pos + CENTRAL_HEADER_SIZE + name_len + extra_len + comment_len;
                records.ensure(pos, next - pos)?;

                tracing::trace!(
                    pos,
                    name = %String::from_utf8_lossy(&name),
                    local_file_pos,
                    "central directory header"
                );
                directory.insert(name, DirectoryEntry { header_pos: pos, local_file_pos });
                pos = next;
            }
            END_OF_CENTRAL_DIRECTORY_SIGNATURE => {
                let first_directory_pos = u64::from(records.u32_at(pos + EOCD_DIRECTORY_OFFSET)?);
                tracing::trace!(pos, first_directory_pos, "end of central directory");
                break EndOfCentralDirectory { pos, first_directory_pos };
            }
            signature => {
                return Err(Error::MalformedContainer { offset: pos, signature });
            }
        }
    };

    tracing::debug!(
        local_files = local_files.len(),
        directory = directory.len(),
        eocd = eocd.pos,
        "scanned container"
    );

    Ok(ContainerIndex { local_files, directory, eocd })
}
