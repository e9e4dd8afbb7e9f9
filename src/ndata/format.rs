//! ZIP record constants for the `.ndata` container.
//!
//! Offsets are relative to the start of the record's signature. All
//! multi-byte fields are little-endian.

/// Local file header signature ("PK\x03\x04").
pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;

/// Central directory file header signature ("PK\x01\x02").
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x02014b50;

/// End of central directory signature ("PK\x05\x06").
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x06054b50;

// Local file header layout

/// CRC-32 of the uncompressed payload.
pub const LOCAL_CRC32_OFFSET: u64 = 14;
/// Compressed size. Equal to the stored size since entries are not deflated.
pub const LOCAL_COMPRESSED_SIZE_OFFSET: u64 = 18;
/// File name length.
pub const LOCAL_NAME_LEN_OFFSET: u64 = 26;
/// Extra field length.
pub const LOCAL_EXTRA_LEN_OFFSET: u64 = 28;
/// Start of the file name.
pub const LOCAL_HEADER_SIZE: u64 = 30;

// Central directory header layout

/// File name length.
pub const CENTRAL_NAME_LEN_OFFSET: u64 = 28;
/// Extra field length.
pub const CENTRAL_EXTRA_LEN_OFFSET: u64 = 30;
/// File comment length.
pub const CENTRAL_COMMENT_LEN_OFFSET: u64 = 32;
/// Offset of the matching local file header.
pub const CENTRAL_LOCAL_HEADER_OFFSET: u64 = 42;
/// Start of the file name.
pub const CENTRAL_HEADER_SIZE: u64 = 46;

// End of central directory layout

/// Offset of the first central directory header.
pub const EOCD_DIRECTORY_OFFSET: u64 = 16;
/// Fixed part of the record, without the trailing comment.
pub const EOCD_SIZE: u64 = 22;

/// Entry holding the `.npy` array payload.
pub const DATA_ENTRY: &[u8] = b"data.npy";

/// Entry holding the UTF-8 JSON properties.
pub const METADATA_ENTRY: &[u8] = b"metadata.json";
