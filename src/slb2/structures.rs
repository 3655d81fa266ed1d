use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::error::{Result, Slb2Error};

/// Container signature, `0x32424C53` when read as a little-endian u32.
pub const SLB2_MAGIC: &[u8; 4] = b"SLB2";

/// Size of the header region that holds the fixed header and the entry table.
/// Entry data starts right after it.
pub const HEADER_CAPACITY: u64 = 0x200;

/// Alignment unit of the data region.
pub const BLOCK_SIZE: u64 = 512;

/// Bounded copy buffer used while streaming entry data.
pub const READ_BUFFER_SIZE: usize = 512;

/// Length of the null-padded name buffer in an entry record.
pub const FILE_NAME_LEN: usize = 32;

/// Round `file_size` up to the next block boundary.
///
/// This is the distance between the start of one entry's data and the
/// start of the next, since every entry is padded to whole blocks.
pub fn aligned_size(file_size: u32) -> u64 {
    (file_size as u64 + BLOCK_SIZE - 1) & !(BLOCK_SIZE - 1)
}

/// Main SLB2 header - 32 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub flags: u32,
    pub entry_count: u32,
    /// Number of 512-byte blocks spanned by the whole container
    pub total_blocks: u32,
    pub reserved: [u32; 3],
}

impl ContainerHeader {
    pub const SIZE: usize = 32;

    /// Decode the fixed header and check its signature.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Slb2Error::TruncatedInput {
                what: "container header",
                needed: Self::SIZE as u64,
                available: data.len() as u64,
            });
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&data[0..4]);
        if &magic != SLB2_MAGIC {
            return Err(Slb2Error::InvalidMagic { found: magic });
        }

        // the header always sits at offset 0
        Self::read_fields(magic, &mut Cursor::new(&data[4..Self::SIZE]))
            .map_err(|source| Slb2Error::Read { offset: 0, source })
    }

    fn read_fields(magic: [u8; 4], cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Self {
            magic,
            version: cursor.read_u32::<LittleEndian>()?,
            flags: cursor.read_u32::<LittleEndian>()?,
            entry_count: cursor.read_u32::<LittleEndian>()?,
            total_blocks: cursor.read_u32::<LittleEndian>()?,
            reserved: [
                cursor.read_u32::<LittleEndian>()?,
                cursor.read_u32::<LittleEndian>()?,
                cursor.read_u32::<LittleEndian>()?,
            ],
        })
    }

    /// Bytes needed by the header plus its entry table.
    pub fn table_end(&self) -> u64 {
        Self::SIZE as u64 + self.entry_count as u64 * EntryDescriptor::SIZE as u64
    }

    /// Magic as the little-endian integer the format documents.
    pub fn magic_value(&self) -> u32 {
        u32::from_le_bytes(self.magic)
    }
}

/// Entry table record - 48 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Start of the entry's data in blocks; block 1 is the first block after the header
    pub block_offset: u32,
    pub file_size: u32,
    pub reserved: [u32; 2],
    /// Raw name buffer as stored on disk
    pub raw_name: [u8; FILE_NAME_LEN],
    /// Name decoded up to the first NUL
    pub file_name: String,
}

impl EntryDescriptor {
    pub const SIZE: usize = 48;

    /// Decode one entry record. `offset` is the record's position in the
    /// container and is only used for error context.
    pub fn from_bytes(data: &[u8], offset: u64) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Slb2Error::TruncatedInput {
                what: "entry record",
                needed: Self::SIZE as u64,
                available: data.len() as u64,
            });
        }

        Self::read_fields(&mut Cursor::new(&data[..Self::SIZE]))
            .map_err(|source| Slb2Error::Read { offset, source })
    }

    fn read_fields(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        let block_offset = cursor.read_u32::<LittleEndian>()?;
        let file_size = cursor.read_u32::<LittleEndian>()?;
        let reserved = [
            cursor.read_u32::<LittleEndian>()?,
            cursor.read_u32::<LittleEndian>()?,
        ];
        let mut raw_name = [0u8; FILE_NAME_LEN];
        cursor.read_exact(&mut raw_name)?;

        Ok(Self {
            block_offset,
            file_size,
            reserved,
            raw_name,
            file_name: decode_name(&raw_name),
        })
    }

    /// Byte offset the `block_offset` field points at.
    pub fn declared_offset(&self) -> u64 {
        self.block_offset as u64 * BLOCK_SIZE
    }

    /// Space the entry occupies in the data region, padding included.
    pub fn aligned_size(&self) -> u64 {
        aligned_size(self.file_size)
    }
}

/// Decode a null-terminated name buffer.
///
/// A buffer with no terminator is taken whole. Non-UTF-8 bytes are replaced
/// rather than rejected.
fn decode_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
