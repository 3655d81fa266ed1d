//! Synthetic SLB2 images for tests.

use byteorder::{LittleEndian, WriteBytesExt};

use super::structures::*;

pub fn encode_header(header: &ContainerHeader) -> Vec<u8> {
    let mut out = Vec::with_capacity(ContainerHeader::SIZE);
    out.extend_from_slice(&header.magic);
    out.write_u32::<LittleEndian>(header.version).unwrap();
    out.write_u32::<LittleEndian>(header.flags).unwrap();
    out.write_u32::<LittleEndian>(header.entry_count).unwrap();
    out.write_u32::<LittleEndian>(header.total_blocks).unwrap();
    for r in header.reserved {
        out.write_u32::<LittleEndian>(r).unwrap();
    }
    out
}

pub fn encode_entry(block_offset: u32, file_size: u32, reserved: [u32; 2], name: &[u8]) -> Vec<u8> {
    assert!(name.len() <= FILE_NAME_LEN);
    let mut out = Vec::with_capacity(EntryDescriptor::SIZE);
    out.write_u32::<LittleEndian>(block_offset).unwrap();
    out.write_u32::<LittleEndian>(file_size).unwrap();
    out.write_u32::<LittleEndian>(reserved[0]).unwrap();
    out.write_u32::<LittleEndian>(reserved[1]).unwrap();
    out.extend_from_slice(name);
    out.resize(EntryDescriptor::SIZE, 0);
    out
}

/// One entry to pack: its name, payload and an optional forced `block_offset`.
pub struct FixtureEntry {
    pub name: Vec<u8>,
    pub data: Vec<u8>,
    pub block_offset: Option<u32>,
}

impl FixtureEntry {
    pub fn new(name: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            data,
            block_offset: None,
        }
    }

    pub fn with_block_offset(mut self, block_offset: u32) -> Self {
        self.block_offset = Some(block_offset);
        self
    }
}

/// Pack entries the way real containers are laid out: 512-byte header
/// region, then each payload padded to whole blocks.
pub fn build_container(entries: &[FixtureEntry]) -> Vec<u8> {
    let mut table = Vec::new();
    let mut data = Vec::new();
    let mut block = 1u32;

    for e in entries {
        let size = e.data.len() as u32;
        table.extend(encode_entry(e.block_offset.unwrap_or(block), size, [0, 0], &e.name));
        data.extend_from_slice(&e.data);
        data.resize(aligned_size(size) as usize + data.len() - e.data.len(), 0);
        block += (aligned_size(size) / BLOCK_SIZE) as u32;
    }

    let header = ContainerHeader {
        magic: *SLB2_MAGIC,
        version: 1,
        flags: 0,
        entry_count: entries.len() as u32,
        total_blocks: block,
        reserved: [0; 3],
    };

    let mut out = encode_header(&header);
    out.extend(table);
    out.resize(HEADER_CAPACITY as usize, 0);
    out.extend(data);
    out
}
