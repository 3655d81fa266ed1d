//! SLB2 header parser.
//!
//! The whole header region (512 bytes) is fetched in a single read and then
//! decoded field by field: the fixed 32-byte header first, then
//! `entry_count` 48-byte records packed right behind it.

use std::sync::Arc;

use log::debug;

use crate::error::{Result, Slb2Error};
use crate::io::ReadAt;

use super::structures::*;

/// A validated container header and its entry table, in on-disk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slb2Container {
    pub header: ContainerHeader,
    pub entries: Vec<EntryDescriptor>,
}

/// Low-level SLB2 parser over any [`ReadAt`] source.
pub struct Slb2Parser<R: ReadAt> {
    reader: Arc<R>,
    /// Total size of the container in bytes
    size: u64,
}

impl<R: ReadAt> Slb2Parser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Read and validate the header region.
    ///
    /// # Errors
    ///
    /// - [`Slb2Error::TruncatedInput`] if the source is shorter than the header region
    /// - [`Slb2Error::InvalidMagic`] if the signature is not `SLB2`
    /// - [`Slb2Error::HeaderOverflow`] if the entry table would not fit in the
    ///   header region; no entry record is decoded in that case
    pub async fn read_container(&self) -> Result<Slb2Container> {
        let mut region = vec![0u8; HEADER_CAPACITY as usize];
        let n = self
            .reader
            .read_full_at(0, &mut region)
            .await
            .map_err(|source| Slb2Error::Read { offset: 0, source })?;
        if n < region.len() {
            return Err(Slb2Error::TruncatedInput {
                what: "header region",
                needed: HEADER_CAPACITY,
                available: n as u64,
            });
        }

        let header = ContainerHeader::from_bytes(&region)?;
        debug!(
            "SLB2 header: version {}, flags {:#X}, {} entries, {} blocks",
            header.version, header.flags, header.entry_count, header.total_blocks
        );

        let required = header.table_end();
        if required > HEADER_CAPACITY {
            return Err(Slb2Error::HeaderOverflow {
                entry_count: header.entry_count,
                required,
                capacity: HEADER_CAPACITY,
            });
        }

        let entries = region[ContainerHeader::SIZE..required as usize]
            .chunks_exact(EntryDescriptor::SIZE)
            .enumerate()
            .map(|(i, record)| {
                let offset = (ContainerHeader::SIZE + i * EntryDescriptor::SIZE) as u64;
                EntryDescriptor::from_bytes(record, offset)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Slb2Container { header, entries })
    }

    /// Total size of the underlying source.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}
