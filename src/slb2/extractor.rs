use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{Result, Slb2Error};
use crate::io::ReadAt;

use super::parser::{Slb2Container, Slb2Parser};
use super::structures::*;

/// Which offset decides where an entry's data starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OffsetMode {
    /// Header capacity plus the aligned sizes of all preceding entries
    #[default]
    Cumulative,
    /// The entry's own `block_offset` field, in 512-byte blocks
    Declared,
}

/// Where one entry lives in the data region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPlacement {
    pub index: usize,
    pub cumulative_offset: u64,
    pub declared_offset: u64,
    pub aligned_size: u64,
}

impl EntryPlacement {
    pub fn offset(&self, mode: OffsetMode) -> u64 {
        match mode {
            OffsetMode::Cumulative => self.cumulative_offset,
            OffsetMode::Declared => self.declared_offset,
        }
    }

    pub fn offsets_agree(&self) -> bool {
        self.cumulative_offset == self.declared_offset
    }
}

/// Compute every entry's position up front.
///
/// `offset(i) = HEADER_CAPACITY + sum(aligned(file_size_j) for j < i)`, so
/// any entry can be extracted on its own without a running cursor.
pub fn layout(entries: &[EntryDescriptor]) -> Vec<EntryPlacement> {
    let mut offset = HEADER_CAPACITY;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let placement = EntryPlacement {
                index,
                cumulative_offset: offset,
                declared_offset: entry.declared_offset(),
                aligned_size: entry.aligned_size(),
            };
            offset += placement.aligned_size;
            placement
        })
        .collect()
}

/// End of the last entry's padded data, i.e. the container size the entry
/// table implies.
pub fn layout_end(entries: &[EntryDescriptor]) -> u64 {
    HEADER_CAPACITY + entries.iter().map(EntryDescriptor::aligned_size).sum::<u64>()
}

/// Non-fatal inconsistencies between the header, the entry table and the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutWarning {
    OffsetMismatch {
        index: usize,
        name: String,
        declared: u64,
        computed: u64,
    },
    TotalBlocksMismatch {
        declared: u32,
        computed: u64,
    },
    SourceTooShort {
        expected: u64,
        size: u64,
    },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::OffsetMismatch {
                index,
                name,
                declared,
                computed,
            } => write!(
                f,
                "entry {index} ({name}): block_offset points at {declared:#X}, packed data starts at {computed:#X}"
            ),
            LayoutWarning::TotalBlocksMismatch { declared, computed } => write!(
                f,
                "header declares {declared} blocks, entry table spans {computed}"
            ),
            LayoutWarning::SourceTooShort { expected, size } => write!(
                f,
                "container is {size} bytes, entry table expects at least {expected}"
            ),
        }
    }
}

/// Cross-check `block_offset`, `total_blocks` and the source size against
/// the computed layout.
pub fn layout_warnings(
    container: &Slb2Container,
    placements: &[EntryPlacement],
    source_size: u64,
) -> Vec<LayoutWarning> {
    let mut warnings: Vec<_> = placements
        .iter()
        .filter(|p| !p.offsets_agree())
        .map(|p| LayoutWarning::OffsetMismatch {
            index: p.index,
            name: container.entries[p.index].file_name.clone(),
            declared: p.declared_offset,
            computed: p.cumulative_offset,
        })
        .collect();

    let end = layout_end(&container.entries);
    let computed_blocks = end / BLOCK_SIZE;
    if container.header.total_blocks as u64 != computed_blocks {
        warnings.push(LayoutWarning::TotalBlocksMismatch {
            declared: container.header.total_blocks,
            computed: computed_blocks,
        });
    }

    // the last entry's padding may legitimately be cut off
    let data_end = placements
        .last()
        .map(|p| p.cumulative_offset + container.entries[p.index].file_size as u64)
        .unwrap_or(HEADER_CAPACITY);
    if source_size < data_end {
        warnings.push(LayoutWarning::SourceTooShort {
            expected: data_end,
            size: source_size,
        });
    }

    warnings
}

/// Entry names become file names, so only a flat basename is accepted.
pub fn check_output_name(index: usize, name: &str) -> Result<()> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', ':'])
        || Path::new(name).is_absolute();

    if unsafe_name {
        return Err(Slb2Error::UnsafeName {
            index,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Validate every entry name before anything is written.
///
/// Names must pass [`check_output_name`] and be unique. Uniqueness is
/// compared ASCII case-insensitively: names differing only in case land on
/// the same file on case-insensitive filesystems.
pub fn check_output_names(entries: &[EntryDescriptor]) -> Result<()> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        check_output_name(index, &entry.file_name)?;
        if let Some(&first) = seen.get(&entry.file_name.to_ascii_lowercase()) {
            return Err(Slb2Error::DuplicateName {
                index,
                name: entry.file_name.clone(),
                first,
            });
        }
        seen.insert(entry.file_name.to_ascii_lowercase(), index);
    }
    Ok(())
}

/// An entry written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    pub index: usize,
    pub path: PathBuf,
    pub size: u64,
}

/// SLB2 entry extractor
pub struct Slb2Extractor<R: ReadAt> {
    parser: Slb2Parser<R>,
}

impl<R: ReadAt> Slb2Extractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: Slb2Parser::new(reader),
        }
    }

    /// Size of the container being read.
    pub fn source_size(&self) -> u64 {
        self.parser.size()
    }

    /// Parse the header region and entry table
    pub async fn read_container(&self) -> Result<Slb2Container> {
        self.parser.read_container().await
    }

    /// Extract every entry into `output_dir`, in table order.
    ///
    /// Entry names are validated up front, so an unsafe or duplicated name
    /// fails before any file is created. After that the first failure aborts
    /// the run; entries already written stay on disk.
    pub async fn extract_all(
        &self,
        container: &Slb2Container,
        output_dir: &Path,
        mode: OffsetMode,
    ) -> Result<Vec<ExtractedEntry>> {
        let placements = layout(&container.entries);
        for warning in layout_warnings(container, &placements, self.source_size()) {
            warn!("{warning}");
        }

        check_output_names(&container.entries)?;

        let mut extracted = Vec::with_capacity(container.entries.len());
        for (entry, placement) in container.entries.iter().zip(&placements) {
            let index = placement.index;
            let offset = placement.offset(mode);
            info!(
                "Dumping SLB2 file entry {index}: block offset {:#X}, size {}, name {}, SLB2 offset {offset:#X}",
                entry.block_offset, entry.file_size, entry.file_name
            );

            let path = output_dir.join(&entry.file_name);
            let size = self.extract_to_file(index, entry, offset, &path).await?;
            extracted.push(ExtractedEntry { index, path, size });
        }

        Ok(extracted)
    }

    /// Copy one entry's data, starting at `offset`, into a new file at `output_path`.
    ///
    /// An existing file is truncated. On a short read the bytes that were
    /// available are left in the file and [`Slb2Error::ShortRead`] is returned.
    pub async fn extract_to_file(
        &self,
        index: usize,
        entry: &EntryDescriptor,
        offset: u64,
        output_path: &Path,
    ) -> Result<u64> {
        self.check_offset(index, entry, offset)?;

        let mut file =
            fs::File::create(output_path)
                .await
                .map_err(|source| Slb2Error::OutputOpen {
                    index,
                    name: entry.file_name.clone(),
                    path: output_path.to_path_buf(),
                    source,
                })?;

        self.copy_and_flush(index, entry, offset, &mut file, output_path)
            .await
    }

    /// Copy the entry into `out`, then flush it.
    ///
    /// A copy failure wins over a flush failure; the flush is still attempted
    /// so the bytes read so far reach the destination.
    async fn copy_and_flush<W: AsyncWrite + Unpin>(
        &self,
        index: usize,
        entry: &EntryDescriptor,
        offset: u64,
        out: &mut W,
        output_path: &Path,
    ) -> Result<u64> {
        let copied = match self.copy_entry(index, entry, offset, out, output_path).await {
            Ok(copied) => copied,
            Err(err) => {
                let _ = out.flush().await;
                return Err(err);
            }
        };

        out.flush().await.map_err(|source| Slb2Error::OutputWrite {
            index,
            name: entry.file_name.clone(),
            path: output_path.to_path_buf(),
            source,
        })?;

        Ok(copied)
    }

    /// Entry data can never start inside the header region.
    fn check_offset(&self, index: usize, entry: &EntryDescriptor, offset: u64) -> Result<()> {
        if offset < HEADER_CAPACITY {
            return Err(Slb2Error::EntrySeek {
                index,
                name: entry.file_name.clone(),
                offset,
                size: self.parser.size(),
            });
        }
        Ok(())
    }

    /// Stream `file_size` bytes through a bounded buffer.
    async fn copy_entry<W: AsyncWrite + Unpin>(
        &self,
        index: usize,
        entry: &EntryDescriptor,
        offset: u64,
        out: &mut W,
        output_path: &Path,
    ) -> Result<u64> {
        let reader = self.parser.reader();
        let total = entry.file_size as u64;
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let mut copied = 0u64;

        while copied < total {
            let want = (total - copied).min(READ_BUFFER_SIZE as u64) as usize;
            let pos = offset + copied;
            let n = reader
                .read_at(pos, &mut buf[..want])
                .await
                .map_err(|source| Slb2Error::Read { offset: pos, source })?;
            if n == 0 {
                return Err(Slb2Error::ShortRead {
                    index,
                    name: entry.file_name.clone(),
                    expected: total,
                    read: copied,
                });
            }

            out.write_all(&buf[..n])
                .await
                .map_err(|source| Slb2Error::OutputWrite {
                    index,
                    name: entry.file_name.clone(),
                    path: output_path.to_path_buf(),
                    source,
                })?;
            copied += n as u64;
        }

        Ok(copied)
    }
}
