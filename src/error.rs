use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing or extracting an SLB2 container.
///
/// Entry-scoped variants carry the entry index and decoded name so a failure
/// can be traced back to a specific record in the entry table.
#[derive(Error, Debug)]
pub enum Slb2Error {
    #[error("cannot open input {path}: {source}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("truncated input: {what} needs {needed} bytes, only {available} available")]
    TruncatedInput {
        what: &'static str,
        needed: u64,
        available: u64,
    },

    #[error("invalid SLB2 magic {found:02X?} (expected \"SLB2\")")]
    InvalidMagic { found: [u8; 4] },

    #[error(
        "entry table overflows header: {entry_count} entries need {required} bytes, capacity is {capacity}"
    )]
    HeaderOverflow {
        entry_count: u32,
        required: u64,
        capacity: u64,
    },

    #[error(
        "entry {index} ({name}): cannot seek to data offset {offset:#X}, it lies inside the header region ({size} byte container)"
    )]
    EntrySeek {
        index: usize,
        name: String,
        offset: u64,
        size: u64,
    },

    #[error("entry {index} ({name}): unsafe output name")]
    UnsafeName { index: usize, name: String },

    #[error("entry {index} ({name}): output name already used by entry {first}")]
    DuplicateName {
        index: usize,
        name: String,
        first: usize,
    },

    #[error("entry {index} ({name}): cannot create {path}: {source}")]
    OutputOpen {
        index: usize,
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("entry {index} ({name}): short read, expected {expected} bytes, got {read}")]
    ShortRead {
        index: usize,
        name: String,
        expected: u64,
        read: u64,
    },

    #[error("entry {index} ({name}): write to {path} failed: {source}")]
    OutputWrite {
        index: usize,
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read error at offset {offset:#X}: {source}")]
    Read {
        offset: u64,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Slb2Error>;
