//! SLB2 container parsing and extraction.
//!
//! An SLB2 container is what firmware update packages are shipped in. It is
//! a flat pack of files with no compression or checksums:
//!
//! 1. A 512-byte header region: the 32-byte header (`SLB2` magic, version,
//!    flags, entry count, total block count) followed by up to ten 48-byte
//!    entry records (block offset, size, 32-byte NUL-padded name)
//! 2. The data region: each entry's bytes in table order, padded to a
//!    multiple of 512
//!
//! All integers are little-endian.
//!
//! - [`structures`]: format constants and record decoding
//! - [`parser`]: header region validation
//! - [`extractor`]: data layout and extraction

mod extractor;
#[cfg(test)]
mod fixture;
mod parser;
mod structures;

pub use extractor::{
    EntryPlacement, ExtractedEntry, LayoutWarning, OffsetMode, Slb2Extractor, check_output_name,
    check_output_names,
    layout, layout_end, layout_warnings,
};
pub use parser::{Slb2Container, Slb2Parser};
pub use structures::*;
