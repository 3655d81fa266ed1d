//! # slb2unpack
//!
//! Extracts the files packed inside SLB2 containers, the format firmware
//! update packages are distributed in.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use slb2unpack::{LocalFileReader, OffsetMode, Slb2Extractor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader = Arc::new(LocalFileReader::new(Path::new("PS4UPDATE.PUP"))?);
//!     let extractor = Slb2Extractor::new(reader);
//!
//!     let container = extractor.read_container().await?;
//!     for entry in &container.entries {
//!         println!("{} ({} bytes)", entry.file_name, entry.file_size);
//!     }
//!
//!     extractor
//!         .extract_all(&container, Path::new("."), OffsetMode::Cumulative)
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod slb2;

pub use cli::Cli;
pub use error::{Result, Slb2Error};
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use slb2::{ContainerHeader, EntryDescriptor, OffsetMode, Slb2Container, Slb2Extractor};
