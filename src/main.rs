//! Main entry point for the slb2unpack CLI application.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use slb2unpack::slb2::{layout, layout_warnings};
use slb2unpack::{Cli, LocalFileReader, ReadAt, Slb2Container, Slb2Extractor};

/// Application entry point.
///
/// Parses command-line arguments, then either lists the container's entry
/// table (`-l`) or extracts every entry into the output directory.
///
/// # Returns
///
/// Returns `Ok(())` on success or when no input was given (usage is
/// printed), or the first parse or I/O error encountered.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_target(false)
        .format_timestamp(None)
        .init();

    // No input is a usage request, not a failure
    let Some(file) = cli.file.as_deref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let reader = Arc::new(LocalFileReader::new(Path::new(file))?);
    let extractor = Slb2Extractor::new(reader);

    let container = extractor
        .read_container()
        .await
        .with_context(|| format!("{file}: not a usable SLB2 container"))?;

    if cli.list {
        list_entries(&extractor, &container);
        return Ok(());
    }

    print_header(&container);

    let output_dir = match cli.extract_dir.as_deref() {
        Some(dir) => {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("cannot create output directory {dir}"))?;
            PathBuf::from(dir)
        }
        None => PathBuf::from("."),
    };

    let extracted = extractor
        .extract_all(&container, &output_dir, cli.offsets)
        .await?;

    info!("Finished! {} file(s) extracted", extracted.len());
    Ok(())
}

/// Log the container header summary before extraction starts.
///
/// Reports magic, version, number of packed files and total block count.
///
/// # Arguments
///
/// * `container` - The parsed container whose header is reported
fn print_header(container: &Slb2Container) {
    let header = &container.header;
    info!("SLB2 pack header:");
    info!("- SLB2 magic: {:#X}", header.magic_value());
    info!("- SLB2 version: {}", header.version);
    info!("- Files in this pack: {}", header.entry_count);
    info!("- Total number of blocks: {}", header.total_blocks);
}

/// List the entries of an SLB2 container.
///
/// Prints one row per entry with its declared block offset, the byte offset
/// its data is actually packed at, its size and its name, followed by a
/// total line. Layout inconsistencies (offset mismatches, a wrong block
/// count, a container shorter than its table claims) are logged as warnings
/// after the table.
///
/// # Arguments
///
/// * `extractor` - The extractor the container was read from, used for the source size
/// * `container` - The parsed header and entry table
fn list_entries<R: ReadAt>(extractor: &Slb2Extractor<R>, container: &Slb2Container) {
    let header = &container.header;
    println!(
        "SLB2 version {}, {} entries, {} blocks",
        header.version, header.entry_count, header.total_blocks
    );
    println!(
        "{:>3}  {:>10}  {:>10}  {:>10}  Name",
        "#", "Block", "Offset", "Size"
    );
    println!("{}", "-".repeat(50));

    let placements = layout(&container.entries);
    let mut total = 0u64;
    for (entry, placement) in container.entries.iter().zip(&placements) {
        println!(
            "{:>3}  {:>10}  {:>#10X}  {:>10}  {}",
            placement.index,
            entry.block_offset,
            placement.cumulative_offset,
            entry.file_size,
            entry.file_name
        );
        total += entry.file_size as u64;
    }

    println!("{}", "-".repeat(50));
    println!("{:>3}  {:>10}  {:>10}  {:>10}  {} files", "", "", "", total, placements.len());

    for warning in layout_warnings(container, &placements, extractor.source_size()) {
        warn!("{warning}");
    }
}
