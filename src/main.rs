//! Korob CLI - inspect and round-trip chunked container files.
//!
//! This is the main entry point for the Korob command-line application.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use korob::prelude::*;

/// Korob - chunked container file inspection tool
#[derive(Parser)]
#[command(name = "korob")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chunk tree of a RIFF file
    Tree {
        /// Path to the RIFF file
        input: PathBuf,
    },

    /// List size-prefixed chunks with a configurable header layout
    Scan {
        /// Path to the input file
        input: PathBuf,

        /// Tag width in bytes
        #[arg(long, default_value_t = 4)]
        tag_width: usize,

        /// Decode the tag as an unsigned integer instead of raw bytes
        #[arg(long)]
        numeric: bool,

        /// Read numeric tags big-endian
        #[arg(long)]
        tag_big_endian: bool,

        /// Length field width in bytes
        #[arg(long, default_value_t = 4)]
        length_width: usize,

        /// Read the length field big-endian
        #[arg(long)]
        length_big_endian: bool,

        /// Skip this many bytes before scanning
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },

    /// Parse a RIFF file and re-serialize it, verifying the round trip
    Repack {
        /// Path to the input RIFF file
        input: PathBuf,

        /// Path to write the re-serialized file
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tree { input } => cmd_tree(&input),
        Commands::Scan {
            input,
            tag_width,
            numeric,
            tag_big_endian,
            length_width,
            length_big_endian,
            skip,
        } => {
            if !(1..=8).contains(&tag_width) || !(1..=8).contains(&length_width) {
                bail!("tag and length widths must be between 1 and 8 bytes");
            }
            let tag = if numeric {
                TagEncoding::Numeric {
                    width: tag_width,
                    endian: endian_of(tag_big_endian),
                }
            } else {
                TagEncoding::Raw { width: tag_width }
            };
            let fmt = TagFormat {
                tag,
                length_width,
                length_endian: endian_of(length_big_endian),
            };
            cmd_scan(&input, fmt, skip)
        }
        Commands::Repack { input, output } => cmd_repack(&input, &output),
    }
}

fn endian_of(big: bool) -> Endian {
    if big {
        Endian::Big
    } else {
        Endian::Little
    }
}

fn cmd_tree(input: &PathBuf) -> Result<()> {
    let buffer = SourceBuffer::from_path(input)
        .with_context(|| format!("failed to open {}", input.display()))?;

    if !RiffChunk::detect(&buffer) {
        bail!("{} is not a RIFF file", input.display());
    }

    let root = RiffChunk::parse(&buffer)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    print_chunk(&root, 0);
    Ok(())
}

fn print_chunk(chunk: &RiffChunk, depth: usize) {
    let indent = "  ".repeat(depth);
    let tag = String::from_utf8_lossy(&chunk.tag()).into_owned();
    if chunk.is_container() {
        println!("{indent}{tag} ({} children)", chunk.children().len());
        for child in chunk.children() {
            print_chunk(child, depth + 1);
        }
    } else {
        let size = chunk.payload().map_or(0, <[u8]>::len);
        println!("{indent}{tag} ({size} bytes)");
    }
}

fn cmd_scan(input: &PathBuf, fmt: TagFormat, skip: usize) -> Result<()> {
    let buffer = SourceBuffer::from_path(input)
        .with_context(|| format!("failed to open {}", input.display()))?;

    let mut cursor = BinaryCursor::new(&buffer);
    cursor.advance(skip);

    let mut count = 0usize;
    for chunk in read_chunks(&mut cursor, fmt) {
        println!("{:>10}  {:>10}  {}", chunk.start, chunk.size, chunk.tag);
        count += 1;
    }
    let stopped_at = cursor.position();
    println!(
        "{count} chunks, scan stopped at offset {stopped_at} of {}",
        buffer.len()
    );
    Ok(())
}

fn cmd_repack(input: &PathBuf, output: &PathBuf) -> Result<()> {
    let buffer = SourceBuffer::from_path(input)
        .with_context(|| format!("failed to open {}", input.display()))?;

    let root = RiffChunk::parse(&buffer)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let bytes = root.to_bytes();

    fs::write(output, &bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if bytes == &buffer[..] {
        println!("round trip OK: {} bytes identical", bytes.len());
    } else {
        println!(
            "round trip differs: read {} bytes, wrote {} bytes",
            buffer.len(),
            bytes.len()
        );
    }
    Ok(())
}
