//! # zwf
//!
//! Tools for the WAD asset containers used by Zwift.
//!
//! This library validates a container, rebuilds its entry index and lets callers list
//! entries or extract them into an empty directory. Payloads are only read when an
//! entry is extracted, so listing a large container touches little more than its
//! index and record headers.
//!
//! ## Features
//!
//! - Magic and declared-size validation, with a warning for trailing bytes
//! - Entry index reconstruction, including the container's pointer bias
//! - Short and long listings, optionally with human-readable sizes
//! - Extraction with glob selection and path-traversal protection
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use zwf::{ListOptions, LocalFileReader, WadExtractor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader = Arc::new(LocalFileReader::new(Path::new("assets.wad"))?);
//!     let wad = WadExtractor::open(reader).await?;
//!
//!     for line in wad.list(ListOptions::default()).await? {
//!         println!("{line}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod pattern;
pub mod wad;

pub use cli::Cli;
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use pattern::GlobPattern;
pub use wad::{
    EntryHeader, EntryPredicate, ExtractOptions, ExtractStats, ListOptions, WadEntry,
    WadError, WadExtractor, WadParser, select_all,
};
