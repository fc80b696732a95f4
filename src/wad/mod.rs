//! WAD container parsing and extraction.
//!
//! This module reads the asset containers shipped with Zwift (magic `ZWF!`),
//! which hold a flat list of files with relative paths and no compression.
//!
//! ## Architecture
//!
//! - [`structures`]: Layout constants and decoded records (header, index slots, entries)
//! - [`parser`]: Envelope validation, index reconstruction and record decoding
//! - [`extractor`]: Listing and extraction to a directory
//! - [`error`]: The error type shared by all of the above
//!
//! ## WAD Format Overview
//!
//! All integers are little-endian.
//!
//! | Offset   | Size   | Field                                                 |
//! |----------|--------|-------------------------------------------------------|
//! | 0        | 4      | magic `ZWF!`                                          |
//! | 248      | 4      | body size (file size minus 256)                       |
//! | 256      | 8192   | index: 1024 x (u32 pointer, u8 in-use, 3 padding)     |
//! | variable | 192    | record: NUL-terminated path at 4..100, u32 size at 104 |
//! | +192     | `size` | payload                                               |
//!
//! Index pointers carry a constant bias that is not stored anywhere; see
//! [`parser::resolve_offsets`].
//!
//! ## Limitations
//!
//! - Read-only: containers cannot be created or modified
//! - Header bytes outside the fields above are not interpreted

mod error;
mod extractor;
#[cfg(test)]
mod fixture;
mod parser;
mod structures;

pub use error::{Result, WadError};
pub use extractor::{
    EntryPredicate, ExtractOptions, ExtractStats, ListOptions, WadExtractor, select_all,
};
pub use parser::{TrailingData, WadParser, resolve_offsets};
pub use structures::*;
