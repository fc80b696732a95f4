//! Low-level WAD container parser.
//!
//! This module handles the binary parsing of WAD structures,
//! reading from any source that implements the [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! WAD files are read front to back:
//! 1. Validate the 256-byte header (magic and declared size)
//! 2. Read the 8 KiB entry index that follows it and turn the live slots into
//!    absolute record offsets
//! 3. For listing or extraction, read each 192-byte record header and, when
//!    wanted, the payload right after it
//!
//! The index pointers are not file offsets. They share a constant bias which is
//! recovered from the smallest live pointer: that record is assumed to start right
//! after the index block.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::io::ReadAt;

use super::error::{Result, WadError};
use super::structures::*;

/// The file holds more bytes than its header accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingData {
    /// Size the header declares
    pub declared: u64,
    /// Size of the byte source
    pub actual: u64,
}

/// Low-level WAD container parser.
///
/// Opening a parser validates the envelope and reconstructs the entry index;
/// records are decoded on demand and never cached.
///
/// ## Usage
///
/// Typically used through [`WadExtractor`](super::WadExtractor)
/// rather than directly.
///
/// ## Example
///
/// ```ignore
/// let parser = WadParser::open(reader).await?;
/// for &offset in parser.entry_offsets() {
///     let entry = parser.read_entry(offset, false).await?;
///     println!("{}", entry.path());
/// }
/// ```
pub struct WadParser<R: ReadAt> {
    /// The underlying data source
    reader: Arc<R>,
    /// Total size of the byte source
    size: u64,
    header: WadHeader,
    bias: i64,
    /// Absolute record offsets, in slot order
    offsets: Vec<u64>,
    trailing: Option<TrailingData>,
}

impl<R: ReadAt> WadParser<R> {
    /// Validate the container and reconstruct its entry index.
    ///
    /// # Errors
    ///
    /// - [`WadError::Format`] if the magic does not match
    /// - [`WadError::TruncatedFile`] if the header declares more bytes than exist
    /// - [`WadError::CorruptIndex`] if the index has no live slot or the bias
    ///   cannot be derived
    pub async fn open(reader: Arc<R>) -> Result<Self> {
        let size = reader.size();

        let header = read_header(reader.as_ref(), size).await?;
        let trailing = check_size(&header, size)?;

        let mut index = vec![0u8; EntryIndex::SIZE];
        read_fully(reader.as_ref(), EntryIndex::OFFSET, &mut index)
            .await
            .map_err(|err| match err {
                WadError::Read { source, .. }
                    if source.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    WadError::CorruptIndex {
                        reason: format!(
                            "index block needs {} bytes but the file is {} bytes",
                            EntryIndex::END,
                            size
                        ),
                    }
                }
                other => other,
            })?;

        let slots = EntryIndex::parse_slots(&index)?;
        let (bias, offsets) = resolve_offsets(&slots)?;
        debug!(bias, entries = offsets.len(), "reconstructed entry index");

        Ok(Self {
            reader,
            size,
            header,
            bias,
            offsets,
            trailing,
        })
    }

    /// Absolute offsets of every live entry, in index slot order.
    pub fn entry_offsets(&self) -> &[u64] {
        &self.offsets
    }

    pub fn header(&self) -> &WadHeader {
        &self.header
    }

    /// Value subtracted from every raw index pointer.
    pub fn bias(&self) -> i64 {
        self.bias
    }

    /// Set when the byte source is larger than the header declares.
    pub fn trailing_data(&self) -> Option<TrailingData> {
        self.trailing
    }

    /// Decode the record at `offset`, reading the payload when `include_body` is set.
    pub async fn read_entry(&self, offset: u64, include_body: bool) -> Result<WadEntry> {
        self.read_entry_with(offset, |_| include_body).await
    }

    /// Decode the record at `offset`, reading the payload only if `include_body`
    /// accepts the record's metadata.
    ///
    /// # Errors
    ///
    /// - [`WadError::UnknownOffset`] if `offset` is not one of [`Self::entry_offsets`]
    /// - [`WadError::MalformedEntry`] if the path field is unterminated or not ASCII
    /// - [`WadError::TruncatedEntry`] if the record header or payload runs past the
    ///   end of the byte source
    pub async fn read_entry_with<F>(&self, offset: u64, include_body: F) -> Result<WadEntry>
    where
        F: FnOnce(&EntryHeader) -> bool,
    {
        if !self.offsets.contains(&offset) {
            return Err(WadError::UnknownOffset(offset));
        }

        let mut record = [0u8; RecordHeader::SIZE];
        self.read_bounded(offset, offset, &mut record).await?;
        let header = RecordHeader::parse(offset, &record)?;

        let body = if include_body(&header) {
            let mut body = vec![0u8; header.size as usize];
            self.read_bounded(offset, offset + RecordHeader::SIZE as u64, &mut body)
                .await?;
            Some(body)
        } else {
            None
        };

        Ok(WadEntry {
            offset,
            header,
            body,
        })
    }

    /// Read `buf.len()` bytes at `at` for the entry at `entry_offset`.
    async fn read_bounded(&self, entry_offset: u64, at: u64, buf: &mut [u8]) -> Result<()> {
        let available = self.size.saturating_sub(at);
        if (buf.len() as u64) > available {
            return Err(WadError::TruncatedEntry {
                offset: entry_offset,
                expected: buf.len() as u64,
                available,
            });
        }
        read_fully(self.reader.as_ref(), at, buf).await
    }

    /// Get a reference to the underlying reader.
    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}

async fn read_fully<R: ReadAt>(reader: &R, offset: u64, buf: &mut [u8]) -> Result<()> {
    reader
        .read_exact_at(offset, buf)
        .await
        .map_err(|source| WadError::Read { offset, source })
}

/// Read and parse the header, tolerating sources shorter than a full header so the
/// magic can still be reported.
async fn read_header<R: ReadAt>(reader: &R, size: u64) -> Result<WadHeader> {
    let len = size.min(WadHeader::SIZE as u64) as usize;
    let mut buf = vec![0u8; len];
    read_fully(reader, 0, &mut buf).await?;
    WadHeader::from_bytes(&buf)
}

/// Compare the declared container size with the real one.
fn check_size(header: &WadHeader, actual: u64) -> Result<Option<TrailingData>> {
    let declared = header.wad_size();

    if actual < declared {
        return Err(WadError::TruncatedFile {
            expected: declared,
            actual,
        });
    }

    if actual > declared {
        warn!(
            declared,
            actual, "wad file is larger than header implies, ignoring trailing bytes"
        );
        return Ok(Some(TrailingData { declared, actual }));
    }

    Ok(None)
}

/// Turn the raw index slots into the bias and the absolute offsets of live entries.
///
/// The smallest live pointer is taken to address the record at [`EntryIndex::END`].
/// A bias of zero means that assumption does not hold for this file, and it is
/// rejected rather than trusted.
pub fn resolve_offsets(slots: &[IndexSlot]) -> Result<(i64, Vec<u64>)> {
    let live = || slots.iter().filter(|slot| slot.in_use).map(|slot| slot.pointer);

    let min = live().min().ok_or_else(|| WadError::CorruptIndex {
        reason: "no live entries in index".to_string(),
    })?;

    let bias = min as i64 - EntryIndex::END as i64;
    if bias == 0 {
        return Err(WadError::CorruptIndex {
            reason: format!(
                "smallest entry pointer {min} gives a zero base offset, refusing to guess"
            ),
        });
    }

    // every live pointer is >= min, so each result is >= EntryIndex::END
    let offsets = live().map(|ptr| (ptr as i64 - bias) as u64).collect();

    Ok((bias, offsets))
}
