use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::Cursor;

use super::error::{Result, WadError};

/// Magic bytes at the start of every WAD container
pub const WAD_MAGIC: [u8; 4] = *b"ZWF!";

/// Container header - 256 bytes
#[derive(Debug, Clone)]
pub struct WadHeader {
    pub magic: [u8; 4],
    /// Number of bytes following the header
    pub body_size: u32,
}

impl WadHeader {
    pub const SIZE: usize = 256;
    const BODY_SIZE_OFFSET: usize = 248;

    /// Parse a header, checking the magic.
    ///
    /// `data` may be shorter than [`Self::SIZE`] when the file itself is; the magic is
    /// still checked first so a foreign file reports a format error, not a truncation.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let magic_len = data.len().min(WAD_MAGIC.len());
        if data[..magic_len] != WAD_MAGIC {
            return Err(WadError::Format {
                expected: WAD_MAGIC,
                actual: data[..magic_len].to_vec(),
            });
        }

        if data.len() < Self::SIZE {
            return Err(WadError::TruncatedFile {
                expected: Self::SIZE as u64,
                actual: data.len() as u64,
            });
        }

        Ok(Self {
            magic: WAD_MAGIC,
            body_size: LittleEndian::read_u32(
                &data[Self::BODY_SIZE_OFFSET..Self::BODY_SIZE_OFFSET + 4],
            ),
        })
    }

    /// Total container size the header declares
    pub fn wad_size(&self) -> u64 {
        Self::SIZE as u64 + self.body_size as u64
    }
}

/// One 8-byte slot of the entry index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSlot {
    /// Raw pointer, still carrying the container's base-offset bias
    pub pointer: u32,
    pub in_use: bool,
}

impl IndexSlot {
    pub const SIZE: usize = 8;
}

/// The index block that follows the header - 1024 slots, 8192 bytes
pub struct EntryIndex;

impl EntryIndex {
    pub const OFFSET: u64 = WadHeader::SIZE as u64;
    pub const SLOT_COUNT: usize = 1024;
    pub const SIZE: usize = Self::SLOT_COUNT * IndexSlot::SIZE;
    /// Where the first entry record is expected to live
    pub const END: u64 = Self::OFFSET + Self::SIZE as u64;

    /// Decode every slot, live or not, in on-disk order.
    pub fn parse_slots(data: &[u8]) -> Result<Vec<IndexSlot>> {
        let mut cursor = Cursor::new(data);
        let mut slots = Vec::with_capacity(Self::SLOT_COUNT);

        for _ in 0..Self::SLOT_COUNT {
            let pointer = cursor.read_u32::<LittleEndian>().map_err(index_too_short)?;
            let in_use = cursor.read_u8().map_err(index_too_short)? != 0;
            // three bytes of padding
            cursor.set_position(cursor.position() + 3);
            slots.push(IndexSlot { pointer, in_use });
        }

        Ok(slots)
    }
}

fn index_too_short(_: std::io::Error) -> WadError {
    WadError::CorruptIndex {
        reason: format!("index block is shorter than {} bytes", EntryIndex::SIZE),
    }
}

/// Per-entry record header - 192 bytes, immediately followed by the payload
pub struct RecordHeader;

impl RecordHeader {
    pub const SIZE: usize = 192;
    pub const PATH_START: usize = 4;
    pub const PATH_END: usize = 100;
    pub const SIZE_OFFSET: usize = 104;

    /// Width of the NUL-terminated path field
    pub const PATH_FIELD_LEN: usize = Self::PATH_END - Self::PATH_START;

    pub fn parse(offset: u64, data: &[u8]) -> Result<EntryHeader> {
        let path = decode_path(&data[Self::PATH_START..Self::PATH_END]).map_err(|reason| {
            WadError::MalformedEntry {
                offset,
                reason: reason.to_string(),
            }
        })?;
        let size = LittleEndian::read_u32(&data[Self::SIZE_OFFSET..Self::SIZE_OFFSET + 4]);

        Ok(EntryHeader { path, size })
    }
}

/// Decode a NUL-terminated ASCII path field.
pub fn decode_path(field: &[u8]) -> std::result::Result<String, &'static str> {
    let end = field
        .iter()
        .position(|&b| b == 0)
        .ok_or("path field has no NUL terminator")?;
    let bytes = &field[..end];
    if !bytes.is_ascii() {
        return Err("path is not ASCII");
    }
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Entry metadata, available without reading the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Path relative to the container root, as stored
    pub path: String,
    /// Payload length in bytes
    pub size: u32,
}

/// Decoded entry, with the payload only when it was asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadEntry {
    /// Absolute offset of the record header in the container
    pub offset: u64,
    pub header: EntryHeader,
    pub body: Option<Vec<u8>>,
}

impl WadEntry {
    pub fn path(&self) -> &str {
        &self.header.path
    }

    pub fn size(&self) -> u32 {
        self.header.size
    }

    /// Offset of the first payload byte
    pub fn body_offset(&self) -> u64 {
        self.offset + RecordHeader::SIZE as u64
    }
}
