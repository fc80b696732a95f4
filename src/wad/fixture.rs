//! In-memory WAD containers for tests.

use super::structures::{EntryIndex, IndexSlot, RecordHeader, WadHeader, WAD_MAGIC};

pub const DEFAULT_BIAS: i64 = 0x1000_0000;

struct Entry {
    path: Vec<u8>,
    declared_size: u32,
    body: Vec<u8>,
}

/// Lays entries out back to back after the index. Entry `n` lives in slot `2n + 1`;
/// the even slots are dead and hold junk pointers.
pub struct WadBuilder {
    entries: Vec<Entry>,
    bias: i64,
}

impl WadBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            bias: DEFAULT_BIAS,
        }
    }

    pub fn bias(mut self, bias: i64) -> Self {
        self.bias = bias;
        self
    }

    pub fn entry(self, path: &str, body: &[u8]) -> Self {
        self.raw_entry(path, body.len() as u32, body)
    }

    /// Entry whose size field need not match the payload that follows it.
    pub fn raw_entry(mut self, path: &str, declared_size: u32, body: &[u8]) -> Self {
        assert!(path.len() <= RecordHeader::PATH_FIELD_LEN);
        self.entries.push(Entry {
            path: path.as_bytes().to_vec(),
            declared_size,
            body: body.to_vec(),
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = vec![0u8; EntryIndex::END as usize];
        out[..4].copy_from_slice(&WAD_MAGIC);

        for (n, entry) in self.entries.iter().enumerate() {
            let offset = out.len() as i64;
            let pointer = (offset + self.bias) as u32;

            let live = EntryIndex::OFFSET as usize + (2 * n + 1) * IndexSlot::SIZE;
            out[live..live + 4].copy_from_slice(&pointer.to_le_bytes());
            out[live + 4] = 1;
            out[live + 5..live + 8].copy_from_slice(&[0xEE; 3]);

            let dead = EntryIndex::OFFSET as usize + 2 * n * IndexSlot::SIZE;
            out[dead..dead + 4].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());

            let mut record = [0u8; RecordHeader::SIZE];
            record[..4].copy_from_slice(&[0xAB; 4]);
            record[RecordHeader::PATH_START..RecordHeader::PATH_START + entry.path.len()]
                .copy_from_slice(&entry.path);
            record[RecordHeader::SIZE_OFFSET..RecordHeader::SIZE_OFFSET + 4]
                .copy_from_slice(&entry.declared_size.to_le_bytes());
            out.extend_from_slice(&record);
            out.extend_from_slice(&entry.body);
        }

        let body_size = (out.len() - WadHeader::SIZE) as u32;
        out[248..252].copy_from_slice(&body_size.to_le_bytes());
        out
    }
}
