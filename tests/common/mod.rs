//! Builds WAD containers on disk.

use std::path::{Path, PathBuf};

const INDEX_END: usize = 256 + 8192;
const BIAS: u32 = 0x0800_0000;

/// Containers with one live index slot per entry, laid out back to back.
pub fn build_wad(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = vec![0u8; INDEX_END];
    out[..4].copy_from_slice(b"ZWF!");

    for (n, (path, body)) in entries.iter().enumerate() {
        let slot = 256 + n * 8;
        let pointer = out.len() as u32 + BIAS;
        out[slot..slot + 4].copy_from_slice(&pointer.to_le_bytes());
        out[slot + 4] = 1;

        let mut record = [0u8; 192];
        record[4..4 + path.len()].copy_from_slice(path.as_bytes());
        record[104..108].copy_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&record);
        out.extend_from_slice(body);
    }

    let body_size = (out.len() - 256) as u32;
    out[248..252].copy_from_slice(&body_size.to_le_bytes());
    out
}

pub fn write_wad(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_wad(entries)).unwrap();
    path
}
