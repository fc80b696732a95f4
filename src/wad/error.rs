use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WadError>;

/// Errors produced while decoding or extracting a WAD container.
#[derive(Debug, Error)]
pub enum WadError {
    /// The first four bytes are not the WAD magic.
    #[error(
        "File does not appear to be a Zwift WAD file, expected magic: {}, actual: {}",
        show_bytes(.expected),
        show_bytes(.actual)
    )]
    Format {
        expected: [u8; 4],
        actual: Vec<u8>,
    },

    #[error("Truncated wad file: header implies {expected} bytes but file is {actual} bytes")]
    TruncatedFile { expected: u64, actual: u64 },

    #[error("Corrupt entry index: {reason}")]
    CorruptIndex { reason: String },

    #[error("Malformed entry at offset {offset}: {reason}")]
    MalformedEntry { offset: u64, reason: String },

    #[error(
        "Truncated entry at offset {offset}: expected {expected} bytes but only {available} are available"
    )]
    TruncatedEntry {
        offset: u64,
        expected: u64,
        available: u64,
    },

    #[error("Offset {0} is not an entry of this container")]
    UnknownOffset(u64),

    #[error("Destination `{}` {reason}", .path.display())]
    Destination { path: PathBuf, reason: &'static str },

    #[error("Entry would extract out of destination directory: {path:?}")]
    PathTraversal { path: String },

    #[error("Cannot {action} `{}`", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read container at offset {offset}")]
    Read {
        offset: u64,
        #[source]
        source: io::Error,
    },
}

fn show_bytes(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}
