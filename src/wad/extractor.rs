use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::io::ReadAt;

use super::error::{Result, WadError};
use super::parser::WadParser;
use super::structures::{EntryHeader, WadEntry};

/// Selection predicate over entry metadata. It never sees payload bytes.
pub type EntryPredicate<'a> = dyn Fn(&EntryHeader) -> bool + Send + Sync + 'a;

/// Predicate that selects every entry
pub fn select_all(_: &EntryHeader) -> bool {
    true
}

/// Binary units with no space, so the size stays one column: `2KiB`
fn human_size(size: u64) -> String {
    humansize::format_size(size, humansize::BINARY.space_after_value(false))
}

/// How [`WadExtractor::list`] renders each entry
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Prefix each path with its size
    pub long: bool,
    /// Scale sizes to binary units instead of raw byte counts
    pub human_readable: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Log every entry as it is written
    pub verbose: bool,
}

/// Totals for one extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files_extracted: usize,
    pub bytes_written: u64,
    /// Entries the predicate rejected
    pub entries_skipped: usize,
}

/// WAD container extractor
pub struct WadExtractor<R: ReadAt> {
    parser: WadParser<R>,
}

impl<R: ReadAt> WadExtractor<R> {
    /// Validate the container behind `reader` and index its entries.
    pub async fn open(reader: Arc<R>) -> Result<Self> {
        Ok(Self {
            parser: WadParser::open(reader).await?,
        })
    }

    pub fn parser(&self) -> &WadParser<R> {
        &self.parser
    }

    /// Metadata of every entry, in index order
    pub async fn list_entries(&self) -> Result<Vec<WadEntry>> {
        let mut entries = Vec::with_capacity(self.parser.entry_offsets().len());
        for &offset in self.parser.entry_offsets() {
            entries.push(self.parser.read_entry(offset, false).await?);
        }
        Ok(entries)
    }

    /// Render one line per entry, in index order. Payloads are never read.
    pub async fn list(&self, options: ListOptions) -> Result<Vec<String>> {
        let entries = self.list_entries().await?;

        Ok(entries
            .iter()
            .map(|entry| {
                if !options.long {
                    return entry.path().to_string();
                }
                let size = if options.human_readable {
                    human_size(entry.size() as u64)
                } else {
                    entry.size().to_string()
                };
                format!("{} {}", size, entry.path())
            })
            .collect())
    }

    /// Extract the entries `predicate` selects into `dest`.
    ///
    /// `dest` must be an existing, empty directory. Every selected path is checked
    /// before anything is written, so an entry escaping `dest` leaves it untouched.
    /// A failed write aborts the run and keeps whatever was already written.
    pub async fn extract(
        &self,
        dest: &Path,
        predicate: &EntryPredicate<'_>,
        options: ExtractOptions,
    ) -> Result<ExtractStats> {
        check_destination(dest).await?;

        let mut stats = ExtractStats::default();

        // Plan: metadata only, so no payload is read for a run that will be refused
        let mut planned = Vec::new();
        for &offset in self.parser.entry_offsets() {
            let entry = self.parser.read_entry(offset, false).await?;
            if !predicate(&entry.header) {
                stats.entries_skipped += 1;
                continue;
            }
            let output_path =
                contained_path(dest, entry.path()).ok_or_else(|| WadError::PathTraversal {
                    path: entry.path().to_string(),
                })?;
            planned.push((offset, output_path));
        }
        debug!(
            selected = planned.len(),
            skipped = stats.entries_skipped,
            "planned extraction"
        );

        for (offset, output_path) in planned {
            let entry = self.parser.read_entry(offset, true).await?;
            let body = entry.body.unwrap_or_default();

            if options.verbose {
                info!(path = %entry.header.path, size = entry.header.size, "extracting");
            }

            write_file(&output_path, &body).await?;

            stats.files_extracted += 1;
            stats.bytes_written += body.len() as u64;
        }

        Ok(stats)
    }
}

async fn check_destination(dest: &Path) -> Result<()> {
    let is_dir = fs::metadata(dest)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(WadError::Destination {
            path: dest.to_path_buf(),
            reason: "is not an existing directory",
        });
    }

    let mut dir = fs::read_dir(dest).await.map_err(|source| WadError::Io {
        action: "read directory",
        path: dest.to_path_buf(),
        source,
    })?;
    let first = dir.next_entry().await.map_err(|source| WadError::Io {
        action: "read directory",
        path: dest.to_path_buf(),
        source,
    })?;
    if first.is_some() {
        return Err(WadError::Destination {
            path: dest.to_path_buf(),
            reason: "is not empty",
        });
    }

    Ok(())
}

/// Join `entry_path` onto `root`, or `None` if the result would not be strictly
/// inside `root`.
///
/// Resolution is lexical: `.` is dropped, `..` pops a component, and absolute or
/// prefixed paths are refused outright.
fn contained_path(root: &Path, entry_path: &str) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

    for component in Path::new(entry_path).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if parts.is_empty() {
        return None;
    }

    let mut path = root.to_path_buf();
    path.extend(parts);
    Some(path)
}

/// Extract file to disk
async fn write_file(output_path: &Path, data: &[u8]) -> Result<()> {
    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| WadError::Io {
                action: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let io_err = |source: std::io::Error| WadError::Io {
        action: "write file",
        path: output_path.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(output_path).await.map_err(io_err)?;
    file.write_all(data).await.map_err(io_err)?;
    file.flush().await.map_err(io_err)?;

    Ok(())
}
