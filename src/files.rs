//! File entries and manifest loading.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Result, XtError};

/// A downloadable file in a shared bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Stable identifier, unique within a list.
    pub key: String,
    /// Display label.
    pub name: String,
}

impl FileEntry {
    /// Create a new entry.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }

    /// Parse a `KEY[=NAME]` command line value.
    pub fn from_arg(arg: &str) -> Option<Self> {
        let (key, name) = match arg.split_once('=') {
            Some((key, name)) => (key.trim(), name.trim()),
            None => (arg.trim(), ""),
        };

        if key.is_empty() {
            return None;
        }

        let name = if name.is_empty() {
            default_name(key)
        } else {
            name
        };

        Some(Self::new(key, name))
    }
}

/// Last path segment of a key, used when no name is given.
fn default_name(key: &str) -> &str {
    key.rsplit('/').find(|s| !s.is_empty()).unwrap_or(key)
}

/// Load a file list from a manifest.
///
/// One entry per line as `key<TAB>name`. A bare key is named after its last
/// path segment. Blank lines and lines starting with `#` are ignored. Order is
/// preserved.
pub fn load_manifest(path: &Path) -> Result<Vec<FileEntry>> {
    let content =
        fs::read_to_string(path).map_err(|e| XtError::file_open(path.to_path_buf(), e))?;
    let files = parse_manifest(&content)?;
    tracing::info!("Loaded {} entries from {}", files.len(), path.display());
    Ok(files)
}

/// Parse manifest text.
pub fn parse_manifest(content: &str) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let (key, name) = match line.split_once('\t') {
            Some((key, name)) => (key.trim(), name.trim()),
            None => (line.trim(), ""),
        };

        if key.is_empty() {
            return Err(XtError::manifest_parse(line_no, "missing key"));
        }

        let name = if name.is_empty() {
            default_name(key)
        } else {
            name
        };

        files.push((line_no, FileEntry::new(key, name)));
    }

    if let Some((key, line)) = first_duplicate(files.iter().map(|(line, e)| (*line, e))) {
        return Err(XtError::DuplicateKey { key, line });
    }
    Ok(files.into_iter().map(|(_, entry)| entry).collect())
}

/// Reject lists where a key appears more than once.
///
/// Entries are numbered from 1 in list order.
pub fn ensure_unique_keys(files: &[FileEntry]) -> Result<()> {
    match first_duplicate(files.iter().enumerate().map(|(i, e)| (i + 1, e))) {
        Some((key, entry)) => Err(XtError::DuplicateEntry { key, entry }),
        None => Ok(()),
    }
}

/// Key and position of the first repeated key.
fn first_duplicate<'a>(
    files: impl IntoIterator<Item = (usize, &'a FileEntry)>,
) -> Option<(String, usize)> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .find(|(_, entry)| !seen.insert(entry.key.as_str()))
        .map(|(pos, entry)| (entry.key.clone(), pos))
}
