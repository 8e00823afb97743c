//! Iterative directory traversal.
//!
//! Discovery walks the tree with an explicit stack of pending directories,
//! prunes excluded names before descending, and never follows or reports a
//! symbolic link. Enumeration order is whatever the OS hands back; the
//! final sort is the only ordering guarantee.

use std::collections::HashSet;
use std::fs::{self, DirEntry, FileType};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RepobundleError;
use crate::path::{compare_paths, relative_posix};
use crate::Result;

/// A file that survived traversal and exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredEntry {
    /// Root-relative, forward-slash separated path
    pub relative_path: String,
}

impl DiscoveredEntry {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }
}

/// A directory whose contents were skipped because it could not be opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDir {
    /// Root-relative path of the directory (empty for the root itself)
    pub relative_path: String,
    /// The error reported when opening it
    pub reason: String,
}

/// Discovered files plus the subtrees that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryOutcome {
    /// Files in deterministic order
    pub entries: Vec<DiscoveredEntry>,
    /// Unopenable directories, sorted by path
    pub skipped: Vec<SkippedDir>,
    /// Files and directories left out because their names are not valid
    /// UTF-8, as lossy display strings. Two entries may render alike.
    #[serde(default)]
    pub invalid_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    Symlink,
    Other,
}

impl EntryKind {
    fn from_file_type(ft: FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// Discover files under `root`, pruning excluded names.
///
/// `excluded_dir_names` and `excluded_file_names` hold lowercase names; each
/// entry name is lowercased before lookup. Directories that cannot be opened
/// are skipped silently. Use [`discover_with_report`] to see which ones.
///
/// # Errors
///
/// [`RepobundleError::RootIsSymlink`] if `root` is a symbolic link and
/// [`RepobundleError::RootNotDirectory`] if it is missing or not a directory.
pub fn discover(
    root: impl AsRef<Path>,
    excluded_dir_names: &HashSet<String>,
    excluded_file_names: &HashSet<String>,
) -> Result<Vec<DiscoveredEntry>> {
    discover_with_report(root, excluded_dir_names, excluded_file_names)
        .map(|outcome| outcome.entries)
}

/// Like [`discover`], but also reports the subtrees that were skipped.
pub fn discover_with_report(
    root: impl AsRef<Path>,
    excluded_dir_names: &HashSet<String>,
    excluded_file_names: &HashSet<String>,
) -> Result<DiscoveryOutcome> {
    let root = root.as_ref();
    validate_root(root)?;

    let mut files: Vec<DiscoveredEntry> = Vec::new();
    let mut skipped: Vec<SkippedDir> = Vec::new();
    let mut invalid_names: Vec<String> = Vec::new();
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let read_dir = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(err) => {
                skipped.push(SkippedDir {
                    relative_path: relative_posix(root, &dir).unwrap_or_default(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        for entry in read_dir {
            // An entry vanishing mid-listing only loses that entry.
            let Ok(entry) = entry else {
                continue;
            };

            let name = entry.file_name();
            let name_lower = name.to_string_lossy().to_lowercase();

            match entry_kind(&entry) {
                EntryKind::Dir => {
                    if excluded_dir_names.contains(&name_lower) {
                        continue;
                    }
                    if name.to_str().is_none() {
                        invalid_names.push(display_relative(root, &entry.path()));
                        continue;
                    }
                    stack.push(entry.path());
                }
                EntryKind::File => {
                    if excluded_file_names.contains(&name_lower) {
                        continue;
                    }
                    // Parents are UTF-8 (see above), so only the file name can fail here.
                    match relative_posix(root, &entry.path()) {
                        Some(rel) => files.push(DiscoveredEntry::new(rel)),
                        None => invalid_names.push(display_relative(root, &entry.path())),
                    }
                }
                EntryKind::Symlink | EntryKind::Other => {}
            }
        }
    }

    files.sort_by(|a, b| compare_paths(&a.relative_path, &b.relative_path));
    skipped.sort_by(|a, b| compare_paths(&a.relative_path, &b.relative_path));
    invalid_names.sort_by(|a, b| compare_paths(a, b));

    Ok(DiscoveryOutcome {
        entries: files,
        skipped,
        invalid_names,
    })
}

/// Lossy root-relative rendering for names that have no exact string form.
fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn validate_root(root: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(root)
        .map_err(|_| RepobundleError::RootNotDirectory(root.to_path_buf()))?;

    if meta.file_type().is_symlink() {
        return Err(RepobundleError::RootIsSymlink(root.to_path_buf()));
    }
    if !meta.is_dir() {
        return Err(RepobundleError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Resolve an entry's type without following links.
///
/// `DirEntry::file_type` never follows symlinks; when it fails or reports
/// something that is neither link, directory nor file, the path is probed
/// again with `lstat`.
fn entry_kind(entry: &DirEntry) -> EntryKind {
    let first = entry.file_type().map(EntryKind::from_file_type);
    match first {
        Ok(kind) if kind != EntryKind::Other => kind,
        _ => fs::symlink_metadata(entry.path())
            .map(|meta| EntryKind::from_file_type(meta.file_type()))
            .unwrap_or(EntryKind::Other),
    }
}
