//! Source-file discovery and path-to-namespace mapping.
//!
//! A file at `<root>/<top>/<name>.csv` becomes table `<name>` in schema
//! `raw_<top>`. Deeper files are grouped per directory: everything under
//! `<root>/<top>/.../<parent>/` lands in table `<top>_<parent>`.

use std::{
    fmt, fs,
    path::{Component, Path, PathBuf},
};

use log::warn;

use crate::{
    error::{GeneratorError, Result},
    naming::normalize_name,
};

const SCHEMA_PREFIX: &str = "raw_";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    /// Path as discovered, i.e. joined onto the configured root.
    pub path: PathBuf,
    /// Path relative to the configured root.
    pub relative: PathBuf,
}

impl SourceFile {
    pub fn new(path: PathBuf, root: &Path) -> Result<Self> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| GeneratorError::InvalidPath {
                path: path.clone(),
                root: root.to_path_buf(),
            })?
            .to_path_buf();
        Ok(Self { path, relative })
    }

    pub fn placement(&self) -> Result<Placement> {
        place(&self.relative).ok_or_else(|| GeneratorError::InvalidPath {
            path: self.path.clone(),
            root: root_of(&self.path, &self.relative),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placement {
    pub schema: String,
    pub table: String,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Maps a root-relative path to its `(schema, table)` pair.
///
/// Returns `None` when the path has no top-level directory.
pub fn place(relative: &Path) -> Option<Placement> {
    let parts = segments(relative);
    if parts.len() < 2 {
        return None;
    }
    let top = &parts[0];
    let table = if parts.len() == 2 {
        let file = Path::new(&parts[1]);
        file.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| parts[1].clone())
    } else {
        format!("{top}_{}", parts[parts.len() - 2])
    };
    Some(Placement {
        schema: normalize_name(&format!("{SCHEMA_PREFIX}{top}")),
        table: normalize_name(&table),
    })
}

/// Builds the `s3://` URI of the directory holding `relative`, with a trailing slash.
pub fn external_location(relative: &Path, bucket: &str) -> String {
    let parts = segments(relative);
    let directories = &parts[..parts.len().saturating_sub(1)];
    format!("s3://{bucket}/{}/", directories.join("/"))
}

/// Files found under a root, plus the number of nested directories or
/// entries that could not be read and were left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredFiles {
    pub files: Vec<SourceFile>,
    pub unreadable_entries: usize,
}

/// Recursively collects files under `root` whose extension matches `extension`.
///
/// Only a failure to list `root` itself is an error. Nested directories and
/// entries that cannot be read are logged and counted in
/// [`DiscoveredFiles::unreadable_entries`]. Files are sorted by path so
/// repeated scans of an unchanged tree agree.
pub fn discover_files(root: &Path, extension: &str) -> Result<DiscoveredFiles> {
    let wanted = extension.trim_start_matches('.');
    let mut discovered = DiscoveredFiles::default();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if dir.as_path() == root => {
                return Err(GeneratorError::Discovery { path: dir, source });
            }
            Err(err) => {
                warn!("Skipping unreadable directory {dir:?}: {err}");
                discovered.unreadable_entries += 1;
                continue;
            }
        };
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry in {dir:?}: {err}");
                    discovered.unreadable_entries += 1;
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!("Skipping {path:?}: {err}");
                    discovered.unreadable_entries += 1;
                    continue;
                }
            };
            // Symlinked directories are not followed; symlinked files are.
            if file_type.is_dir() {
                pending.push(path);
            } else if has_extension(&path, wanted) && path.is_file() {
                discovered.files.push(SourceFile::new(path, root)?);
            }
        }
    }
    discovered.files.sort();
    Ok(discovered)
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

fn segments(relative: &Path) -> Vec<String> {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

fn root_of(path: &Path, relative: &Path) -> PathBuf {
    let mut root = path.to_path_buf();
    for _ in relative.components() {
        root.pop();
    }
    root
}
