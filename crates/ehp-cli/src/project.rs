//! Project directories: archive entries stored as plain files
//!
//! Entry names use `/` as separator, so `maps/field.bin` lives in a `maps`
//! subdirectory of the project. Names from an archive are never allowed to
//! escape the project directory.

use ehp_formats::archive::{RepackEntry, UnpackedEntry};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Failed to walk project directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("File name is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
    #[error("Entry name '{0}' cannot be stored inside the project directory")]
    UnsafeName(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ProjectError + '_ {
    move |source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read every file below `dir` as a repack entry
///
/// Entries come back ordered by path; the archive layout sorts them again.
/// A file that is the same as `exclude` (usually the archive about to be
/// written) is skipped.
pub fn read_project(
    dir: &Path,
    exclude: Option<&Path>,
) -> Result<Vec<RepackEntry>, ProjectError> {
    let excluded = exclude.and_then(|path| fs::canonicalize(path).ok());
    let mut entries = Vec::new();

    for item in WalkDir::new(dir).sort_by_file_name() {
        let item = item?;
        if !item.file_type().is_file() {
            continue;
        }
        if excluded.is_some() && fs::canonicalize(item.path()).ok() == excluded {
            debug!("Skipping output archive {}", item.path().display());
            continue;
        }

        let relative = item.path().strip_prefix(dir).unwrap_or(item.path());
        let name = entry_name(relative)?;
        let bytes = fs::read(item.path()).map_err(io_error(item.path()))?;
        trace!("Read {} ({} bytes)", name, bytes.len());
        entries.push(RepackEntry::bytes(name, bytes));
    }

    debug!("Read {} files from {}", entries.len(), dir.display());
    Ok(entries)
}

/// Entry name for a path relative to the project root
fn entry_name(relative: &Path) -> Result<String, ProjectError> {
    let parts = relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| ProjectError::NonUtf8Path(relative.to_path_buf()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join("/"))
}

/// Path below `dir` where the entry called `name` is stored
pub fn entry_path(dir: &Path, name: &str) -> Result<PathBuf, ProjectError> {
    let relative = Path::new(name);
    let safe = !name.is_empty()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !safe {
        return Err(ProjectError::UnsafeName(name.to_string()));
    }
    Ok(dir.join(relative))
}

/// Write unpacked entries below `dir`, creating subdirectories as needed
///
/// Pointer tables are written as text and padding entries as empty files.
pub fn write_entries(dir: &Path, entries: &[UnpackedEntry]) -> Result<usize, ProjectError> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;

    for entry in entries {
        let path = entry_path(dir, &entry.name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&path, entry.bytes()).map_err(io_error(&path))?;
        trace!("Wrote {}", path.display());
    }

    Ok(entries.len())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use ehp_formats::archive::{EntryContent, repack_archive, unpack_archive};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_entry_path_rejects_escapes() {
        let dir = Path::new("/project");
        assert_eq!(
            entry_path(dir, "maps/field.bin").unwrap(),
            PathBuf::from("/project/maps/field.bin")
        );
        assert!(entry_path(dir, "../outside.bin").is_err());
        assert!(entry_path(dir, "/etc/passwd").is_err());
        assert!(entry_path(dir, "a/./b").is_ok());
        assert!(entry_path(dir, "").is_err());
    }

    #[test]
    fn test_read_project_nested() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("maps")).unwrap();
        fs::write(dir.path().join("b.bin"), b"b").unwrap();
        fs::write(dir.path().join("maps").join("field.bin"), b"field").unwrap();

        let entries = read_project(dir.path(), None).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.bin", "maps/field.bin"]);
        assert_eq!(entries[1].content, EntryContent::Bytes(b"field".to_vec()));
    }

    #[test]
    fn test_read_project_skips_excluded_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), b"a").unwrap();
        fs::write(dir.path().join("repacked.ehp"), b"old archive").unwrap();

        let archive = dir.path().join(".").join("repacked.ehp");
        let entries = read_project(dir.path(), Some(&archive)).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.bin"]);

        // An output that does not exist yet excludes nothing
        let missing = dir.path().join("new.ehp");
        assert_eq!(read_project(dir.path(), Some(&missing)).unwrap().len(), 2);
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let original = repack_archive(
            &[
                RepackEntry::bytes("maps/field.bin", vec![1, 2, 3]),
                RepackEntry::text("maps-ptrs.txt", "maps/field.bin\nEND"),
                RepackEntry::bytes("gap#20.txt", Vec::new()),
            ],
            false,
        )
        .unwrap();
        let unpacked = unpack_archive(&original.data, false).unwrap();

        let dir = TempDir::new().unwrap();
        assert_eq!(write_entries(dir.path(), &unpacked.entries).unwrap(), 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("maps-ptrs.txt")).unwrap(),
            "maps/field.bin\nEND"
        );
        assert!(fs::read(dir.path().join("gap#20.txt")).unwrap().is_empty());

        let entries = read_project(dir.path(), None).unwrap();
        let rebuilt = repack_archive(&entries, false).unwrap();
        assert_eq!(rebuilt.data, original.data);
    }
}
