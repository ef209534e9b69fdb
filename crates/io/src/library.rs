// Library scanning: directory tree of list and character files

use std::fs;
use std::path::Path;

use charsheet_model::{LibraryEntry, ListKind};

use crate::error::DocumentError;

/// Scan `root` into library rows. Directories come first, then files, each
/// group sorted by name ignoring case. Hidden entries and files with an
/// unknown extension are skipped; empty directories are kept.
pub fn scan_library(root: &Path) -> Result<Vec<LibraryEntry>, DocumentError> {
    let rows = scan_dir(root)?;
    log::debug!("scanned library {}: {} top-level entries", root.display(), rows.len());
    Ok(rows)
}

fn scan_dir(dir: &Path) -> Result<Vec<LibraryEntry>, DocumentError> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| DocumentError::io(dir, e))? {
        let entry = entry.map_err(|e| DocumentError::io(dir, e))?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| DocumentError::io(&path, e))?;
        if file_type.is_dir() {
            match scan_dir(&path) {
                Ok(children) => dirs.push(LibraryEntry::directory(&path, children)),
                // One unreadable subdirectory should not hide the rest
                Err(e) => log::warn!("skipping library folder: {e}"),
            }
        } else if let Some(kind) = ListKind::from_path(&path) {
            files.push(LibraryEntry::file(&path, kind));
        }
    }

    sort_by_name(&mut dirs);
    sort_by_name(&mut files);
    dirs.extend(files);
    Ok(dirs)
}

fn sort_by_name(entries: &mut [LibraryEntry]) {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_model::EntryKind;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_scan_orders_and_filters() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("Skills")).unwrap();
        fs::create_dir(root.join("archive")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        touch(&root.join("Skills").join("Basic.skl"));
        touch(&root.join("zeta.adq"));
        touch(&root.join("Alpha.EQP"));
        touch(&root.join("readme.txt"));
        touch(&root.join(".hidden.not"));

        let rows = scan_library(root).unwrap();
        let names: Vec<_> = rows.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["archive", "Skills", "Alpha", "zeta"]);

        assert_eq!(rows[0].kind, EntryKind::Directory);
        assert!(rows[0].children.is_empty());
        assert_eq!(rows[1].children[0].list_kind(), Some(ListKind::Skills));
        assert_eq!(rows[2].list_kind(), Some(ListKind::Equipment));
        assert_eq!(rows.iter().map(LibraryEntry::file_count).sum::<usize>(), 3);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            scan_library(&dir.path().join("nope")),
            Err(DocumentError::Io { .. })
        ));
    }
}
