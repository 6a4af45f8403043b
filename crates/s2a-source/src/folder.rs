use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::image::is_supported;

/// Liste les images reconnues dans `dir`, triées par chemin.
///
/// With `recursive`, sub-directories are walked too.
///
/// # Errors
/// Returns an error if `dir` (or a sub-directory) cannot be read.
///
/// # Example
/// ```no_run
/// use s2a_source::folder::scan_images;
/// use std::path::Path;
/// let files = scan_images(Path::new("assets/references"), false).unwrap();
/// ```
pub fn scan_images(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    scan_dir(dir, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Impossible de lire {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                scan_dir(&path, recursive, files)?;
            }
        } else if is_supported(&path) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.webp"));
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("readme.md"));

        let files = scan_images(dir.path(), false).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.png", "b.webp"]);
    }

    #[test]
    fn scan_recurses_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("deep.gif"));

        assert!(scan_images(dir.path(), false).unwrap().is_empty());
        assert_eq!(scan_images(dir.path(), true).unwrap().len(), 1);
    }

    #[test]
    fn scan_missing_dir_errors() {
        assert!(scan_images(Path::new("/nonexistent/refs"), false).is_err());
    }
}
