//! Verbatim subtree copies and non-recursive listings.

use crate::error::{Error, Result};
use camino::Utf8Path;
use std::fs;
use walkdir::WalkDir;

/// Immediate children of a directory, split by entry type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListing {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

impl EntryListing {
    /// Total number of entries (files and directories).
    pub fn len(&self) -> usize {
        self.files.len() + self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    /// All names, files first, in the order they are written to a catalog.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().chain(self.dirs.iter()).map(String::as_str)
    }
}

/// Recursively mirror `src` under `dst`, returning the number of files copied.
///
/// Directories are created as needed and are not counted. The first failure
/// aborts the copy; files copied before it are left in place.
pub fn copy_tree(src: &Utf8Path, dst: &Utf8Path) -> Result<usize> {
    let mut count = 0;

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let relative = Utf8Path::from_path(relative)
            .ok_or_else(|| Error::NonUtf8Path(entry.path().to_path_buf()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        count += 1;
    }

    tracing::debug!("Copied {} files from {} to {}", count, src, dst);
    Ok(count)
}

/// Copy a single file, creating the destination's parent directory.
pub fn copy_file(src: &Utf8Path, dst: &Utf8Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(())
}

/// Read the immediate children of `src` without recursing or opening them.
///
/// Each list is sorted by name so catalogs are reproducible across platforms.
pub fn list_entries(src: &Utf8Path) -> Result<EntryListing> {
    let mut listing = EntryListing::default();

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            listing.dirs.push(name);
        } else {
            listing.files.push(name);
        }
    }

    listing.files.sort();
    listing.dirs.sort();
    Ok(listing)
}

/// Write a catalog file: one name per line, no trailing newline.
pub fn write_catalog<'a>(
    path: &Utf8Path,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let content = names.into_iter().collect::<Vec<_>>().join("\n");
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    #[test]
    fn test_copy_tree_counts_files_at_any_depth() {
        let src_dir = tempdir().unwrap();
        let src = utf8(src_dir.path());
        fs::write(src.join("a.png"), b"a").unwrap();
        fs::create_dir_all(src.join("x/y/z")).unwrap();
        fs::write(src.join("x/b.png"), b"bb").unwrap();
        fs::write(src.join("x/y/z/c.png"), b"ccc").unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();

        let dst_dir = tempdir().unwrap();
        let dst = utf8(dst_dir.path()).join("copy");

        let count = copy_tree(&src, &dst).unwrap();
        assert_eq!(count, 3);
        assert_eq!(fs::read(dst.join("a.png")).unwrap(), b"a");
        assert_eq!(fs::read(dst.join("x/b.png")).unwrap(), b"bb");
        assert_eq!(fs::read(dst.join("x/y/z/c.png")).unwrap(), b"ccc");
        assert!(dst.join("empty").is_dir());
    }

    #[test]
    fn test_copy_tree_missing_source_fails() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path());
        let result = copy_tree(&root.join("missing"), &root.join("out"));
        assert!(result.is_err());
    }

    #[test]
    fn test_copy_file_creates_parent() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path());
        fs::write(root.join("options.txt"), "fov:0.5").unwrap();

        copy_file(&root.join("options.txt"), &root.join("out/options.txt")).unwrap();
        assert_eq!(
            fs::read_to_string(root.join("out/options.txt")).unwrap(),
            "fov:0.5"
        );
    }

    #[test]
    fn test_list_entries_splits_and_sorts() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path());
        fs::write(root.join("sodium.jar"), b"").unwrap();
        fs::write(root.join("iris.jar"), b"").unwrap();
        fs::create_dir(root.join("config-pack")).unwrap();
        fs::write(root.join("config-pack/inner.jar"), b"").unwrap();

        let listing = list_entries(&root).unwrap();
        assert_eq!(listing.files, vec!["iris.jar", "sodium.jar"]);
        assert_eq!(listing.dirs, vec!["config-pack"]);
        assert_eq!(listing.len(), 3);
        assert_eq!(
            listing.names().collect::<Vec<_>>(),
            vec!["iris.jar", "sodium.jar", "config-pack"]
        );
    }

    #[test]
    fn test_write_catalog_has_no_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = utf8(dir.path()).join("mods.txt");

        write_catalog(&path, ["a.jar", "b.jar"]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a.jar\nb.jar");
    }
}
