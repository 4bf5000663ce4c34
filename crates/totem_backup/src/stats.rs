//! Size accounting and human-readable formatting for the manifest.
//!
//! Everything here is best-effort: unreadable entries count as zero bytes and
//! missing directories yield empty results instead of errors.

use camino::Utf8Path;
use serde::Serialize;
use std::fs;
use std::time::Duration;
use walkdir::WalkDir;

/// A named entry and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySize {
    pub name: String,
    pub size: u64,
}

/// Recursive sum of file sizes under `path`; 0 if it is missing or unreadable.
pub fn dir_size(path: &Utf8Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// The `limit` largest immediate children of `dir`, biggest first.
///
/// Files are sized directly, directories with [`dir_size`]. Ties are broken by
/// name so the ranking is stable.
pub fn largest_entries(dir: &Utf8Path, limit: usize) -> Vec<EntrySize> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut items: Vec<EntrySize> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let size = if is_dir {
                Utf8Path::from_path(&entry.path()).map(dir_size).unwrap_or(0)
            } else {
                entry.metadata().map(|m| m.len()).unwrap_or(0)
            };
            EntrySize { name, size }
        })
        .collect();

    items.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
    items.truncate(limit);
    items
}

/// Number of immediate subdirectories of `dir` (worlds inside `saves/`).
pub fn count_subdirs(dir: &Utf8Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
                .count()
        })
        .unwrap_or(0)
}

/// Format a byte count with one decimal place on a 1024-based unit ladder.
///
/// `0` renders as `"0 B"`; everything else uses the largest unit in which the
/// value is at least 1, e.g. `1536` renders as `"1.5 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Format an elapsed time as `"N.N seconds"` or, from one minute up, `"Nm Ns"`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        return format!("{:.1} seconds", secs);
    }

    let whole = duration.as_secs();
    format!("{}m {}s", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500.0 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1.0 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.0 GB");
        assert_eq!(format_bytes(1_099_511_627_776), "1.0 TB");
        assert_eq!(format_bytes(2 * 1_125_899_906_842_624), "2048.0 TB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs_f64(5.5)), "5.5 seconds");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m 0s");
        assert_eq!(format_duration(Duration::from_millis(125_900)), "2m 5s");
    }

    #[test]
    fn test_dir_size_missing_is_zero() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        assert_eq!(dir_size(&root.join("missing")), 0);
    }

    #[test]
    fn test_dir_size_is_recursive() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::write(root.join("a"), vec![0u8; 10]).unwrap();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("sub/deeper/b"), vec![0u8; 32]).unwrap();

        assert_eq!(dir_size(&root), 42);
    }

    #[test]
    fn test_largest_entries_ranks_files_and_dirs() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::write(root.join("small.jar"), vec![0u8; 5]).unwrap();
        fs::write(root.join("big.jar"), vec![0u8; 100]).unwrap();
        fs::create_dir(root.join("World")).unwrap();
        fs::write(root.join("World/level.dat"), vec![0u8; 50]).unwrap();
        fs::write(root.join("tiny.jar"), vec![0u8; 1]).unwrap();

        let largest = largest_entries(&root, 3);
        assert_eq!(
            largest,
            vec![
                EntrySize {
                    name: "big.jar".to_string(),
                    size: 100
                },
                EntrySize {
                    name: "World".to_string(),
                    size: 50
                },
                EntrySize {
                    name: "small.jar".to_string(),
                    size: 5
                },
            ]
        );
    }

    #[test]
    fn test_largest_entries_missing_dir() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        assert!(largest_entries(&root.join("missing"), 3).is_empty());
    }

    #[test]
    fn test_count_subdirs() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir(root.join("New World")).unwrap();
        fs::create_dir(root.join("Hardcore")).unwrap();
        fs::write(root.join("stray.txt"), b"").unwrap();

        assert_eq!(count_subdirs(&root), 2);
    }
}
