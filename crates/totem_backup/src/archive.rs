//! Packaging a finished backup folder into a single zip file.

use crate::error::{Error, Result};
use camino::Utf8Path;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use walkdir::WalkDir;
use zip::{write::SimpleFileOptions, ZipWriter};

/// Zip every file under `source_dir` into `dest_file`, returning the file count.
///
/// Entry names are relative to `source_dir` and always use `/`. Directory
/// entries are not written; their structure is implied by the file names.
pub fn archive_dir(source_dir: &Utf8Path, dest_file: &Utf8Path) -> Result<usize> {
    let file = File::create(dest_file)?;
    let count = write_archive(BufWriter::new(file), source_dir)?;

    tracing::info!("Archived {} files into {}", count, dest_file);
    Ok(count)
}

fn write_archive<W: Write + Seek>(writer: W, source_dir: &Utf8Path) -> Result<usize> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        // Maximum deflate level
        .compression_level(Some(9));

    let mut count = 0;
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .unwrap_or(entry.path());
        let relative =
            Utf8Path::from_path(relative).ok_or_else(|| Error::NonUtf8Path(relative.into()))?;
        let zip_path = relative.as_str().replace('\\', "/");

        zip.start_file(zip_path, options)?;
        let mut file = File::open(entry.path())?;
        std::io::copy(&mut file, &mut zip)?;
        count += 1;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    #[test]
    fn test_archive_preserves_relative_paths() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let source = root.join("backup_2024-01-01_12-00");
        fs::create_dir_all(source.join("saves/World/region")).unwrap();
        fs::create_dir_all(source.join("empty")).unwrap();
        fs::write(source.join("info.md"), "# Totem Backup").unwrap();
        fs::write(source.join("saves/World/region/r.0.0.mca"), b"region").unwrap();

        let dest = root.join("backup_2024-01-01_12-00.zip");
        let count = archive_dir(&source, &dest).unwrap();
        assert_eq!(count, 2);

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&"info.md".to_string()));
        assert!(names.contains(&"saves/World/region/r.0.0.mca".to_string()));

        let mut content = String::new();
        archive
            .by_name("info.md")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "# Totem Backup");
    }

    #[test]
    fn test_archive_missing_source_fails() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let result = archive_dir(&root.join("missing"), &root.join("out.zip"));
        assert!(result.is_err());
    }
}
