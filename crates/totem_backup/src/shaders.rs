//! Splitting `shaderpacks/` into catalogued packs and copied configs.
//!
//! Shader packs are large and re-downloadable, so they are only listed by name.
//! Their per-pack settings live next to them as `<pack>.txt` files; those are
//! small, user-authored and copied verbatim into `shader_configs/`.

use crate::copy::copy_file;
use crate::error::Result;
use camino::Utf8Path;
use std::fs;

/// Extension that marks a shader settings file.
pub const SHADER_CONFIG_EXTENSION: &str = ".txt";

/// Output subdirectory receiving the copied settings files.
pub const SHADER_CONFIGS_DIR: &str = "shader_configs";

/// How an entry of `shaderpacks/` is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderEntryKind {
    /// Catalogued by name, not copied.
    Pack,
    /// Copied verbatim, not catalogued.
    Config,
}

/// Classify an immediate child of `shaderpacks/`.
///
/// Directories are always packs (unzipped shader packs). Files ending in
/// [`SHADER_CONFIG_EXTENSION`] are configs; every other file is a pack.
pub fn classify_shader_entry(name: &str, is_dir: bool) -> ShaderEntryKind {
    if !is_dir && name.ends_with(SHADER_CONFIG_EXTENSION) {
        ShaderEntryKind::Config
    } else {
        ShaderEntryKind::Pack
    }
}

/// Result of [`split_shaders`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSplit {
    /// Pack names in name order.
    pub packs: Vec<String>,
    /// Number of settings files copied into `shader_configs/`.
    pub configs_copied: usize,
}

/// Partition `dir` and copy its settings files into `output_dir/shader_configs/`.
///
/// The config directory is created even when there is nothing to copy, so the
/// bundle layout is stable whenever a `shaderpacks/` folder existed.
pub fn split_shaders(dir: &Utf8Path, output_dir: &Utf8Path) -> Result<ShaderSplit> {
    let configs_dir = output_dir.join(SHADER_CONFIGS_DIR);
    fs::create_dir_all(&configs_dir)?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type()?.is_dir();
        entries.push((name, is_dir));
    }
    entries.sort();

    let mut split = ShaderSplit::default();
    for (name, is_dir) in entries {
        match classify_shader_entry(&name, is_dir) {
            ShaderEntryKind::Config => {
                copy_file(&dir.join(&name), &configs_dir.join(&name))?;
                split.configs_copied += 1;
            }
            ShaderEntryKind::Pack => split.packs.push(name),
        }
    }

    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_classify() {
        assert_eq!(
            classify_shader_entry("BSL_v8.2.09.zip", false),
            ShaderEntryKind::Pack
        );
        assert_eq!(
            classify_shader_entry("BSL_v8.2.09.zip.txt", false),
            ShaderEntryKind::Config
        );
        assert_eq!(
            classify_shader_entry("ComplementaryReimagined", true),
            ShaderEntryKind::Pack
        );
        assert_eq!(classify_shader_entry("odd.txt", true), ShaderEntryKind::Pack);
    }

    #[test]
    fn test_split_routes_zip_and_txt() {
        let src_dir = tempdir().unwrap();
        let src = Utf8PathBuf::from_path_buf(src_dir.path().to_path_buf()).unwrap();
        fs::write(src.join("X.zip"), b"zip").unwrap();
        fs::write(src.join("X.txt"), b"shadowMapResolution=2048").unwrap();
        fs::create_dir(src.join("Unpacked")).unwrap();

        let out_dir = tempdir().unwrap();
        let out = Utf8PathBuf::from_path_buf(out_dir.path().to_path_buf()).unwrap();

        let split = split_shaders(&src, &out).unwrap();
        assert_eq!(split.packs, vec!["Unpacked", "X.zip"]);
        assert!(!split.packs.contains(&"X.txt".to_string()));
        assert_eq!(split.configs_copied, 1);
        assert_eq!(
            fs::read_to_string(out.join("shader_configs/X.txt")).unwrap(),
            "shadowMapResolution=2048"
        );
        assert!(!out.join("shader_configs/X.zip").exists());
    }

    #[test]
    fn test_split_empty_dir_still_creates_config_dir() {
        let src_dir = tempdir().unwrap();
        let src = Utf8PathBuf::from_path_buf(src_dir.path().to_path_buf()).unwrap();
        let out_dir = tempdir().unwrap();
        let out = Utf8PathBuf::from_path_buf(out_dir.path().to_path_buf()).unwrap();

        let split = split_shaders(&src, &out).unwrap();
        assert!(split.packs.is_empty());
        assert_eq!(split.configs_copied, 0);
        assert!(out.join(SHADER_CONFIGS_DIR).is_dir());
    }
}
