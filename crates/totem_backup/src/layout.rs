//! Installation path resolution and validation.
//!
//! A Minecraft installation (a `.minecraft` folder or a launcher instance's
//! `minecraft/` folder) has a fixed layout. [`InstallationLayout`] derives every
//! location the backup cares about from the root with plain path joins, and
//! [`validate`] checks that the root looks like an installation before any
//! copying starts.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::path::MAIN_SEPARATOR;

/// Folder name of the Xaero's minimap/world map data.
pub const XAERO_DIR: &str = "xaero";
/// Folder name of the Distant Horizons LOD database.
pub const DISTANT_HORIZONS_DIR: &str = "distant_horizons_server_data";

/// Clean up a path typed or pasted by a user.
///
/// Trims whitespace, strips one matching pair of surrounding quotes (as
/// produced by "Copy as path" on Windows or drag-and-drop in terminals) and
/// rewrites both separator styles to the host separator. Never fails; an
/// empty or bogus path is rejected later by [`validate`].
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = strip_matching_quotes(trimmed).trim();

    unquoted
        .chars()
        .map(|c| match c {
            '/' | '\\' => MAIN_SEPARATOR,
            other => other,
        })
        .collect()
}

fn strip_matching_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Every location inside an installation that the backup reads.
///
/// All subpaths are derived from `root` in [`InstallationLayout::new`] and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationLayout {
    root: Utf8PathBuf,
    screenshots: Utf8PathBuf,
    mods: Utf8PathBuf,
    shaderpacks: Utf8PathBuf,
    resourcepacks: Utf8PathBuf,
    options: Utf8PathBuf,
    saves: Utf8PathBuf,
    xaero: Utf8PathBuf,
    distant_horizons: Utf8PathBuf,
}

impl InstallationLayout {
    /// Derive the layout from an already-normalized root. No filesystem access.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        let root = root.into();
        Self {
            screenshots: root.join("screenshots"),
            mods: root.join("mods"),
            shaderpacks: root.join("shaderpacks"),
            resourcepacks: root.join("resourcepacks"),
            options: root.join("options.txt"),
            saves: root.join("saves"),
            xaero: root.join(XAERO_DIR),
            distant_horizons: root.join(DISTANT_HORIZONS_DIR),
            root,
        }
    }

    /// Normalize a raw user-supplied path and derive the layout from it.
    pub fn from_raw(raw: &str) -> Self {
        Self::new(normalize_path(raw))
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn screenshots(&self) -> &Utf8Path {
        &self.screenshots
    }

    pub fn mods(&self) -> &Utf8Path {
        &self.mods
    }

    pub fn shaderpacks(&self) -> &Utf8Path {
        &self.shaderpacks
    }

    pub fn resourcepacks(&self) -> &Utf8Path {
        &self.resourcepacks
    }

    pub fn options(&self) -> &Utf8Path {
        &self.options
    }

    pub fn saves(&self) -> &Utf8Path {
        &self.saves
    }

    pub fn xaero(&self) -> &Utf8Path {
        &self.xaero
    }

    pub fn distant_horizons(&self) -> &Utf8Path {
        &self.distant_horizons
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Validation {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    fn invalid(error: String) -> Self {
        Self {
            valid: false,
            errors: vec![error],
        }
    }
}

/// Check that the layout's root exists and contains at least one marker.
///
/// The markers are `options.txt`, `mods/` and `shaderpacks/`. The check is
/// advisory: it does not require every subpath to exist, since each backup step
/// checks its own source again before acting.
pub fn validate(layout: &InstallationLayout) -> Validation {
    if !layout.root().exists() {
        return Validation::invalid(format!(
            "Minecraft path does not exist: {}",
            layout.root()
        ));
    }

    let has_marker =
        layout.options().exists() || layout.mods().exists() || layout.shaderpacks().exists();
    if !has_marker {
        return Validation::invalid(format!(
            "No options.txt, mods/ or shaderpacks/ found in {}; \
             point the path at your .minecraft folder",
            layout.root()
        ));
    }

    Validation::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_normalize_strips_quotes_and_whitespace() {
        assert_eq!(normalize_path("  \"abc\"  "), "abc");
        assert_eq!(normalize_path("'abc'"), "abc");
        assert_eq!(normalize_path("\" abc \""), "abc");
    }

    #[test]
    fn test_normalize_keeps_unmatched_quote() {
        assert_eq!(normalize_path("\"abc"), "\"abc");
        assert_eq!(normalize_path("\"abc'"), "\"abc'");
    }

    #[test]
    fn test_normalize_strips_only_one_pair() {
        assert_eq!(normalize_path("\"\"abc\"\""), "\"abc\"");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_normalize_separators() {
        assert_eq!(
            normalize_path(r"C:\Users\steve\.minecraft"),
            "C:/Users/steve/.minecraft"
        );
        assert_eq!(normalize_path("/home/steve/.minecraft"), "/home/steve/.minecraft");
    }

    #[cfg(windows)]
    #[test]
    fn test_normalize_separators() {
        assert_eq!(
            normalize_path("C:/Users/steve/.minecraft"),
            r"C:\Users\steve\.minecraft"
        );
    }

    #[test]
    fn test_layout_subpaths_are_joined_from_root() {
        let layout = InstallationLayout::new("/mc");
        let root = Utf8Path::new("/mc");
        assert_eq!(layout.root(), root);
        assert_eq!(layout.screenshots(), root.join("screenshots"));
        assert_eq!(layout.mods(), root.join("mods"));
        assert_eq!(layout.shaderpacks(), root.join("shaderpacks"));
        assert_eq!(layout.resourcepacks(), root.join("resourcepacks"));
        assert_eq!(layout.options(), root.join("options.txt"));
        assert_eq!(layout.saves(), root.join("saves"));
        assert_eq!(layout.xaero(), root.join("xaero"));
        assert_eq!(
            layout.distant_horizons(),
            root.join("distant_horizons_server_data")
        );
    }

    #[test]
    fn test_validate_options_only_is_valid() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("options.txt"), "fov:0.0").unwrap();

        let validation = validate(&InstallationLayout::new(utf8_root(&dir)));
        assert!(validation.valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn test_validate_without_markers_is_invalid() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("logs")).unwrap();

        let validation = validate(&InstallationLayout::new(utf8_root(&dir)));
        assert!(!validation.valid);
        assert_eq!(validation.errors.len(), 1);
        assert!(validation.errors[0].contains("options.txt"));
        assert!(validation.errors[0].contains("mods/"));
        assert!(validation.errors[0].contains("shaderpacks/"));
    }

    #[test]
    fn test_validate_missing_root_stops_early() {
        let dir = tempdir().unwrap();
        let missing = utf8_root(&dir).join("does-not-exist");

        let validation = validate(&InstallationLayout::new(missing));
        assert!(!validation.valid);
        assert_eq!(validation.errors.len(), 1);
        assert!(validation.errors[0].contains("does not exist"));
    }
}
