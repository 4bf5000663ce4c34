//! Application configuration management utilities.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use totem_backup::BackupSelection;

/// Folder name used for backups under the user's home directory.
pub const DEFAULT_BACKUP_DIR_NAME: &str = "TotemBackups";

/// Application-wide configuration stored in config.toml.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Last used `.minecraft` folder.
    pub minecraft_path: Option<Utf8PathBuf>,
    /// Where backups are written. Falls back to [`default_backup_dir`].
    pub backup_dir: Option<Utf8PathBuf>,
    /// Toggle values preselected in the interactive prompt.
    #[serde(default)]
    pub defaults: BackupSelection,
}

impl AppConfig {
    pub fn backup_dir_or_default(&self) -> Utf8PathBuf {
        self.backup_dir.clone().unwrap_or_else(default_backup_dir)
    }
}

/// `~/TotemBackups`, or `./TotemBackups` when the home directory is unknown.
pub fn default_backup_dir() -> Utf8PathBuf {
    directories_next::UserDirs::new()
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.home_dir().to_path_buf()).ok())
        .map(|home| home.join(DEFAULT_BACKUP_DIR_NAME))
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_BACKUP_DIR_NAME))
}

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (config.toml next to the executable).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the application configuration from config.toml.
/// Returns default configuration if file doesn't exist or cannot be parsed.
pub fn load_config() -> AppConfig {
    default_config_path()
        .map(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Loads configuration from `path`, falling back to defaults.
pub fn load_config_from(path: &Utf8Path) -> AppConfig {
    if path.exists() {
        if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("Ignoring invalid config file {}: {}", path, e),
            }
        }
    }
    AppConfig::default()
}

/// Saves the application configuration to config.toml.
pub fn save_config(cfg: &AppConfig) -> io::Result<()> {
    let path = default_config_path().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not determine config path")
    })?;
    save_config_to(&path, cfg)
}

/// Writes `cfg` to `path` as pretty TOML.
pub fn save_config_to(path: &Utf8Path, cfg: &AppConfig) -> io::Result<()> {
    let content = toml::to_string_pretty(cfg).map_err(io::Error::other)?;
    fs::write(path, content)
}
