use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("No Minecraft folder given")]
    #[diagnostic(
        code(backup::no_minecraft_path),
        help("Pass --minecraft <path>, run interactively, or save one with 'totem config set-minecraft-path <path>'")
    )]
    NoMinecraftPath,

    #[error("Invalid Minecraft folder: {}", .reasons.join("; "))]
    #[diagnostic(
        code(installation::invalid),
        help("Point the path at your .minecraft folder (or the minecraft/ folder of a MultiMC/Prism instance)")
    )]
    InvalidInstallation { reasons: Vec<String> },

    #[error("Backup failed")]
    #[diagnostic(
        code(backup::failed),
        help("Check that the destination folder is writable and has enough free space")
    )]
    BackupFailed {
        #[source]
        source: totem_backup::Error,
    },

    #[error("Backup completed with {count} error(s)")]
    #[diagnostic(
        code(backup::completed_with_errors),
        help("The backup was written, but some categories are missing. See the errors above or in info.md")
    )]
    BackupCompletedWithErrors { count: usize },

    #[error("Failed to save config")]
    #[diagnostic(
        code(config::save_failed),
        help("Check write permissions next to the totem executable")
    )]
    ConfigSaveFailed {
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt failed")]
    #[diagnostic(code(prompt::failed))]
    Prompt {
        #[from]
        source: inquire::InquireError,
    },
}

impl CliError {
    pub fn invalid_installation(reasons: Vec<String>) -> Self {
        Self::InvalidInstallation { reasons }
    }

    pub fn backup_failed(source: totem_backup::Error) -> Self {
        Self::BackupFailed { source }
    }

    pub fn config_save_failed(source: std::io::Error) -> Self {
        Self::ConfigSaveFailed { source }
    }
}
