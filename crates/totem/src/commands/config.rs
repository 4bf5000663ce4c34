use crate::errors::CliError;
use crate::utils::config::{self, AppConfig};
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use miette::Result;
use totem_backup::{normalize_path, validate, InstallationLayout};

fn save(cfg: &AppConfig) -> Result<()> {
    config::save_config(cfg).map_err(|e| CliError::config_save_failed(e).into())
}

fn is_valid_minecraft_path(path: &Utf8Path) -> bool {
    validate(&InstallationLayout::new(path)).valid
}

/// Print a config path entry with status indicator
fn print_path_config(
    name: &str,
    path: Option<&Utf8PathBuf>,
    validator: impl Fn(&Utf8PathBuf) -> bool,
) {
    match path {
        Some(p) => {
            let status = if validator(p) {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            println!("  {} {} {}", format!("{}:", name).bright_white(), p, status);
        }
        None => {
            println!(
                "  {} {}",
                format!("{}:", name).bright_white(),
                "(not set)".bright_yellow()
            );
        }
    }
}

fn print_flag(name: &str, value: bool) {
    let value = if value {
        "on".bright_green()
    } else {
        "off".dimmed()
    };
    println!("    {} {}", format!("{}:", name).bright_white(), value);
}

pub fn show_config() -> Result<()> {
    let cfg = config::load_config();
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    println!();
    println!("  {} {}", "config_file:".bright_white(), config_path);

    print_path_config("minecraft_path", cfg.minecraft_path.as_ref(), |p| {
        is_valid_minecraft_path(p)
    });
    print_path_config(
        "backup_dir",
        Some(&cfg.backup_dir_or_default()),
        |p| p.exists(),
    );

    println!("  {}", "defaults:".bright_white());
    print_flag("compress", cfg.defaults.compress);
    print_flag("include_saves", cfg.defaults.include_saves);
    print_flag("include_xaero", cfg.defaults.include_xaero);
    print_flag(
        "include_distant_horizons",
        cfg.defaults.include_distant_horizons,
    );
    print_flag("open_when_done", cfg.defaults.open_when_done);

    println!();
    Ok(())
}

pub fn set_minecraft_path(path: String) -> Result<()> {
    let layout = InstallationLayout::from_raw(&path);
    let validation = validate(&layout);
    if !validation.valid {
        eprintln!(
            "  {}",
            "The path must point to a .minecraft folder.".bright_yellow()
        );
        eprintln!(
            "  {}",
            "Example: C:\\Users\\steve\\AppData\\Roaming\\.minecraft".bright_yellow()
        );
        eprintln!();
        for error in &validation.errors {
            eprintln!("  {} {}", "•".bright_red(), error);
        }

        return Err(CliError::invalid_installation(validation.errors).into());
    }

    let mut cfg = config::load_config();
    cfg.minecraft_path = Some(layout.root().to_path_buf());
    save(&cfg)?;

    println!(
        "{}",
        "✓ Minecraft path set successfully!".bright_green().bold()
    );
    println!();
    println!(
        "  {} {}",
        "Path:".bright_white().bold(),
        layout.root().as_str().bright_green()
    );

    Ok(())
}

pub fn set_backup_dir(path: String) -> Result<()> {
    let path = Utf8PathBuf::from(normalize_path(&path));

    let mut cfg = config::load_config();
    cfg.backup_dir = Some(path.clone());
    save(&cfg)?;

    println!(
        "{}",
        "✓ Backup folder set successfully!".bright_green().bold()
    );
    println!();
    println!(
        "  {} {}",
        "Path:".bright_white().bold(),
        path.as_str().bright_green()
    );
    if !path.exists() {
        println!(
            "  {}",
            "The folder does not exist yet and will be created on the first backup."
                .bright_cyan()
        );
    }

    Ok(())
}

pub fn reset_config() -> Result<()> {
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    save(&AppConfig::default())?;

    println!(
        "{}",
        "✓ Configuration reset to defaults".bright_green().bold()
    );
    println!();
    println!("  {} {}", "Config file:".bright_white().bold(), config_path);
    println!();
    println!(
        "  {}",
        "Run 'totem config set-minecraft-path <path>' to remember your .minecraft folder"
            .bright_cyan()
    );

    Ok(())
}
