use std::fmt;
use std::io::IsTerminal;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{config, print_ansi_boxed_lines, shell};
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use inquire::{MultiSelect, Text};
use miette::{IntoDiagnostic, Result};
use totem_backup::stats::format_duration;
use totem_backup::{
    normalize_path, validate, BackupOrchestrator, BackupProgress, BackupResult, BackupSelection,
    BackupStage, Category, InstallationLayout,
};

#[derive(Debug, Clone, Default)]
pub struct BackupArgs {
    pub minecraft: Option<String>,
    pub destination: Option<String>,
    pub compress: bool,
    pub saves: bool,
    pub xaero: bool,
    pub distant_horizons: bool,
    pub no_open: bool,
    /// Skip all prompts and use flags plus configured defaults.
    pub yes: bool,
    pub json: bool,
}

/// The five toggles offered in the interactive prompt, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Compress,
    Saves,
    Xaero,
    DistantHorizons,
    OpenWhenDone,
}

impl Toggle {
    const ALL: [Toggle; 5] = [
        Toggle::Compress,
        Toggle::Saves,
        Toggle::Xaero,
        Toggle::DistantHorizons,
        Toggle::OpenWhenDone,
    ];

    fn is_set(self, selection: &BackupSelection) -> bool {
        match self {
            Toggle::Compress => selection.compress,
            Toggle::Saves => selection.include_saves,
            Toggle::Xaero => selection.include_xaero,
            Toggle::DistantHorizons => selection.include_distant_horizons,
            Toggle::OpenWhenDone => selection.open_when_done,
        }
    }

    fn set(self, selection: &mut BackupSelection, value: bool) {
        match self {
            Toggle::Compress => selection.compress = value,
            Toggle::Saves => selection.include_saves = value,
            Toggle::Xaero => selection.include_xaero = value,
            Toggle::DistantHorizons => selection.include_distant_horizons = value,
            Toggle::OpenWhenDone => selection.open_when_done = value,
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Toggle::Compress => "📦 Compress backup (create a .zip archive)",
            Toggle::Saves => "🌍 Include saves (world saves)",
            Toggle::Xaero => "🗺️  Include Xaero maps (minimap data)",
            Toggle::DistantHorizons => "🏔️  Include Distant Horizons (LOD chunks)",
            Toggle::OpenWhenDone => "📂 Open when done (open in file browser)",
        };
        f.write_str(label)
    }
}

pub fn backup_installation(args: BackupArgs) -> Result<()> {
    let mut cfg = config::load_config();
    let interactive = !args.yes && !args.json && std::io::stdin().is_terminal();

    let mut selection = selection_from_flags(&args, cfg.defaults);
    if interactive {
        print_banner();
        selection = prompt_selection(selection)?;
    }

    let raw_root = match args.minecraft.clone() {
        Some(path) => path,
        None if interactive => prompt_minecraft_path(cfg.minecraft_path.as_ref())?,
        None => cfg
            .minecraft_path
            .as_ref()
            .map(|p| p.to_string())
            .ok_or(CliError::NoMinecraftPath)?,
    };

    let raw_destination = match args.destination.clone() {
        Some(path) => path,
        None if interactive => prompt_destination(&cfg.backup_dir_or_default())?,
        None => cfg.backup_dir_or_default().to_string(),
    };

    let layout = InstallationLayout::from_raw(&raw_root);
    let validation = validate(&layout);
    if !validation.valid {
        return Err(CliError::invalid_installation(validation.errors).into());
    }

    if cfg.minecraft_path.as_deref() != Some(layout.root()) {
        cfg.minecraft_path = Some(layout.root().to_path_buf());
        if let Err(e) = config::save_config(&cfg) {
            tracing::warn!("Could not remember Minecraft path: {}", e);
        }
    }

    let destination = Utf8PathBuf::from(normalize_path(&raw_destination));
    let mut orchestrator = BackupOrchestrator::new(layout, destination, selection);
    if !args.json {
        println!();
        println_pad!(
            "{}",
            "🗿 Backing up your Minecraft installation...".bright_blue().bold()
        );
        orchestrator = orchestrator.with_progress(print_progress);
    }

    let result = orchestrator.run().map_err(CliError::backup_failed)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else if result.success {
        print_success_screen(&result);
    } else {
        print_error_screen(&result);
    }

    if selection.open_when_done && !args.json {
        if let Err(e) = shell::open_in_file_browser(result.reveal_path()) {
            tracing::warn!("Could not open {}: {}", result.reveal_path(), e);
        }
    }

    if !result.success {
        return Err(CliError::BackupCompletedWithErrors {
            count: result.errors.len(),
        }
        .into());
    }

    Ok(())
}

/// Configured defaults with any toggles given on the command line switched on.
fn selection_from_flags(args: &BackupArgs, defaults: BackupSelection) -> BackupSelection {
    let mut selection = defaults;
    selection.compress |= args.compress;
    selection.include_saves |= args.saves;
    selection.include_xaero |= args.xaero;
    selection.include_distant_horizons |= args.distant_horizons;
    if args.no_open {
        selection.open_when_done = false;
    }
    selection
}

fn prompt_selection(initial: BackupSelection) -> Result<BackupSelection> {
    let preselected: Vec<usize> = Toggle::ALL
        .iter()
        .enumerate()
        .filter(|(_, toggle)| toggle.is_set(&initial))
        .map(|(index, _)| index)
        .collect();

    let chosen = MultiSelect::new("Backup options:", Toggle::ALL.to_vec())
        .with_default(&preselected)
        .with_help_message("↑↓ to move, space to toggle, → to select all, enter to confirm")
        .prompt()
        .map_err(CliError::from)?;

    let mut selection = initial;
    for toggle in Toggle::ALL {
        toggle.set(&mut selection, chosen.contains(&toggle));
    }
    Ok(selection)
}

fn prompt_minecraft_path(remembered: Option<&Utf8PathBuf>) -> Result<String> {
    let remembered = remembered.map(|p| p.to_string());
    let mut prompt = Text::new("Enter path to .minecraft folder:")
        .with_placeholder("C:\\Users\\...\\.minecraft or ~/.minecraft");
    if let Some(remembered) = remembered.as_deref() {
        prompt = prompt.with_default(remembered);
    }

    let path = prompt.prompt().map_err(CliError::from)?;
    if path.trim().is_empty() {
        return Err(CliError::NoMinecraftPath.into());
    }
    Ok(path)
}

fn prompt_destination(default: &Utf8Path) -> Result<String> {
    let default = default.to_string();
    let path = Text::new("Backup destination:")
        .with_default(&default)
        .prompt()
        .map_err(CliError::from)?;
    Ok(path)
}

fn print_banner() {
    println!();
    println_pad!(
        "{} {}",
        "🗿 Totem".bright_white().bold(),
        format!("v{} - Minecraft Backup Utility", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!();
}

fn step_message(category: Category) -> &'static str {
    match category {
        Category::Screenshots => "Copying screenshots...",
        Category::Mods => "Listing mods...",
        Category::Shaders => "Processing shaderpacks...",
        Category::ResourcePacks => "Listing resource packs...",
        Category::Options => "Copying options.txt...",
        Category::Saves => "Copying saves (this may take a while)...",
        Category::Xaero => "Copying Xaero maps...",
        Category::DistantHorizons => "Copying Distant Horizons data...",
        Category::Manifest => "Generating info.md...",
        Category::Zip => "Creating zip archive...",
    }
}

fn finished_message(category: Category, count: usize) -> Option<String> {
    match category {
        Category::Mods => Some(format!("Listed {} mods", count)),
        Category::Shaders => Some(format!("Processed {} entries", count)),
        Category::ResourcePacks => Some(format!("Listed {} packs", count)),
        Category::Options | Category::Manifest => None,
        Category::Zip => Some(format!("Archived {} files", count)),
        _ => Some(format!("Copied {} files", count)),
    }
}

fn print_progress(progress: BackupProgress) {
    match progress.stage {
        BackupStage::Preparing => {
            if let Some(dir) = progress.output_dir {
                println_pad!(
                    "{} {}",
                    "→ Creating backup:".bright_yellow(),
                    dir.as_str().bright_white().bold()
                );
            }
        }
        BackupStage::Step(category) => match progress.finished {
            None => println_pad!("{} {}", "→".bright_yellow(), step_message(category)),
            Some(count) => {
                if let Some(message) = finished_message(category, count) {
                    println_pad!("  {}", message.dimmed());
                }
            }
        },
        BackupStage::Complete => {}
    }
}

fn content_lines(result: &BackupResult) -> Vec<String> {
    let stats = &result.stats;
    [
        ("📸", stats.screenshots_copied, "screenshots"),
        ("📦", stats.mods_listed, "mods listed"),
        ("✨", stats.shaders_listed, "shaders listed"),
        ("⚙️ ", stats.shader_configs_copied, "shader configs"),
        ("🎨", stats.resourcepacks_listed, "resource packs"),
        ("🌍", stats.saves_copied, "save files"),
        ("🗺️ ", stats.xaero_copied, "xaero files"),
        ("🏔️ ", stats.distant_horizons_copied, "DH files"),
    ]
    .into_iter()
    .filter(|(_, count, _)| *count > 0)
    .map(|(icon, count, label)| format!("  {} {} {}", icon, count, label))
    .collect()
}

fn print_success_screen(result: &BackupResult) {
    println!();
    println_pad!("{}", "✓ Backup Complete!".bright_green().bold());

    let mut lines = vec![
        format!("{} {}", "Output:".bright_white(), result.output_path.as_str().bright_green()),
        format!("{} {}", "Duration:".bright_white(), format_duration(result.duration)),
        format!("{} {} files copied", "Files:".bright_white(), result.total_files),
        format!(
            "{} {} / {}",
            "Minecraft:".bright_white(),
            result.metadata.version,
            result.metadata.loader_display()
        ),
        String::new(),
        format!("{}", "Contents:".bright_white()),
    ];
    lines.extend(content_lines(result));
    print_ansi_boxed_lines(&lines);
    println!();
}

fn print_error_screen(result: &BackupResult) {
    println!();
    println_pad!("{}", "✗ Backup Completed with Errors".bright_red().bold());

    let mut lines = vec![
        format!("{} {}", "Output:".bright_white(), result.output_path.as_str().bright_yellow()),
        String::new(),
        format!("{}", "Errors:".bright_red().bold()),
    ];
    lines.extend(result.errors.iter().map(|e| format!("  • {}", e)));
    print_ansi_boxed_lines(&lines);
    println!();
}
