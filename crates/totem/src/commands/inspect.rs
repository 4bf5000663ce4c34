use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config;
use camino::Utf8Path;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use totem_backup::stats::{dir_size, format_bytes};
use totem_backup::{inspect, validate, InstallationLayout, InstallationMetadata};

pub struct InspectArgs {
    pub minecraft: Option<String>,
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport<'a> {
    layout: &'a InstallationLayout,
    valid: bool,
    errors: &'a [String],
    metadata: Option<&'a InstallationMetadata>,
}

pub fn inspect_installation(args: InspectArgs) -> Result<()> {
    let raw_root = match args.minecraft {
        Some(path) => path,
        None => config::load_config()
            .minecraft_path
            .map(|p| p.to_string())
            .ok_or(CliError::NoMinecraftPath)?,
    };

    let layout = InstallationLayout::from_raw(&raw_root);
    let validation = validate(&layout);
    let metadata = validation.valid.then(|| inspect(layout.root()));

    if args.json {
        let report = InspectReport {
            layout: &layout,
            valid: validation.valid,
            errors: &validation.errors,
            metadata: metadata.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
    }

    let Some(metadata) = metadata else {
        return Err(CliError::invalid_installation(validation.errors).into());
    };
    if args.json {
        return Ok(());
    }

    println_pad!(
        "{} {}",
        "🗿 Minecraft folder:".bright_blue().bold(),
        layout.root().as_str().bright_cyan().bold()
    );
    println_pad!(
        "{} {}",
        "🏷️ Version:".bright_green(),
        metadata.version.bright_white().bold()
    );
    println_pad!(
        "{} {}",
        "🧩 Mod loader:".bright_yellow(),
        metadata.loader_display().bright_white().bold()
    );

    println_pad!("\n{}", "📁 Contents:".bright_magenta().bold());
    let entries: [(&str, &Utf8Path); 8] = [
        ("screenshots", layout.screenshots()),
        ("mods", layout.mods()),
        ("shaderpacks", layout.shaderpacks()),
        ("resourcepacks", layout.resourcepacks()),
        ("options.txt", layout.options()),
        ("saves", layout.saves()),
        ("xaero", layout.xaero()),
        ("distant_horizons_server_data", layout.distant_horizons()),
    ];
    for (name, path) in entries {
        if path.exists() {
            println_pad!(
                "   {} {} {}",
                "✓".bright_green(),
                name.bright_cyan().bold(),
                format!("({})", format_bytes(dir_size(path))).dimmed()
            );
        } else {
            println_pad!("   {} {}", "✗".bright_red(), name.dimmed());
        }
    }

    Ok(())
}
