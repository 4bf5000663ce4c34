//! The `info.md` report written into every backup.
//!
//! Rendering is split from data gathering: [`ManifestFigures::collect`] reads
//! sizes from disk, and [`render_manifest`] is a pure function of its
//! [`ManifestInput`], so the same input always yields the same document.

use crate::backup::{BackupSelection, RunStatistics};
use crate::error::Result;
use crate::inspect::InstallationMetadata;
use crate::layout::InstallationLayout;
use crate::stats::{
    count_subdirs, dir_size, format_bytes, format_duration, largest_entries, EntrySize,
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use std::fmt::Write;
use std::time::Duration;

/// File name of the manifest inside the bundle.
pub const MANIFEST_FILE: &str = "info.md";

/// How many of the largest mods / worlds are listed.
const LARGEST_LIMIT: usize = 3;

/// Values that describe the environment rather than the backup itself.
#[derive(Debug, Clone)]
pub struct ManifestContext {
    pub generated_at: NaiveDateTime,
    /// Operating system and architecture, e.g. `Windows 11 Pro (x86_64)`.
    pub host: String,
    pub tool_version: String,
}

impl ManifestContext {
    /// Context for a manifest generated right now on this machine.
    pub fn current() -> Self {
        Self {
            generated_at: chrono::Local::now().naive_local(),
            host: host_description(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Describe the host OS for the manifest.
pub fn host_description() -> String {
    let os = sysinfo::System::long_os_version().unwrap_or_else(|| {
        match std::env::consts::OS {
            "windows" => "Windows",
            "macos" => "macOS",
            "linux" => "Linux",
            other => other,
        }
        .to_string()
    });
    format!("{} ({})", os, std::env::consts::ARCH)
}

/// Save statistics, present only when saves were included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFigures {
    pub world_count: usize,
    pub total_size: u64,
    pub largest: Vec<EntrySize>,
}

/// Sizes and rankings gathered from disk for the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFigures {
    /// Size of the bundle before `info.md` is written.
    pub backup_size: u64,
    pub mods_size: u64,
    pub largest_mods: Vec<EntrySize>,
    pub saves: Option<SaveFigures>,
}

impl ManifestFigures {
    /// Measure the installation and the bundle written so far.
    pub fn collect(
        layout: &InstallationLayout,
        selection: &BackupSelection,
        output_dir: &Utf8Path,
    ) -> Self {
        let saves = (selection.include_saves && layout.saves().exists()).then(|| SaveFigures {
            world_count: count_subdirs(layout.saves()),
            total_size: dir_size(layout.saves()),
            largest: largest_entries(layout.saves(), LARGEST_LIMIT),
        });

        Self {
            backup_size: dir_size(output_dir),
            mods_size: dir_size(layout.mods()),
            largest_mods: largest_entries(layout.mods(), LARGEST_LIMIT),
            saves,
        }
    }
}

/// Everything the manifest is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct ManifestInput<'a> {
    pub selection: &'a BackupSelection,
    pub layout: &'a InstallationLayout,
    pub stats: &'a RunStatistics,
    pub metadata: &'a InstallationMetadata,
    pub errors: &'a [String],
    pub duration: Duration,
    pub figures: &'a ManifestFigures,
    pub context: &'a ManifestContext,
}

const RESTORATION_GUIDE: &str = "\
## 🔧 Restoration Guide

### 1. Screenshots
Copy the `screenshots/` folder back to your minecraft folder.

### 2. Mods
Re-download mods listed in `mods.txt` from [Modrinth](https://modrinth.com) or [CurseForge](https://curseforge.com).

### 3. Shaders
- Re-download shaders listed in `shaders.txt`
- Copy `shader_configs/` contents to your `shaderpacks/` folder

### 4. Resource Packs
Re-download packs listed in `resourcepacks.txt`.

### 5. Options
Copy `options.txt` to your minecraft folder.

### 6. Saves (if included)
Copy the `saves/` folder back to your minecraft folder.
";

/// Render the manifest document.
pub fn render_manifest(input: &ManifestInput<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, input);
    out
}

fn write_document(out: &mut String, input: &ManifestInput<'_>) -> std::fmt::Result {
    let stats = input.stats;
    let figures = input.figures;
    let context = input.context;

    writeln!(out, "# 🗿 Totem Backup")?;
    writeln!(out)?;
    writeln!(
        out,
        "> Generated on {}",
        context.generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    write_rule(out)?;

    writeln!(out, "## 📋 System Information")?;
    writeln!(out)?;
    write_table_header(out, "Property", "Value")?;
    writeln!(out, "| Minecraft Version | {} |", input.metadata.version)?;
    writeln!(out, "| Mod Loader | {} |", input.metadata.loader_display())?;
    writeln!(out, "| Operating System | {} |", context.host)?;
    writeln!(out, "| Totem Version | v{} |", context.tool_version)?;
    write_rule(out)?;

    writeln!(out, "## 📦 Backup Details")?;
    writeln!(out)?;
    write_table_header(out, "Property", "Value")?;
    writeln!(out, "| Source Path | `{}` |", input.layout.root())?;
    writeln!(out, "| Backup Duration | {} |", format_duration(input.duration))?;
    writeln!(out, "| Total Backup Size | {} |", format_bytes(figures.backup_size))?;
    writeln!(out, "| Total Files Copied | {} files |", stats.total_files_copied)?;
    write_rule(out)?;

    writeln!(out, "## 📁 Contents")?;
    writeln!(out)?;
    write_table_header(out, "Item", "Count")?;
    writeln!(out, "| Screenshots | {} files |", stats.screenshots_copied)?;
    writeln!(
        out,
        "| Mods | {} mods ({} total) |",
        stats.mods_listed,
        format_bytes(figures.mods_size)
    )?;
    writeln!(out, "| Shaders | {} shaders |", stats.shaders_listed)?;
    writeln!(out, "| Shader Configs | {} files |", stats.shader_configs_copied)?;
    writeln!(out, "| Resource Packs | {} packs |", stats.resourcepacks_listed)?;
    writeln!(out, "| Saves | {} files |", stats.saves_copied)?;
    writeln!(out, "| Xaero Maps | {} files |", stats.xaero_copied)?;
    writeln!(out, "| Distant Horizons | {} files |", stats.distant_horizons_copied)?;
    write_rule(out)?;

    writeln!(out, "## 📊 Mod Statistics")?;
    writeln!(out)?;
    writeln!(out, "- **Total Mods:** {}", stats.mods_listed)?;
    writeln!(out, "- **Total Size:** {}", format_bytes(figures.mods_size))?;
    writeln!(out, "- **Largest Mods:**")?;
    write_ranking(out, &figures.largest_mods)?;

    if input.selection.include_saves {
        if let Some(saves) = &figures.saves {
            writeln!(out)?;
            writeln!(out, "## 🌍 Save Statistics")?;
            writeln!(out)?;
            writeln!(out, "- **World count:** {} worlds", saves.world_count)?;
            writeln!(out, "- **Total size:** {}", format_bytes(saves.total_size))?;
            writeln!(out, "- **Largest worlds:**")?;
            write_ranking(out, &saves.largest)?;
        }
    }
    write_rule(out)?;

    out.push_str(RESTORATION_GUIDE);
    write_rule(out)?;

    if input.errors.is_empty() {
        writeln!(out, "## ✅ Status")?;
        writeln!(out)?;
        writeln!(out, "Backup completed successfully with no errors.")?;
    } else {
        writeln!(out, "## ⚠️ Errors")?;
        writeln!(out)?;
        for error in input.errors {
            writeln!(out, "- {}", error)?;
        }
    }
    write_rule(out)?;

    writeln!(
        out,
        "*Generated by [Totem](https://github.com/vaalley/totem) - Minecraft Backup Utility*"
    )
}

fn write_rule(out: &mut String) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out)
}

fn write_table_header(out: &mut String, left: &str, right: &str) -> std::fmt::Result {
    writeln!(out, "| {} | {} |", left, right)?;
    writeln!(out, "|----------|-------|")
}

fn write_ranking(out: &mut String, entries: &[EntrySize]) -> std::fmt::Result {
    if entries.is_empty() {
        return writeln!(out, "  - None found");
    }
    for entry in entries {
        writeln!(out, "  - {} ({})", entry.name, format_bytes(entry.size))?;
    }
    Ok(())
}

/// Write the rendered manifest into `output_dir`, returning its path.
pub fn write_manifest(output_dir: &Utf8Path, content: &str) -> Result<Utf8PathBuf> {
    let path = output_dir.join(MANIFEST_FILE);
    std::fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_context() -> ManifestContext {
        ManifestContext {
            generated_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(14, 30, 5)
                .unwrap(),
            host: "Linux (x86_64)".to_string(),
            tool_version: "1.2.3".to_string(),
        }
    }

    fn sample_stats() -> RunStatistics {
        RunStatistics {
            screenshots_copied: 4,
            mods_listed: 2,
            shaders_listed: 1,
            shader_configs_copied: 1,
            resourcepacks_listed: 3,
            saves_copied: 0,
            xaero_copied: 0,
            distant_horizons_copied: 0,
            total_files_copied: 5,
        }
    }

    fn sample_figures() -> ManifestFigures {
        ManifestFigures {
            backup_size: 2048,
            mods_size: 1536,
            largest_mods: vec![
                EntrySize {
                    name: "create.jar".to_string(),
                    size: 1024,
                },
                EntrySize {
                    name: "jei.jar".to_string(),
                    size: 512,
                },
            ],
            saves: None,
        }
    }

    fn render(
        selection: &BackupSelection,
        figures: &ManifestFigures,
        errors: &[String],
    ) -> String {
        let layout = InstallationLayout::new("/home/steve/.minecraft");
        let stats = sample_stats();
        let metadata = InstallationMetadata {
            version: "1.20.1".to_string(),
            loader: "Fabric".to_string(),
            loader_version: "0.15.11".to_string(),
        };
        let context = fixed_context();
        render_manifest(&ManifestInput {
            selection,
            layout: &layout,
            stats: &stats,
            metadata: &metadata,
            errors,
            duration: Duration::from_millis(3500),
            figures,
            context: &context,
        })
    }

    #[test]
    fn test_sections_in_order() {
        let doc = render(&BackupSelection::default(), &sample_figures(), &[]);

        let order = [
            "# 🗿 Totem Backup",
            "> Generated on 2024-06-01 14:30:05",
            "## 📋 System Information",
            "## 📦 Backup Details",
            "## 📁 Contents",
            "## 📊 Mod Statistics",
            "## 🔧 Restoration Guide",
            "## ✅ Status",
            "*Generated by [Totem]",
        ];
        let mut last = 0;
        for marker in order {
            let pos = doc[last..]
                .find(marker)
                .unwrap_or_else(|| panic!("missing or out of order: {marker}"));
            last += pos;
        }
    }

    #[test]
    fn test_tables_and_figures() {
        let doc = render(&BackupSelection::default(), &sample_figures(), &[]);

        assert!(doc.contains("| Minecraft Version | 1.20.1 |"));
        assert!(doc.contains("| Mod Loader | Fabric (0.15.11) |"));
        assert!(doc.contains("| Operating System | Linux (x86_64) |"));
        assert!(doc.contains("| Totem Version | v1.2.3 |"));
        assert!(doc.contains("| Source Path | `/home/steve/.minecraft` |"));
        assert!(doc.contains("| Backup Duration | 3.5 seconds |"));
        assert!(doc.contains("| Total Backup Size | 2.0 KB |"));
        assert!(doc.contains("| Total Files Copied | 5 files |"));
        assert!(doc.contains("| Mods | 2 mods (1.5 KB total) |"));
        assert!(doc.contains("| Resource Packs | 3 packs |"));
        assert!(doc.contains("  - create.jar (1.0 KB)\n  - jei.jar (512.0 B)\n"));
        assert!(!doc.contains("Save Statistics"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let figures = sample_figures();
        let a = render(&BackupSelection::default(), &figures, &[]);
        let b = render(&BackupSelection::default(), &figures, &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_mods_found() {
        let figures = ManifestFigures::default();
        let doc = render(&BackupSelection::default(), &figures, &[]);
        assert!(doc.contains("- **Largest Mods:**\n  - None found\n"));
    }

    #[test]
    fn test_save_statistics_only_when_included() {
        let mut figures = sample_figures();
        figures.saves = Some(SaveFigures {
            world_count: 2,
            total_size: 3 * 1024 * 1024,
            largest: vec![EntrySize {
                name: "New World".to_string(),
                size: 2 * 1024 * 1024,
            }],
        });

        let without = render(&BackupSelection::default(), &figures, &[]);
        assert!(!without.contains("Save Statistics"));

        let selection = BackupSelection {
            include_saves: true,
            ..Default::default()
        };
        let with = render(&selection, &figures, &[]);
        assert!(with.contains("## 🌍 Save Statistics"));
        assert!(with.contains("- **World count:** 2 worlds"));
        assert!(with.contains("- **Total size:** 3.0 MB"));
        assert!(with.contains("  - New World (2.0 MB)"));
    }

    #[test]
    fn test_errors_replace_status() {
        let errors = vec!["saves: access denied".to_string(), "zip: disk full".to_string()];
        let doc = render(&BackupSelection::default(), &sample_figures(), &errors);

        assert!(doc.contains("## ⚠️ Errors\n\n- saves: access denied\n- zip: disk full\n"));
        assert!(!doc.contains("## ✅ Status"));
    }
}
