//! Backup orchestration.
//!
//! [`BackupOrchestrator`] runs the pipeline against a resolved
//! [`InstallationLayout`]:
//!
//! 1. Validate the layout. Failure is fatal and nothing is written.
//! 2. Create `backup_<YYYY-MM-DD_HH-MM>` under the destination.
//! 3. Run each [`Category`] step in order, skipping missing sources and
//!    unselected optional categories.
//! 4. Render and write `info.md`.
//! 5. Optionally zip the bundle and remove the uncompressed folder.
//!
//! A failing step is recorded in the result's error log as
//! `"<category>: <cause>"` and the run carries on with the next step.

use crate::archive::archive_dir;
use crate::copy::{copy_file, copy_tree, list_entries, write_catalog};
use crate::error::{Error, Result};
use crate::inspect::{inspect, InstallationMetadata};
use crate::layout::{
    normalize_path, validate, InstallationLayout, DISTANT_HORIZONS_DIR, XAERO_DIR,
};
use crate::manifest::{
    render_manifest, write_manifest, ManifestContext, ManifestFigures, ManifestInput,
};
use crate::shaders::split_shaders;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What to include in a backup and what to do afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSelection {
    /// Zip the bundle and remove the uncompressed folder.
    pub compress: bool,
    pub include_saves: bool,
    /// Xaero's minimap / world map data.
    pub include_xaero: bool,
    /// Distant Horizons LOD data.
    pub include_distant_horizons: bool,
    /// Reveal the result in the system file browser. Not acted on by the library.
    pub open_when_done: bool,
}

impl Default for BackupSelection {
    fn default() -> Self {
        Self {
            compress: false,
            include_saves: false,
            include_xaero: false,
            include_distant_horizons: false,
            open_when_done: true,
        }
    }
}

/// One step of the copy/catalog sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Screenshots,
    Mods,
    Shaders,
    ResourcePacks,
    Options,
    Saves,
    Xaero,
    DistantHorizons,
    Manifest,
    Zip,
}

impl Category {
    /// Copy/catalog steps, in the order they run.
    pub const STEPS: [Category; 8] = [
        Category::Screenshots,
        Category::Mods,
        Category::Shaders,
        Category::ResourcePacks,
        Category::Options,
        Category::Saves,
        Category::Xaero,
        Category::DistantHorizons,
    ];

    /// Prefix used in error log entries.
    pub fn label(self) -> &'static str {
        match self {
            Category::Screenshots => "screenshots",
            Category::Mods => "mods",
            Category::Shaders => "shaders",
            Category::ResourcePacks => "resourcepacks",
            Category::Options => "options",
            Category::Saves => "saves",
            Category::Xaero => "xaero",
            Category::DistantHorizons => "distant_horizons",
            Category::Manifest => "manifest",
            Category::Zip => "zip",
        }
    }
}

/// Per-category counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatistics {
    pub screenshots_copied: usize,
    pub mods_listed: usize,
    pub shaders_listed: usize,
    pub shader_configs_copied: usize,
    pub resourcepacks_listed: usize,
    pub saves_copied: usize,
    pub xaero_copied: usize,
    pub distant_horizons_copied: usize,
    /// Files physically copied into the bundle. Catalogued names and
    /// `options.txt` are not counted.
    pub total_files_copied: usize,
}

impl RunStatistics {
    /// Merge a successful step's counts.
    pub fn record(&mut self, category: Category, outcome: &StepOutcome) {
        match category {
            Category::Screenshots => self.screenshots_copied = outcome.copied,
            Category::Mods => self.mods_listed = outcome.listed,
            Category::Shaders => {
                self.shaders_listed = outcome.listed;
                self.shader_configs_copied = outcome.copied;
            }
            Category::ResourcePacks => self.resourcepacks_listed = outcome.listed,
            Category::Saves => self.saves_copied = outcome.copied,
            Category::Xaero => self.xaero_copied = outcome.copied,
            Category::DistantHorizons => self.distant_horizons_copied = outcome.copied,
            Category::Options | Category::Manifest | Category::Zip => return,
        }
        self.total_files_copied += outcome.copied;
    }
}

/// What a single step produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Names written to a catalog.
    pub listed: usize,
    /// Files copied into the bundle.
    pub copied: usize,
    /// Set when the step failed; counts are then ignored.
    pub error: Option<String>,
}

impl StepOutcome {
    fn listed(listed: usize) -> Self {
        Self {
            listed,
            ..Default::default()
        }
    }

    fn copied(copied: usize) -> Self {
        Self {
            copied,
            ..Default::default()
        }
    }

    fn failed(category: Category, error: &Error) -> Self {
        Self {
            error: Some(format!("{}: {}", category.label(), error)),
            ..Default::default()
        }
    }
}

/// Final record of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupResult {
    /// `true` only when the error log is empty.
    pub success: bool,
    /// The bundle directory, or the archive when compression succeeded.
    pub output_path: Utf8PathBuf,
    pub archived: bool,
    pub total_files: usize,
    pub stats: RunStatistics,
    pub errors: Vec<String>,
    pub duration: Duration,
    pub metadata: InstallationMetadata,
}

impl BackupResult {
    /// The location to show in a file browser once the run is done.
    pub fn reveal_path(&self) -> &Utf8Path {
        if self.archived {
            self.output_path.parent().unwrap_or(&self.output_path)
        } else {
            &self.output_path
        }
    }
}

/// Stages reported through [`BackupOrchestrator::with_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BackupStage {
    /// Validating the installation and creating the output folder.
    Preparing,
    Step(Category),
    Complete,
}

/// A progress notification. Purely informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupProgress {
    pub stage: BackupStage,
    /// Set once a step has finished, with the number of entries it handled.
    pub finished: Option<usize>,
    /// The bundle folder, known once preparation is done.
    pub output_dir: Option<Utf8PathBuf>,
}

type ProgressCallback = Arc<dyn Fn(BackupProgress) + Send + Sync>;

/// Runs a backup of one installation into a destination folder.
///
/// Construct with [`new`](Self::new) or [`from_raw`](Self::from_raw),
/// optionally attach a progress callback, then call [`run`](Self::run).
pub struct BackupOrchestrator {
    layout: InstallationLayout,
    destination: Utf8PathBuf,
    selection: BackupSelection,
    context: Option<ManifestContext>,
    progress_callback: Option<ProgressCallback>,
}

impl BackupOrchestrator {
    pub fn new(
        layout: InstallationLayout,
        destination: impl Into<Utf8PathBuf>,
        selection: BackupSelection,
    ) -> Self {
        Self {
            layout,
            destination: destination.into(),
            selection,
            context: None,
            progress_callback: None,
        }
    }

    /// Build from user-typed paths, normalizing both.
    pub fn from_raw(raw_root: &str, raw_destination: &str, selection: BackupSelection) -> Self {
        Self::new(
            InstallationLayout::from_raw(raw_root),
            normalize_path(raw_destination),
            selection,
        )
    }

    /// Register a progress callback.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(BackupProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Use a fixed manifest context instead of the current time and host.
    pub fn with_manifest_context(mut self, context: ManifestContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn layout(&self) -> &InstallationLayout {
        &self.layout
    }

    pub fn selection(&self) -> &BackupSelection {
        &self.selection
    }

    /// Run the backup.
    ///
    /// Returns `Err` only for fatal conditions (see [`Error`]); step failures
    /// are reported through [`BackupResult::errors`].
    pub fn run(&self) -> Result<BackupResult> {
        let start = Instant::now();
        self.emit(BackupStage::Preparing, None, None);

        tracing::info!("Backing up {}", self.layout.root());
        self.check_installation()?;
        let metadata = inspect(self.layout.root());
        tracing::info!(
            "Detected Minecraft {} with {}",
            metadata.version,
            metadata.loader_display()
        );

        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M").to_string();
        let output_dir = create_output_dir(&self.destination, &timestamp)?;
        tracing::info!("Writing backup to {}", output_dir);
        self.emit(BackupStage::Preparing, None, Some(output_dir.clone()));

        let mut stats = RunStatistics::default();
        let mut errors = Vec::new();

        for category in Category::STEPS {
            if !self.is_selected(category) {
                tracing::debug!("Skipping {} (not selected)", category.label());
                continue;
            }
            let Some(source) = self.source_for(category) else {
                continue;
            };
            if !source.exists() {
                tracing::debug!("Skipping {} ({} not found)", category.label(), source);
                continue;
            }

            self.emit(BackupStage::Step(category), None, None);
            let outcome = self.run_step(category, source, &output_dir);
            match outcome.error {
                Some(error) => {
                    tracing::warn!("{}", error);
                    errors.push(error);
                }
                None => {
                    stats.record(category, &outcome);
                    self.emit(
                        BackupStage::Step(category),
                        Some(outcome.listed + outcome.copied),
                        None,
                    );
                }
            }
        }

        let duration = start.elapsed();

        self.emit(BackupStage::Step(Category::Manifest), None, None);
        let context = self.context.clone().unwrap_or_else(ManifestContext::current);
        let figures = ManifestFigures::collect(&self.layout, &self.selection, &output_dir);
        let manifest = render_manifest(&ManifestInput {
            selection: &self.selection,
            layout: &self.layout,
            stats: &stats,
            metadata: &metadata,
            errors: &errors,
            duration,
            figures: &figures,
            context: &context,
        });
        if let Err(e) = write_manifest(&output_dir, &manifest) {
            let error = StepOutcome::failed(Category::Manifest, &e).error;
            errors.extend(error);
        }

        let mut output_path = output_dir.clone();
        let mut archived = false;
        if self.selection.compress {
            self.emit(BackupStage::Step(Category::Zip), None, None);
            let zip_path = archive_path(&output_dir);
            match archive_dir(&output_dir, &zip_path) {
                Ok(count) => {
                    self.emit(BackupStage::Step(Category::Zip), Some(count), None);
                    output_path = zip_path;
                    archived = true;
                    // The archive stands even if the folder cannot be removed.
                    if let Err(e) = fs::remove_dir_all(&output_dir) {
                        tracing::warn!("Could not remove {} after zipping: {}", output_dir, e);
                        errors.push(format!(
                            "{}: could not remove {}: {}",
                            Category::Zip.label(),
                            output_dir,
                            e
                        ));
                    }
                }
                Err(e) => {
                    let _ = fs::remove_file(&zip_path);
                    let error = StepOutcome::failed(Category::Zip, &e).error;
                    tracing::warn!("Compression failed, keeping {}: {}", output_dir, e);
                    errors.extend(error);
                }
            }
        }

        let result = BackupResult {
            success: errors.is_empty(),
            output_path,
            archived,
            total_files: stats.total_files_copied,
            stats,
            errors,
            duration,
            metadata,
        };

        tracing::info!(
            "Backup finished in {:?}: {} files, {} errors",
            start.elapsed(),
            result.total_files,
            result.errors.len()
        );
        self.emit(BackupStage::Complete, None, None);

        Ok(result)
    }

    fn check_installation(&self) -> Result<()> {
        let validation = validate(&self.layout);
        if validation.valid {
            return Ok(());
        }

        let root = self.layout.root().to_path_buf();
        if !root.exists() {
            return Err(Error::RootNotFound(root));
        }
        Err(Error::NotAnInstallation {
            root,
            reason: validation.errors.join("; "),
        })
    }

    fn is_selected(&self, category: Category) -> bool {
        match category {
            Category::Saves => self.selection.include_saves,
            Category::Xaero => self.selection.include_xaero,
            Category::DistantHorizons => self.selection.include_distant_horizons,
            _ => true,
        }
    }

    fn source_for(&self, category: Category) -> Option<&Utf8Path> {
        let layout = &self.layout;
        Some(match category {
            Category::Screenshots => layout.screenshots(),
            Category::Mods => layout.mods(),
            Category::Shaders => layout.shaderpacks(),
            Category::ResourcePacks => layout.resourcepacks(),
            Category::Options => layout.options(),
            Category::Saves => layout.saves(),
            Category::Xaero => layout.xaero(),
            Category::DistantHorizons => layout.distant_horizons(),
            Category::Manifest | Category::Zip => return None,
        })
    }

    fn run_step(
        &self,
        category: Category,
        source: &Utf8Path,
        output_dir: &Utf8Path,
    ) -> StepOutcome {
        let result = match category {
            Category::Screenshots => {
                copy_tree(source, &output_dir.join("screenshots")).map(StepOutcome::copied)
            }
            Category::Mods => catalog(source, &output_dir.join("mods.txt")),
            Category::Shaders => split_shaders(source, output_dir).and_then(|split| {
                write_catalog(
                    &output_dir.join("shaders.txt"),
                    split.packs.iter().map(String::as_str),
                )?;
                Ok(StepOutcome {
                    listed: split.packs.len(),
                    copied: split.configs_copied,
                    error: None,
                })
            }),
            Category::ResourcePacks => catalog(source, &output_dir.join("resourcepacks.txt")),
            Category::Options => {
                copy_file(source, &output_dir.join("options.txt")).map(|_| StepOutcome::default())
            }
            Category::Saves => {
                copy_tree(source, &output_dir.join("saves")).map(StepOutcome::copied)
            }
            Category::Xaero => {
                copy_tree(source, &output_dir.join(XAERO_DIR)).map(StepOutcome::copied)
            }
            Category::DistantHorizons => {
                copy_tree(source, &output_dir.join(DISTANT_HORIZONS_DIR)).map(StepOutcome::copied)
            }
            Category::Manifest | Category::Zip => Ok(StepOutcome::default()),
        };

        match result {
            Ok(outcome) => {
                tracing::info!(
                    "{}: {} listed, {} copied",
                    category.label(),
                    outcome.listed,
                    outcome.copied
                );
                outcome
            }
            Err(e) => StepOutcome::failed(category, &e),
        }
    }

    fn emit(&self, stage: BackupStage, finished: Option<usize>, output_dir: Option<Utf8PathBuf>) {
        if let Some(callback) = &self.progress_callback {
            callback(BackupProgress {
                stage,
                finished,
                output_dir,
            });
        }
    }
}

fn catalog(source: &Utf8Path, catalog_path: &Utf8Path) -> Result<StepOutcome> {
    let listing = list_entries(source)?;
    write_catalog(catalog_path, listing.names())?;
    Ok(StepOutcome::listed(listing.len()))
}

fn archive_path(output_dir: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}.zip", output_dir))
}

/// Create `backup_<timestamp>` under `destination`, adding `_2`, `_3`, ... when
/// that name (or its `.zip`) is already taken.
fn create_output_dir(destination: &Utf8Path, timestamp: &str) -> Result<Utf8PathBuf> {
    fs::create_dir_all(destination).map_err(|source| Error::OutputDir {
        path: destination.to_path_buf(),
        source,
    })?;

    let base = format!("backup_{}", timestamp);
    let mut candidate = destination.join(&base);
    let mut suffix = 2;
    while candidate.exists() || archive_path(&candidate).exists() {
        candidate = destination.join(format!("{}_{}", base, suffix));
        suffix += 1;
    }

    fs::create_dir(&candidate).map_err(|source| Error::OutputDir {
        path: candidate.clone(),
        source,
    })?;
    Ok(candidate)
}
