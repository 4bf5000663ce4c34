//! Point-in-time backups of a Minecraft installation's user data.
//!
//! Given a `.minecraft` folder (or a MultiMC/Prism instance's `minecraft/`
//! folder), this crate produces a timestamped bundle:
//!
//! - **Copied verbatim**: screenshots, `options.txt`, shader settings and,
//!   on request, saves, Xaero map data and Distant Horizons data
//! - **Catalogued by name**: mods, shader packs and resource packs, which are
//!   large and can be re-downloaded
//! - **Described**: an `info.md` manifest with installation metadata, sizes
//!   and restoration steps
//! - **Optionally zipped** into a single `.zip` next to where the folder was
//!
//! # Example
//!
//! ```no_run
//! use totem_backup::{BackupOrchestrator, BackupSelection};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let selection = BackupSelection {
//!     include_saves: true,
//!     compress: true,
//!     ..Default::default()
//! };
//!
//! let result = BackupOrchestrator::from_raw(
//!     "\"C:\\Users\\steve\\AppData\\Roaming\\.minecraft\"",
//!     "C:\\Users\\steve\\TotemBackups",
//!     selection,
//! )
//! .with_progress(|progress| println!("{:?}", progress.stage))
//! .run()?;
//!
//! println!("Backed up {} files to {}", result.total_files, result.output_path);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod backup;
pub mod copy;
pub mod error;
pub mod inspect;
pub mod layout;
pub mod manifest;
pub mod shaders;
pub mod stats;

// Re-export main types
pub use backup::{
    BackupOrchestrator, BackupProgress, BackupResult, BackupSelection, BackupStage, Category,
    RunStatistics, StepOutcome,
};
pub use error::{Error, Result};
pub use inspect::{inspect, InstallationMetadata, MetadataSource};
pub use layout::{normalize_path, validate, InstallationLayout, Validation};
