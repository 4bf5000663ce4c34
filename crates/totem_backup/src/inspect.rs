//! Best-effort detection of the Minecraft version and mod loader.
//!
//! Detection combines independent [`MetadataSource`]s in a fixed precedence
//! order. Each source either produces a [`MetadataHint`] or `None`; nothing in
//! this module returns an error, and a source that cannot read or parse its
//! input simply reports no hint.
//!
//! Precedence (later sources override earlier ones field by field):
//!
//! 1. [`ModFilenameScan`]: loader name guessed from `mods/` file names.
//! 2. [`InstanceConfig`]: `IntendedVersion=` from a MultiMC/Prism `instance.cfg`.
//! 3. [`ComponentManifest`]: version and loader from a MultiMC/Prism `mmc-pack.json`.
//!
//! The two sidecar files live one directory above the installation root, next
//! to the instance's `minecraft/` (or `.minecraft/`) folder.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

/// Placeholder used for any field no source could determine.
pub const UNKNOWN: &str = "Unknown";

/// Detected installation metadata. Fields default to [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationMetadata {
    pub version: String,
    pub loader: String,
    pub loader_version: String,
}

impl Default for InstallationMetadata {
    fn default() -> Self {
        Self {
            version: UNKNOWN.to_string(),
            loader: UNKNOWN.to_string(),
            loader_version: UNKNOWN.to_string(),
        }
    }
}

impl InstallationMetadata {
    /// Loader name with its version in parentheses when known, e.g. `Fabric (0.15.11)`.
    pub fn loader_display(&self) -> String {
        if self.loader_version == UNKNOWN {
            self.loader.clone()
        } else {
            format!("{} ({})", self.loader, self.loader_version)
        }
    }

    fn apply(&mut self, hint: MetadataHint) {
        if let Some(version) = hint.version {
            self.version = version;
        }
        if let Some(loader) = hint.loader {
            self.loader = loader.name;
            if let Some(version) = loader.version {
                self.loader_version = version;
            }
        }
    }
}

/// A loader detected by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderHint {
    pub name: String,
    pub version: Option<String>,
}

/// What a single source found. `None` fields mean "no signal".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataHint {
    pub version: Option<String>,
    pub loader: Option<LoaderHint>,
}

/// One independent source of installation metadata.
pub trait MetadataSource {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Look for metadata for the installation at `root`.
    ///
    /// Returns `None` when the source's input is absent, unreadable or carries
    /// no usable signal.
    fn probe(&self, root: &Utf8Path) -> Option<MetadataHint>;
}

/// Guesses the loader from mod file names (`fabric-api-….jar` → Fabric).
pub struct ModFilenameScan;

/// Loader signatures matched case-insensitively against mod file names, in
/// priority order.
const LOADER_SIGNATURES: [(&str, &str); 3] =
    [("fabric", "Fabric"), ("forge", "Forge"), ("quilt", "Quilt")];

impl MetadataSource for ModFilenameScan {
    fn name(&self) -> &'static str {
        "mod filename scan"
    }

    fn probe(&self, root: &Utf8Path) -> Option<MetadataHint> {
        let mut names: Vec<String> = fs::read_dir(root.join("mods"))
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        // Byte order, so "Z…" comes before "a…"
        names.sort();

        names.iter().find_map(|name| {
            let name = name.to_lowercase();
            LOADER_SIGNATURES
                .iter()
                .find(|(needle, _)| name.contains(needle))
                .map(|(_, loader)| MetadataHint {
                    version: None,
                    loader: Some(LoaderHint {
                        name: loader.to_string(),
                        version: None,
                    }),
                })
        })
    }
}

/// Reads `IntendedVersion=` from a MultiMC/Prism `instance.cfg`.
pub struct InstanceConfig;

impl MetadataSource for InstanceConfig {
    fn name(&self) -> &'static str {
        "instance.cfg"
    }

    fn probe(&self, root: &Utf8Path) -> Option<MetadataHint> {
        let content = fs::read_to_string(sidecar_path(root, "instance.cfg")).ok()?;
        let version = parse_intended_version(&content)?;
        Some(MetadataHint {
            version: Some(version),
            loader: None,
        })
    }
}

fn parse_intended_version(content: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.trim_end_matches('\r').split_once('='))
        .filter(|(key, _)| key.trim() == "IntendedVersion")
        .map(|(_, value)| value.trim().to_string())
        .rfind(|value| !value.is_empty())
}

/// Reads components from a MultiMC/Prism `mmc-pack.json`.
pub struct ComponentManifest;

#[derive(Debug, Deserialize)]
struct MmcPack {
    #[serde(default)]
    components: Vec<MmcComponent>,
}

#[derive(Debug, Deserialize)]
struct MmcComponent {
    uid: String,
    #[serde(default)]
    version: Option<String>,
}

/// Component uids that identify a mod loader.
const LOADER_COMPONENTS: [(&str, &str); 4] = [
    ("net.fabricmc.fabric-loader", "Fabric"),
    ("net.minecraftforge", "Forge"),
    ("org.quiltmc.quilt-loader", "Quilt"),
    ("net.neoforged", "NeoForge"),
];

impl MetadataSource for ComponentManifest {
    fn name(&self) -> &'static str {
        "mmc-pack.json"
    }

    fn probe(&self, root: &Utf8Path) -> Option<MetadataHint> {
        let bytes = fs::read(sidecar_path(root, "mmc-pack.json")).ok()?;
        let pack: MmcPack = match serde_json::from_slice(&bytes) {
            Ok(pack) => pack,
            Err(e) => {
                tracing::warn!("Ignoring unparseable mmc-pack.json: {}", e);
                return None;
            }
        };
        let hint = hint_from_components(&pack.components);
        (hint != MetadataHint::default()).then_some(hint)
    }
}

fn hint_from_components(components: &[MmcComponent]) -> MetadataHint {
    let mut hint = MetadataHint::default();

    for component in components {
        if component.uid == "net.minecraft" {
            hint.version = component.version.clone();
            continue;
        }

        if let Some((_, loader)) = LOADER_COMPONENTS
            .iter()
            .find(|(uid, _)| *uid == component.uid)
        {
            hint.loader = Some(LoaderHint {
                name: loader.to_string(),
                version: component.version.clone(),
            });
        }
    }

    hint
}

fn sidecar_path(root: &Utf8Path, file_name: &str) -> Utf8PathBuf {
    root.join("..").join(file_name)
}

/// The built-in sources in precedence order.
pub fn default_sources() -> Vec<Box<dyn MetadataSource>> {
    vec![
        Box::new(ModFilenameScan),
        Box::new(InstanceConfig),
        Box::new(ComponentManifest),
    ]
}

/// Inspect the installation at `root` using [`default_sources`].
pub fn inspect(root: &Utf8Path) -> InstallationMetadata {
    inspect_with(root, &default_sources())
}

/// Inspect using an explicit list of sources, applied in order.
pub fn inspect_with(root: &Utf8Path, sources: &[Box<dyn MetadataSource>]) -> InstallationMetadata {
    let mut metadata = InstallationMetadata::default();

    for source in sources {
        match source.probe(root) {
            Some(hint) => {
                tracing::debug!("Metadata source '{}' found {:?}", source.name(), hint);
                metadata.apply(hint);
            }
            None => tracing::debug!("Metadata source '{}' found nothing", source.name()),
        }
    }

    metadata
}
