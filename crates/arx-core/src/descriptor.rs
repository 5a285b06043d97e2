//! Product descriptor (`*.product.toml`) parsing.
//!
//! A product descriptor names the deployable product, its launcher, and
//! the plugins the bundle must carry. Plugins may be restricted to one
//! operating system with an `os` tag.

use std::fs;
use std::path::Path;

use arx_schema::{ArtifactId, DependencySpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Descriptor load/parse failures.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor file could not be read.
    #[error("failed to read product descriptor: {0}")]
    Io(#[from] std::io::Error),
    /// The descriptor file is not valid TOML.
    #[error("failed to parse product descriptor: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A parsed product descriptor.
///
/// ```toml
/// [product]
/// name = "console"
/// version = "2.4.0.qualifier"
/// launcher = "console"
///
/// [[plugins]]
/// id = "core-lib"
///
/// [[plugins]]
/// id = "native-io"
/// os = "linux"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDescriptor {
    /// The `[product]` table.
    pub product: Product,
    /// Declared plugins, possibly OS-restricted.
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

/// The `[product]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product name; the descriptor's plugin list may name it too, in
    /// which case that entry is ignored (the archive step builds it).
    pub name: String,
    /// Product version, possibly carrying a `.qualifier` placeholder.
    pub version: String,
    /// Launcher executable base name.
    pub launcher: String,
}

/// One `[[plugins]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plugin {
    /// Plugin id, the token resolved against the plugin repository.
    pub id: String,
    /// Restricts the plugin to one target OS; absent means every OS.
    #[serde(default)]
    pub os: Option<String>,
}

impl ProductDescriptor {
    /// Load and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The bundle version: the descriptor version with any `.qualifier`
    /// placeholder removed.
    pub fn bundle_version(&self) -> String {
        self.product.version.replace(".qualifier", "")
    }

    /// Plugin ids applicable to `target_os`, sorted and deduplicated.
    ///
    /// An entry naming the product itself is dropped: its bundle is not
    /// resolved from the repository but produced by the archive step.
    pub fn plugin_ids(&self, target_os: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .plugins
            .iter()
            .filter(|plugin| {
                plugin
                    .os
                    .as_deref()
                    .is_none_or(|os| os.eq_ignore_ascii_case(target_os))
            })
            .filter(|plugin| plugin.id != self.product.name)
            .map(|plugin| plugin.id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Applicable plugins as any-version dependency specs for the flat
    /// plugin repository.
    pub fn plugin_specs(&self, target_os: &str) -> Vec<DependencySpec> {
        self.plugin_ids(target_os)
            .into_iter()
            .map(|id| DependencySpec::ungrouped(ArtifactId::new(id)))
            .collect()
    }
}
