//! Project manifest (`arx.toml`) loading.

use std::fs;
use std::path::Path;

use arx_schema::{ANY_VERSION, ArtifactId, DependencySpec, GroupId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest load/parse failures.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    /// The manifest file is not valid TOML.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The `arx.toml` project manifest.
///
/// ```toml
/// [project]
/// name = "frontend"
/// version = "2.4.0"
///
/// [[dependencies]]
/// group = "com.example"
/// artifact = "core-lib"
/// version = "[1.0,2.0)"
/// ```
///
/// The `[[dependencies]]` array keeps its declaration order, which the
/// resolver and the derived classpath honor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Project metadata.
    pub project: Project,
    /// Ordered dependency declarations.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// The `[project]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Project version, the reference value for stamping and verification.
    pub version: String,
}

/// One `[[dependencies]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Reverse-DNS group id.
    pub group: String,
    /// Artifact id, matched literally against file names.
    pub artifact: String,
    /// Version constraint; omitted means any version is acceptable.
    #[serde(default)]
    pub version: Option<String>,
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The declared dependencies as resolver specs, in declaration order.
    pub fn dependency_specs(&self) -> Vec<DependencySpec> {
        self.dependencies.iter().map(Dependency::to_spec).collect()
    }
}

impl Dependency {
    fn to_spec(&self) -> DependencySpec {
        let constraint = self
            .version
            .clone()
            .unwrap_or_else(|| ANY_VERSION.to_string());
        DependencySpec::new(
            GroupId::new(self.group.as_str()),
            ArtifactId::new(self.artifact.as_str()),
            constraint,
        )
    }
}
