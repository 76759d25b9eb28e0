//! JSON manifests naming catalog plugins.

use super::{PluginCatalog, PluginSource};
use crate::plugins::Plugin;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// A manifest listing the plugins to enable.
///
/// ```json
/// { "name": "invoice-checks", "plugins": [ { "id": "TOTALS" }, { "id": "VAT", "enabled": false } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Manifest name.
    pub name: String,
    /// Listed plugins, in registration order.
    #[serde(default)]
    pub plugins: Vec<ManifestEntry>,
}

/// One plugin listed in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Catalog id of the plugin.
    pub id: String,
    /// Disabled entries are ignored.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl PluginManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plugins: Vec::new(),
        }
    }

    /// Adds an enabled entry.
    #[must_use]
    pub fn with_plugin(mut self, id: impl Into<String>) -> Self {
        self.plugins.push(ManifestEntry {
            id: id.into(),
            enabled: true,
        });
        self
    }

    /// Adds a disabled entry.
    #[must_use]
    pub fn with_disabled_plugin(mut self, id: impl Into<String>) -> Self {
        self.plugins.push(ManifestEntry {
            id: id.into(),
            enabled: false,
        });
        self
    }

    /// Parses a manifest from JSON.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid plugin manifest")
    }

    /// Reads and parses a manifest file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse manifest {}", path.display()))
    }

    /// Ids of the enabled entries, in manifest order.
    pub fn enabled_ids(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().filter(|e| e.enabled).map(|e| e.id.as_str())
    }

    /// Instantiates every enabled entry from `catalog`.
    ///
    /// Fails on the first id the catalog does not know.
    pub fn resolve(&self, catalog: &PluginCatalog) -> anyhow::Result<Vec<Arc<dyn Plugin>>> {
        self.enabled_ids()
            .map(|id| {
                catalog
                    .create(id)
                    .with_context(|| format!("unknown plugin id '{id}' in manifest '{}'", self.name))
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
enum ManifestLocation {
    Inline(PluginManifest),
    File(PathBuf),
}

/// A single manifest resolved against a catalog.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    location: ManifestLocation,
    catalog: Arc<PluginCatalog>,
}

impl ManifestSource {
    /// Uses an in-memory manifest.
    #[must_use]
    pub fn new(manifest: PluginManifest, catalog: Arc<PluginCatalog>) -> Self {
        Self {
            location: ManifestLocation::Inline(manifest),
            catalog,
        }
    }

    /// Reads the manifest from `path` on every load.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>, catalog: Arc<PluginCatalog>) -> Self {
        Self {
            location: ManifestLocation::File(path.into()),
            catalog,
        }
    }
}

impl PluginSource for ManifestSource {
    fn name(&self) -> String {
        match &self.location {
            ManifestLocation::Inline(manifest) => manifest.name.clone(),
            ManifestLocation::File(path) => path.display().to_string(),
        }
    }

    fn load(&self) -> anyhow::Result<Vec<Arc<dyn Plugin>>> {
        match &self.location {
            ManifestLocation::Inline(manifest) => manifest.resolve(&self.catalog),
            ManifestLocation::File(path) => PluginManifest::from_file(path)?.resolve(&self.catalog),
        }
    }
}

/// Every `*.json` manifest in a directory, resolved against a catalog.
///
/// Files are visited in file-name order; subdirectories are not searched.
/// A manifest that fails to read, parse or resolve is logged and skipped.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    catalog: Arc<PluginCatalog>,
}

impl DirectorySource {
    /// Creates a source scanning `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, catalog: Arc<PluginCatalog>) -> Self {
        Self {
            dir: dir.into(),
            catalog,
        }
    }

    fn manifest_paths(&self) -> anyhow::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read plugin directory {}", self.dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl PluginSource for DirectorySource {
    fn name(&self) -> String {
        self.dir.display().to_string()
    }

    fn load(&self) -> anyhow::Result<Vec<Arc<dyn Plugin>>> {
        let mut plugins = Vec::new();

        for path in self.manifest_paths()? {
            match PluginManifest::from_file(&path).and_then(|m| m.resolve(&self.catalog)) {
                Ok(loaded) => {
                    debug!(manifest = %path.display(), plugins = loaded.len(), "Loaded plugin manifest");
                    plugins.extend(loaded);
                }
                Err(e) => {
                    warn!(manifest = %path.display(), error = %format!("{e:#}"), "Skipping plugin manifest");
                }
            }
        }

        Ok(plugins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SuccessPlugin;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn catalog() -> Arc<PluginCatalog> {
        let mut catalog = PluginCatalog::new();
        for id in ["TOTALS", "VAT", "DATES"] {
            catalog.register(id, move || Arc::new(SuccessPlugin::new(id, &["INVOICE"])) as Arc<dyn Plugin>);
        }
        Arc::new(catalog)
    }

    fn ids(plugins: &[Arc<dyn Plugin>]) -> Vec<String> {
        plugins.iter().map(|p| p.id().to_string()).collect()
    }

    #[test]
    fn test_manifest_parsing_defaults_enabled() {
        let manifest = PluginManifest::from_json(
            r#"{"name": "checks", "plugins": [{"id": "TOTALS"}, {"id": "VAT", "enabled": false}]}"#,
        )
        .unwrap();

        assert_eq!(manifest.name, "checks");
        assert!(manifest.plugins[0].enabled);
        assert_eq!(manifest.enabled_ids().collect::<Vec<_>>(), vec!["TOTALS"]);
    }

    #[test]
    fn test_manifest_without_plugins() {
        let manifest = PluginManifest::from_json(r#"{"name": "empty"}"#).unwrap();
        assert!(manifest.plugins.is_empty());
        assert!(PluginManifest::from_json(r#"{"plugins": []}"#).is_err());
    }

    #[test]
    fn test_manifest_source_resolves_in_order() {
        let manifest = PluginManifest::new("checks")
            .with_plugin("VAT")
            .with_disabled_plugin("DATES")
            .with_plugin("TOTALS");
        let source = ManifestSource::new(manifest, catalog());

        assert_eq!(source.name(), "checks");
        assert_eq!(ids(&source.load().unwrap()), vec!["VAT", "TOTALS"]);
    }

    #[test]
    fn test_manifest_source_rejects_unknown_id() {
        let source = ManifestSource::new(PluginManifest::new("bad").with_plugin("NOPE"), catalog());
        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("unknown plugin id 'NOPE'"));
    }

    #[test]
    fn test_manifest_source_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("checks.json");
        std::fs::write(&path, r#"{"name": "checks", "plugins": [{"id": "DATES"}]}"#).unwrap();

        let source = ManifestSource::from_file(&path, catalog());
        assert_eq!(ids(&source.load().unwrap()), vec!["DATES"]);

        let missing = ManifestSource::from_file(dir.path().join("missing.json"), catalog());
        assert!(missing.load().is_err());
    }

    #[test]
    fn test_directory_source_skips_broken_manifests() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"name": "b", "plugins": [{"id": "VAT"}]}"#).unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"name": "a", "plugins": [{"id": "TOTALS"}]}"#).unwrap();
        std::fs::write(dir.path().join("c.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("d.json"), r#"{"name": "d", "plugins": [{"id": "NOPE"}]}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let source = DirectorySource::new(dir.path(), catalog());
        assert_eq!(ids(&source.load().unwrap()), vec!["TOTALS", "VAT"]);
    }

    #[test]
    fn test_directory_source_missing_directory() {
        let dir = TempDir::new().unwrap();
        let source = DirectorySource::new(dir.path().join("absent"), catalog());
        assert!(source.load().is_err());
    }

    #[test]
    fn test_directory_source_empty_directory() {
        let dir = TempDir::new().unwrap();
        let source = DirectorySource::new(dir.path(), catalog());
        assert!(source.load().unwrap().is_empty());
    }
}
