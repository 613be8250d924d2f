//! Catalog manifest types and parsing

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One framework entry of the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkEntry {
    /// Whether the framework ships template-expansion definitions.
    /// A framework without them exists but cannot be scaffolded.
    #[serde(default)]
    pub handlebars: bool,

    /// Templates available within this framework's namespace
    #[serde(default)]
    pub templates: Vec<String>,
}

/// Root catalog manifest (`catalog.yaml`)
/// Lists the supported frameworks and the templates scoped to each
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogManifest {
    /// Oldest CLI version the bundles were authored for
    #[serde(default)]
    pub min_cli_version: Option<String>,

    /// Framework name to entry. Ordered so listings are stable.
    #[serde(default)]
    pub frameworks: BTreeMap<String, FrameworkEntry>,
}

impl CatalogManifest {
    /// Parse a manifest from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Look up a framework entry
    pub fn framework(&self, name: &str) -> Option<&FrameworkEntry> {
        self.frameworks.get(name)
    }

    /// Names of all frameworks, sorted
    pub fn framework_names(&self) -> Vec<String> {
        self.frameworks.keys().cloned().collect()
    }

    /// Templates listed for a framework (empty when the framework is unknown)
    pub fn template_names(&self, framework: &str) -> Vec<String> {
        self.framework(framework)
            .map(|entry| entry.templates.clone())
            .unwrap_or_default()
    }
}
