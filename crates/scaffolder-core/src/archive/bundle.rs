//! Bundle identifiers

use std::fmt;

/// Names one framework or template bundle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BundleId {
    /// Base tree of a framework
    Framework(String),
    /// Overlay tree of a template, scoped to its framework
    Template { framework: String, template: String },
}

impl BundleId {
    pub fn framework(framework: impl Into<String>) -> Self {
        Self::Framework(framework.into())
    }

    pub fn template(framework: impl Into<String>, template: impl Into<String>) -> Self {
        Self::Template {
            framework: framework.into(),
            template: template.into(),
        }
    }

    /// Path segments below the catalog root, without extension
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Framework(framework) => vec!["frameworks", framework],
            Self::Template {
                framework,
                template,
            } => vec!["templates", framework, template],
        }
    }

    /// Last segment; zip entries are stored under `<name>/`
    pub fn name(&self) -> &str {
        match self {
            Self::Framework(framework) => framework,
            Self::Template { template, .. } => template,
        }
    }

    /// Relative path of the bundle's zip below the catalog root
    pub fn archive_path(&self) -> String {
        format!("{}.zip", self.segments().join("/"))
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}
