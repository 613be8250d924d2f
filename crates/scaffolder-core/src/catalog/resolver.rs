//! Existence checks against the catalog manifest

use super::manifest::CatalogManifest;
use super::version;
use crate::error::{ScaffoldError, ScaffoldResult};

/// Answers "does this framework/template exist" for one loaded catalog
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    manifest: CatalogManifest,
}

impl CatalogResolver {
    pub fn new(manifest: CatalogManifest) -> Self {
        Self { manifest }
    }

    pub fn manifest(&self) -> &CatalogManifest {
        &self.manifest
    }

    /// True iff the framework has a registered base bundle
    pub fn has_framework(&self, framework: &str) -> bool {
        self.manifest.framework(framework).is_some()
    }

    /// True iff the framework also declares template-expansion definitions
    pub fn has_framework_template_definitions(&self, framework: &str) -> bool {
        self.manifest
            .framework(framework)
            .is_some_and(|entry| entry.handlebars)
    }

    /// True iff the template exists within the framework's namespace
    pub fn has_template(&self, framework: &str, template: &str) -> bool {
        self.manifest
            .framework(framework)
            .is_some_and(|entry| entry.templates.iter().any(|t| t == template))
    }

    /// Fail with `FrameworkNotFound` unless both framework checks pass
    pub fn validate_framework(&self, framework: &str) -> ScaffoldResult<()> {
        if self.has_framework(framework) && self.has_framework_template_definitions(framework) {
            return Ok(());
        }
        Err(ScaffoldError::FrameworkNotFound {
            framework: framework.to_string(),
            available: self
                .manifest
                .frameworks
                .iter()
                .filter(|(_, entry)| entry.handlebars)
                .map(|(name, _)| name.clone())
                .collect(),
        })
    }

    /// Fail with `TemplateNotFound` unless the (already normalized) template exists
    pub fn validate_template(&self, framework: &str, template: &str) -> ScaffoldResult<()> {
        if self.has_template(framework, template) {
            return Ok(());
        }
        Err(ScaffoldError::TemplateNotFound {
            framework: framework.to_string(),
            template: template.to_string(),
            available: self.manifest.template_names(framework),
        })
    }

    /// Warning text when the catalog expects a newer CLI
    pub fn compatibility_warning(&self, cli_version: &str, upgrade_command: &str) -> Option<String> {
        let required = self.manifest.min_cli_version.as_deref()?;
        version::check_compatibility(cli_version, required, upgrade_command)
    }
}
