//! In-place placeholder expansion over an extracted tree

use super::context::RenderContext;
use super::helpers;
use crate::error::RenderError;
use handlebars::Handlebars;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Marker a file must contain to be treated as a template
const PLACEHOLDER_OPEN: &str = "{{";

/// Handlebars registry used for one scaffolding run
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    registered: bool,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    /// Engine with helpers already registered
    pub fn new() -> Self {
        let mut engine = Self::unregistered();
        engine.register_helpers();
        engine
    }

    /// Engine without helpers; rendering fails until `register_helpers` runs
    pub fn unregistered() -> Self {
        let mut handlebars = Handlebars::new();

        // Bundles hold source code, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        // Unknown bindings are errors rather than empty strings
        handlebars.set_strict_mode(true);

        Self {
            handlebars,
            registered: false,
        }
    }

    /// Install the helper set. Calling it again is a no-op.
    pub fn register_helpers(&mut self) {
        if self.registered {
            return;
        }
        helpers::register_all(&mut self.handlebars);
        self.registered = true;
        debug!(helpers = ?helpers::HELPER_NAMES, "template helpers registered");
    }

    pub fn helpers_registered(&self) -> bool {
        self.registered
    }

    /// Render a single template string; `path` only names it in errors
    pub fn render_str(
        &self,
        template: &str,
        context: &RenderContext,
        path: &Path,
    ) -> Result<String, RenderError> {
        if !self.registered {
            return Err(RenderError::HelpersNotRegistered);
        }
        self.handlebars
            .render_template(template, context)
            .map_err(|source| RenderError::Template {
                path: path.to_path_buf(),
                source: Box::new(source),
            })
    }

    /// Expand placeholders in every file below `root`, rewriting in place
    ///
    /// Only valid UTF-8 files containing `{{` are touched. Returns the paths
    /// (relative to `root`) that were rendered. Stops at the first failure.
    #[instrument(skip(self, context), fields(root = %root.display()))]
    pub fn render_tree(
        &self,
        root: &Path,
        context: &RenderContext,
    ) -> Result<Vec<PathBuf>, RenderError> {
        if !self.registered {
            return Err(RenderError::HelpersNotRegistered);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| RenderError::Io {
                action: "walk",
                path: root.to_path_buf(),
                source: e.into(),
            })?;
            if entry.file_type().is_file() {
                let path = entry.path();
                files.push(path.strip_prefix(root).unwrap_or(path).to_path_buf());
            }
        }

        self.render_paths(root, &files, context)
    }

    /// Expand placeholders in the given files only, relative to `root`
    ///
    /// Anything below `root` that is not listed is left alone. Duplicates are
    /// rendered once, in path order.
    #[instrument(skip(self, paths, context), fields(root = %root.display(), files = paths.len()))]
    pub fn render_paths(
        &self,
        root: &Path,
        paths: &[PathBuf],
        context: &RenderContext,
    ) -> Result<Vec<PathBuf>, RenderError> {
        if !self.registered {
            return Err(RenderError::HelpersNotRegistered);
        }

        let unique: BTreeSet<&PathBuf> = paths.iter().collect();
        let mut rendered = Vec::new();
        for relative in unique {
            let path = root.join(relative);
            let bytes = std::fs::read(&path).map_err(|source| RenderError::Io {
                action: "read",
                path: path.clone(),
                source,
            })?;

            // Binary content and plain files stay byte for byte
            let Ok(content) = String::from_utf8(bytes) else {
                continue;
            };
            if !content.contains(PLACEHOLDER_OPEN) {
                continue;
            }

            let output = self.render_str(&content, context, relative)?;
            std::fs::write(&path, output).map_err(|source| RenderError::Io {
                action: "write",
                path: path.clone(),
                source,
            })?;

            debug!(path = %relative.display(), "rendered");
            rendered.push(relative.clone());
        }

        Ok(rendered)
    }
}
