//! Error types for the scaffolding pipeline
//!
//! `ScaffoldError` is what the pipeline hands back to its caller. The fetch and
//! render stages have their own error enums so the failing bundle or file can be
//! named precisely.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the core crate
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Everything that can stop a scaffolding run
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The requested framework is missing from the catalog, or has no
    /// template-expansion definitions
    #[error("Could not locate a framework named \"{framework}\"")]
    FrameworkNotFound {
        framework: String,
        available: Vec<String>,
    },

    /// The (alias-normalized) template does not exist for the framework
    #[error("Could not locate a template named \"{template}\" for framework \"{framework}\"")]
    TemplateNotFound {
        framework: String,
        template: String,
        available: Vec<String>,
    },

    /// The destination already holds files that would be clobbered
    #[error("The directory {app_name} contains files that could conflict")]
    DestinationNotEmpty {
        path: PathBuf,
        app_name: String,
        conflicts: Vec<String>,
    },

    /// The catalog manifest could not be retrieved or parsed
    #[error("Failed to load the framework catalog")]
    Catalog(#[source] FetchError),

    /// A framework or template bundle could not be fetched or extracted
    #[error("Failed to fetch bundle '{bundle}'")]
    Fetch {
        bundle: String,
        #[source]
        source: FetchError,
    },

    /// Placeholder expansion failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Dependency installation failed
    #[error(transparent)]
    Install(#[from] InstallError),

    /// A filesystem operation owned by the orchestrator failed
    #[error("Failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// A one-line hint the front end can print under the error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::FrameworkNotFound { available, .. } if !available.is_empty() => Some(format!(
                "Available frameworks: {}",
                available.join(", ")
            )),
            Self::TemplateNotFound {
                framework,
                available,
                ..
            } if !available.is_empty() => Some(format!(
                "Available templates for {}: {}",
                framework,
                available.join(", ")
            )),
            Self::DestinationNotEmpty { .. } => Some(
                "Either try using a new directory name, or remove the files listed above."
                    .to_string(),
            ),
            Self::Catalog(_) | Self::Fetch { .. } => {
                Some("Check your network connection or pass --template-dir".to_string())
            }
            _ => None,
        }
    }

    /// True for errors caused by what the user typed rather than by the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::FrameworkNotFound { .. }
                | Self::TemplateNotFound { .. }
                | Self::DestinationNotEmpty { .. }
        )
    }
}

/// Failure while retrieving or unpacking a bundle
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid bundle URL: {0}")]
    InvalidUrl(String),

    #[error("Request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bundle '{bundle}' is not a valid zip archive")]
    Archive {
        bundle: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive entry '{entry}' escapes the destination directory")]
    UnsafeEntry { entry: String },

    #[error("Bundle directory not found: {}", .0.display())]
    MissingBundle(PathBuf),

    #[error("Failed to parse catalog manifest")]
    Manifest(#[source] serde_yaml::Error),
}

/// Failure while expanding placeholders
#[derive(Debug, Error)]
pub enum RenderError {
    /// Rendering was attempted before `register_helpers`
    #[error("Template helpers must be registered before rendering")]
    HelpersNotRegistered,

    #[error("Malformed template expression in {}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("Failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while installing dependencies
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to start `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with code {code}")]
    Failed { command: String, code: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_not_found_lists_available() {
        let err = ScaffoldError::FrameworkNotFound {
            framework: "svelte".into(),
            available: vec!["react".into(), "vue".into()],
        };
        assert_eq!(
            err.to_string(),
            "Could not locate a framework named \"svelte\""
        );
        assert_eq!(
            err.suggestion().as_deref(),
            Some("Available frameworks: react, vue")
        );
        assert!(err.is_user_error());
    }

    #[test]
    fn template_not_found_names_framework() {
        let err = ScaffoldError::TemplateNotFound {
            framework: "vue".into(),
            template: "aave".into(),
            available: vec!["default".into()],
        };
        assert!(err.to_string().contains("\"aave\""));
        assert!(err.suggestion().unwrap().contains("vue: default"));
    }

    #[test]
    fn fetch_errors_are_not_user_errors() {
        let err = ScaffoldError::Fetch {
            bundle: "frameworks/react".into(),
            source: FetchError::Status {
                url: "https://example.com/frameworks/react.zip".into(),
                status: 404,
            },
        };
        assert!(!err.is_user_error());
        assert!(err.suggestion().is_some());
    }
}
