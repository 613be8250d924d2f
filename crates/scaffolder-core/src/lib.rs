//! Scaffolder Core - Shared library for scaffolding Ethereum-powered apps
//!
//! A project is assembled from a framework bundle and a template bundle listed
//! in a catalog, expanded through Handlebars, then handed to the package
//! manager and git.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - catalog checks, bundle fetching/extraction,
//!   template rendering, environment collaborators (`runtime`)
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` and the staged
//!   `pipeline::Orchestrator`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based front end (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based terminal front end
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::archive::ArchiveFetcher;
//! use scaffolder_core::pipeline::{Orchestrator, ScaffoldRequest};
//! use scaffolder_core::runtime::Collaborators;
//!
//! let fetcher = ArchiveFetcher::from_local("bundles", "my-cli");
//! let mut orchestrator = Orchestrator::new(fetcher, Collaborators::system("Initial commit"));
//! let outcome = orchestrator
//!     .run(ScaffoldRequest::new("my-app").with_template("uniswap"), &mut ())
//!     .await?;
//! println!("cd {}", outcome.report.cd_path);
//! ```

pub mod archive;
pub mod catalog;
pub mod error;
pub mod pipeline;
pub mod product;
pub mod render;
pub mod runtime;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use archive::{ArchiveFetcher, BundleId, BundleSource};
pub use catalog::{CatalogManifest, CatalogResolver};
pub use error::{FetchError, InstallError, RenderError, ScaffoldError, ScaffoldResult};
pub use pipeline::{Orchestrator, ScaffoldOptions, ScaffoldOutcome, ScaffoldRequest};
pub use product::ProductConfig;
pub use render::{RenderContext, TemplateEngine};

#[cfg(feature = "tui")]
pub use tui::run;
