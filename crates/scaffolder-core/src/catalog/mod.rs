//! Framework and template catalog
//!
//! This module provides:
//! - The catalog manifest (`catalog.yaml`) types
//! - Existence checks for frameworks and templates
//! - Template alias normalization
//! - CLI/catalog version compatibility checking

pub mod aliases;
pub mod manifest;
pub mod resolver;
pub mod version;

pub use aliases::normalize_template;
pub use manifest::{CatalogManifest, FrameworkEntry};
pub use resolver::CatalogResolver;
pub use version::check_compatibility;

/// Framework used when none is given
pub const DEFAULT_FRAMEWORK: &str = "react";

/// Template used when none is given
pub const DEFAULT_TEMPLATE: &str = "default";

/// File name of the catalog manifest at the catalog root
pub const CATALOG_FILE: &str = "catalog.yaml";
