//! Bundle retrieval and extraction
//!
//! This module provides:
//! - Bundle identifiers and their catalog-relative paths
//! - Fetching from a remote catalog or a local bundle directory
//! - Zip extraction with overlay semantics
//! - Packing a local bundle directory into the remote layout

pub mod bundle;
pub mod extract;
pub mod fetcher;
pub mod pack;

pub use bundle::BundleId;
pub use fetcher::{ArchiveFetcher, BundleSource};
pub use pack::{pack_bundles, PackSummary, PackedBundle};
