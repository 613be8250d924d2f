//! Environment collaborators used by the scaffolding pipeline
//!
//! This module provides:
//! - Registry connectivity probing
//! - Package manager selection
//! - Destination folder checks
//! - Dependency installation
//! - Git repository initialization
//!
//! Each concern is a trait with a default implementation that talks to the
//! real system, so tests can swap any of them out.

pub mod folder;
pub mod git;
pub mod install;
pub mod network;
pub mod package_manager;

pub use folder::{FolderGuard, HarmlessEntriesGuard};
pub use git::{GitCli, VersionControl};
pub use install::{CommandInstaller, Installer};
pub use network::{Connectivity, DnsConnectivity, StaticConnectivity};
pub use package_manager::{
    DetectPackageManager, FixedPackageManager, PackageManager, PackageManagerSelector,
};

/// The full set of collaborators handed to the orchestrator
pub struct Collaborators {
    pub connectivity: Box<dyn Connectivity>,
    pub package_manager: Box<dyn PackageManagerSelector>,
    pub folder: Box<dyn FolderGuard>,
    pub installer: Box<dyn Installer>,
    pub version_control: Box<dyn VersionControl>,
}

impl Collaborators {
    /// Implementations backed by the real network, filesystem and tools
    pub fn system(commit_message: impl Into<String>) -> Self {
        Self {
            connectivity: Box::new(DnsConnectivity::default()),
            package_manager: Box::new(DetectPackageManager),
            folder: Box::new(HarmlessEntriesGuard),
            installer: Box::new(CommandInstaller),
            version_control: Box::new(GitCli::new(commit_message)),
        }
    }
}
