//! Progress notifications emitted while a run executes

use super::stage::Stage;
use crate::archive::BundleId;
use crate::runtime::PackageManager;
use std::path::PathBuf;

/// Something worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    StageEntered(Stage),
    /// The catalog was published for a newer CLI
    VersionWarning(String),
    /// Validation passed, the project is about to be written
    Creating { framework: String, root: PathBuf },
    Downloading(BundleId),
    /// Files rewritten by the template pass
    Rendered(usize),
    /// No `.gitignore` shipped with the bundles, the default one was written
    WroteDefaultIgnore,
    Installing { manager: PackageManager, online: bool },
    Installed,
    InstallSkipped,
    GitInitialized,
}

/// Receives every event of a run, in order
pub trait PipelineObserver {
    fn on_event(&mut self, event: &PipelineEvent);
}

/// Ignores everything
impl PipelineObserver for () {
    fn on_event(&mut self, _: &PipelineEvent) {}
}

/// Collects events, mainly for inspection after a run
impl PipelineObserver for Vec<PipelineEvent> {
    fn on_event(&mut self, event: &PipelineEvent) {
        self.push(event.clone());
    }
}
