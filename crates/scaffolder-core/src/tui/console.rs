//! Pipeline progress rendered with cliclack

use crate::archive::BundleId;
use crate::catalog::DEFAULT_TEMPLATE;
use crate::pipeline::{PipelineEvent, PipelineObserver};
use crate::render::helpers::capitalize_first;
use crate::runtime::PackageManager;
use cliclack::ProgressBar;
use colored::Colorize;
use tracing::trace;

/// Turns pipeline events into spinners and log lines
#[derive(Default)]
pub struct ConsoleObserver {
    /// Spinner of the bundle currently being fetched
    spinner: Option<(ProgressBar, BundleId)>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&mut self, bundle: &BundleId) {
        self.stop(None);
        let spinner = cliclack::spinner();
        spinner.start(downloading_message(bundle));
        self.spinner = Some((spinner, bundle.clone()));
    }

    fn stop(&mut self, suffix: Option<String>) {
        if let Some((spinner, bundle)) = self.spinner.take() {
            match suffix {
                Some(suffix) => spinner.stop(format!("Fetched {}, {}", bundle, suffix)),
                None => spinner.stop(format!("Fetched {}", bundle)),
            }
        }
    }

    /// Mark a running spinner as failed; call when the run returned an error
    pub fn fail(&mut self) {
        if let Some((spinner, bundle)) = self.spinner.take() {
            spinner.error(format!("Failed while processing {}", bundle));
        }
    }
}

fn downloading_message(bundle: &BundleId) -> String {
    match bundle {
        BundleId::Framework(framework) => format!("Downloading {} framework files", framework),
        BundleId::Template { template, .. } if template == DEFAULT_TEMPLATE => {
            "Downloading template files. This might take a moment.".to_string()
        }
        BundleId::Template { template, .. } => format!(
            "Downloading files for template {}. This might take a moment.",
            template.cyan()
        ),
    }
}

impl PipelineObserver for ConsoleObserver {
    fn on_event(&mut self, event: &PipelineEvent) {
        // Console output is best effort; a closed terminal must not abort the run
        let _ = match event {
            PipelineEvent::StageEntered(stage) => {
                trace!(%stage, "stage entered");
                Ok(())
            }
            PipelineEvent::VersionWarning(warning) => {
                cliclack::log::warning(format!("Version warning: {}", warning))
            }
            PipelineEvent::Creating { framework, root } => cliclack::log::info(format!(
                "Creating a new Ethereum-powered {} app in {}.",
                capitalize_first(framework),
                root.display().to_string().green()
            )),
            PipelineEvent::Downloading(bundle) => {
                self.start(bundle);
                Ok(())
            }
            PipelineEvent::Rendered(count) => {
                self.stop(Some(format!("rendered {} file(s)", count)));
                Ok(())
            }
            PipelineEvent::WroteDefaultIgnore => {
                cliclack::log::info("Added a default .gitignore")
            }
            PipelineEvent::Installing { manager, online } => {
                self.stop(None);
                if !online && *manager == PackageManager::Yarn {
                    let _ = cliclack::log::warning(
                        "You appear to be offline. Falling back to the local Yarn cache.",
                    );
                }
                cliclack::log::info(format!(
                    "Installing packages with {}. This might take a couple of minutes.",
                    manager
                ))
            }
            PipelineEvent::Installed => cliclack::log::success("Packages installed"),
            PipelineEvent::InstallSkipped => cliclack::log::info("Skipping package installation"),
            PipelineEvent::GitInitialized => {
                cliclack::log::success("Initialized a git repository.")
            }
        };
    }
}
