//! Dependency installation

use super::package_manager::PackageManager;
use crate::error::InstallError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Installs the dependencies of a freshly scaffolded project
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(
        &self,
        root: &Path,
        manager: PackageManager,
        online: bool,
    ) -> Result<(), InstallError>;
}

/// Runs the package manager as a child process sharing the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandInstaller;

#[async_trait]
impl Installer for CommandInstaller {
    #[instrument(skip(self), fields(root = %root.display()))]
    async fn install(
        &self,
        root: &Path,
        manager: PackageManager,
        online: bool,
    ) -> Result<(), InstallError> {
        let args = manager.install_args(online);
        let command = format!("{} {}", manager.program(), args.join(" "));
        info!(%command, "installing dependencies");

        let status = Command::new(manager.program())
            .args(&args)
            .current_dir(root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| InstallError::Spawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::Failed {
                command,
                code: status.code().unwrap_or(-1),
            })
        }
    }
}
