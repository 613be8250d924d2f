//! Package manager selection

use std::fmt;
use std::process::Command;
use tracing::debug;

/// The two JavaScript package managers bundles are written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Yarn,
    Npm,
}

impl PackageManager {
    pub fn display_name(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    /// Executable used for installation
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarnpkg",
            PackageManager::Npm => "npm",
        }
    }

    /// Arguments of the install command
    ///
    /// Yarn falls back to its offline mirror when the registry is unreachable;
    /// npm has no equivalent and is always run online.
    pub fn install_args(&self, online: bool) -> Vec<&'static str> {
        match self {
            PackageManager::Yarn if online => vec!["install"],
            PackageManager::Yarn => vec!["install", "--offline"],
            PackageManager::Npm => vec!["install", "--loglevel", "error"],
        }
    }

    /// How a user runs a `package.json` script, e.g. `yarn react-app:start`
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Yarn => format!("yarn {}", script),
            PackageManager::Npm => format!("npm run {}", script),
        }
    }

    /// Manager implied by `npm_config_user_agent`, when it names one
    pub fn from_user_agent(user_agent: &str) -> Option<Self> {
        if user_agent.starts_with("yarn") {
            Some(PackageManager::Yarn)
        } else if user_agent.starts_with("npm") {
            Some(PackageManager::Npm)
        } else {
            None
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Chooses the package manager for a run
pub trait PackageManagerSelector: Send + Sync {
    fn select(&self) -> PackageManager;
}

/// Prefers yarn when the CLI was launched through it or it is installed
#[derive(Debug, Default, Clone, Copy)]
pub struct DetectPackageManager;

impl DetectPackageManager {
    fn yarn_installed() -> bool {
        Command::new("yarnpkg")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }
}

impl PackageManagerSelector for DetectPackageManager {
    fn select(&self) -> PackageManager {
        if let Some(manager) = std::env::var("npm_config_user_agent")
            .ok()
            .as_deref()
            .and_then(PackageManager::from_user_agent)
        {
            debug!(%manager, "package manager from user agent");
            return manager;
        }

        let manager = if Self::yarn_installed() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        };
        debug!(%manager, "package manager detected");
        manager
    }
}

/// Always answers with the same manager
#[derive(Debug, Clone, Copy)]
pub struct FixedPackageManager(pub PackageManager);

impl PackageManagerSelector for FixedPackageManager {
    fn select(&self) -> PackageManager {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_args() {
        assert_eq!(PackageManager::Yarn.install_args(true), vec!["install"]);
        assert_eq!(
            PackageManager::Yarn.install_args(false),
            vec!["install", "--offline"]
        );
        assert_eq!(
            PackageManager::Npm.install_args(false),
            vec!["install", "--loglevel", "error"]
        );
    }

    #[test]
    fn test_run_script() {
        assert_eq!(
            PackageManager::Yarn.run_script("react-app:start"),
            "yarn react-app:start"
        );
        assert_eq!(
            PackageManager::Npm.run_script("react-app:start"),
            "npm run react-app:start"
        );
    }

    #[test]
    fn test_from_user_agent() {
        assert_eq!(
            PackageManager::from_user_agent("yarn/1.22.19 npm/? node/v20.11.0 linux x64"),
            Some(PackageManager::Yarn)
        );
        assert_eq!(
            PackageManager::from_user_agent("npm/10.2.4 node/v20.11.0 linux x64"),
            Some(PackageManager::Npm)
        );
        assert_eq!(PackageManager::from_user_agent("pnpm/8.0.0"), None);
    }
}
