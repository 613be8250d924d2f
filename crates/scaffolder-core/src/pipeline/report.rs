//! Success report shown once a project has been scaffolded

use crate::runtime::PackageManager;
use std::path::{Path, PathBuf};

/// Scripts advertised for each well-known workspace package
const PACKAGE_SCRIPTS: &[(&str, &[(&str, &str)])] = &[
    (
        "react-app",
        &[
            ("react-app:start", "Starts the development server."),
            ("react-app:build", "Builds the app for production."),
        ],
    ),
    (
        "vue-app",
        &[
            ("vue-app:serve", "Starts the development server."),
            ("vue-app:build", "Builds the app for production."),
        ],
    ),
    (
        "subgraph",
        &[
            (
                "subgraph:codegen",
                "Generates AssemblyScript types for smart contract ABIs and the subgraph schema.",
            ),
            (
                "subgraph:deploy",
                "Deploys the subgraph to the official Graph Node.",
            ),
        ],
    ),
];

/// A command the user can run, with what it does
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHint {
    pub command: String,
    pub description: &'static str,
}

/// Hints for one package found under `packages/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageHints {
    pub package: &'static str,
    pub commands: Vec<CommandHint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub app_name: String,
    /// The path exactly as the user gave it
    pub app_path: String,
    pub root: PathBuf,
    /// What to `cd` into first
    pub cd_path: String,
    pub packages: Vec<PackageHints>,
    /// First command to run after `cd`, when a front end package exists
    pub suggested_command: Option<String>,
}

impl Report {
    /// Inspect the scaffolded tree and describe how to get started
    pub fn build(
        root: &Path,
        app_name: &str,
        app_path: &str,
        invocation_dir: &Path,
        manager: PackageManager,
    ) -> Self {
        let packages_dir = root.join("packages");
        let packages: Vec<PackageHints> = PACKAGE_SCRIPTS
            .iter()
            .filter(|(package, _)| packages_dir.join(package).exists())
            .map(|(package, scripts)| PackageHints {
                package: *package,
                commands: scripts
                    .iter()
                    .map(|(script, description)| CommandHint {
                        command: manager.run_script(script),
                        description: *description,
                    })
                    .collect(),
            })
            .collect();

        let has = |name: &str| packages.iter().any(|p| p.package == name);
        let suggested_command = if has("react-app") {
            Some(manager.run_script("react-app:start"))
        } else if has("vue-app") {
            Some(manager.run_script("vue-app:serve"))
        } else {
            None
        };

        let cd_path = if invocation_dir.join(app_name) == root {
            app_name.to_string()
        } else {
            app_path.to_string()
        };

        Self {
            app_name: app_name.to_string(),
            app_path: app_path.to_string(),
            root: root.to_path_buf(),
            cd_path,
            packages,
            suggested_command,
        }
    }

    /// All hints, flattened in display order
    pub fn hints(&self) -> impl Iterator<Item = &CommandHint> {
        self.packages.iter().flat_map(|p| p.commands.iter())
    }
}
