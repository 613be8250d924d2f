//! Destination emptiness check

use std::path::Path;

/// Entries that may already sit in a fresh project directory
const HARMLESS_ENTRIES: &[&str] = &[
    ".DS_Store",
    ".git",
    ".gitattributes",
    ".gitignore",
    ".gitlab-ci.yml",
    ".hg",
    ".hgcheck",
    ".hgignore",
    ".idea",
    ".npmignore",
    ".travis.yml",
    "LICENSE",
    "Thumbs.db",
    "docs",
    "mkdocs.yml",
    "npm-debug.log",
    "yarn-debug.log",
    "yarn-error.log",
];

/// Decides whether a directory can receive a new project
pub trait FolderGuard: Send + Sync {
    /// Entries of `root` that extraction could clobber, sorted
    fn conflicts(&self, root: &Path) -> std::io::Result<Vec<String>>;

    fn is_folder_empty(&self, root: &Path) -> std::io::Result<bool> {
        Ok(self.conflicts(root)?.is_empty())
    }
}

/// Tolerates VCS metadata, licenses, editor and log files
#[derive(Debug, Default, Clone, Copy)]
pub struct HarmlessEntriesGuard;

impl HarmlessEntriesGuard {
    fn is_harmless(name: &str) -> bool {
        // IntelliJ module files
        HARMLESS_ENTRIES.contains(&name) || name.ends_with(".iml")
    }
}

impl FolderGuard for HarmlessEntriesGuard {
    fn conflicts(&self, root: &Path) -> std::io::Result<Vec<String>> {
        let mut conflicts = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if !Self::is_harmless(&name) {
                conflicts.push(name);
            }
        }
        conflicts.sort();
        Ok(conflicts)
    }
}
