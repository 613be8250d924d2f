//! The fixed sequence of stages a scaffolding run walks through

use std::fmt;

/// Stages of a scaffolding run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    Validate,
    CreateRoot,
    CheckEmpty,
    DetectPackageManager,
    CheckOnline,
    FetchFramework,
    FetchTemplate,
    Render,
    WriteIgnoreDefault,
    Install,
    GitInit,
    Report,
    Done,
}

impl Stage {
    /// Every stage, first to last
    pub const ORDER: [Stage; 14] = [
        Stage::Init,
        Stage::Validate,
        Stage::CreateRoot,
        Stage::CheckEmpty,
        Stage::DetectPackageManager,
        Stage::CheckOnline,
        Stage::FetchFramework,
        Stage::FetchTemplate,
        Stage::Render,
        Stage::WriteIgnoreDefault,
        Stage::Install,
        Stage::GitInit,
        Stage::Report,
        Stage::Done,
    ];

    /// The only stage that may follow this one; `None` after `Done`
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Init => Some(Stage::Validate),
            Stage::Validate => Some(Stage::CreateRoot),
            Stage::CreateRoot => Some(Stage::CheckEmpty),
            Stage::CheckEmpty => Some(Stage::DetectPackageManager),
            Stage::DetectPackageManager => Some(Stage::CheckOnline),
            Stage::CheckOnline => Some(Stage::FetchFramework),
            Stage::FetchFramework => Some(Stage::FetchTemplate),
            Stage::FetchTemplate => Some(Stage::Render),
            Stage::Render => Some(Stage::WriteIgnoreDefault),
            Stage::WriteIgnoreDefault => Some(Stage::Install),
            Stage::Install => Some(Stage::GitInit),
            Stage::GitInit => Some(Stage::Report),
            Stage::Report => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Validate => "validate",
            Stage::CreateRoot => "create-root",
            Stage::CheckEmpty => "check-empty",
            Stage::DetectPackageManager => "detect-package-manager",
            Stage::CheckOnline => "check-online",
            Stage::FetchFramework => "fetch-framework",
            Stage::FetchTemplate => "fetch-template",
            Stage::Render => "render",
            Stage::WriteIgnoreDefault => "write-ignore-default",
            Stage::Install => "install",
            Stage::GitInit => "git-init",
            Stage::Report => "report",
            Stage::Done => "done",
        }
    }

    /// True for stages that may write below the project root
    pub fn mutates_root(self) -> bool {
        !matches!(self, Stage::Init | Stage::Validate | Stage::Done)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
