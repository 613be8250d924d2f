//! The scaffolding state machine
//!
//! A run walks every [`Stage`] in order. Each stage either completes or
//! returns an error that ends the run; there is no retry and no rollback.

use super::event::{PipelineEvent, PipelineObserver};
use super::report::Report;
use super::stage::Stage;
use crate::archive::{ArchiveFetcher, BundleId};
use crate::catalog::{normalize_template, CatalogResolver, DEFAULT_FRAMEWORK, DEFAULT_TEMPLATE};
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::render::{RenderContext, TemplateEngine};
use crate::runtime::{Collaborators, PackageManager};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Written when the bundles do not provide their own `.gitignore`
pub const DEFAULT_GITIGNORE: &str = include_str!("../../assets/gitignore");

const IGNORE_FILE: &str = ".gitignore";

/// Switches for the optional tail of the pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub skip_install: bool,
    pub skip_git: bool,
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub app_path: PathBuf,
    pub framework: Option<String>,
    pub template: Option<String>,
}

impl ScaffoldRequest {
    pub fn new(app_path: impl Into<PathBuf>) -> Self {
        Self {
            app_path: app_path.into(),
            framework: None,
            template: None,
        }
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    pub root: PathBuf,
    pub app_name: String,
    pub framework: String,
    pub template: String,
    pub package_manager: PackageManager,
    pub online: bool,
    /// Paths rewritten by the template pass, relative to `root`
    pub rendered: Vec<PathBuf>,
    pub installed: bool,
    pub git_initialized: bool,
    pub report: Report,
}

/// Mutable state threaded through the stages of one run
struct RunState {
    request: ScaffoldRequest,
    invocation_dir: PathBuf,
    root: PathBuf,
    app_name: String,
    framework: String,
    template: String,
    // replaced at DetectPackageManager
    package_manager: PackageManager,
    online: bool,
    /// Files written by the framework and template bundles, relative to `root`
    extracted: Vec<PathBuf>,
    rendered: Vec<PathBuf>,
    installed: bool,
    git_initialized: bool,
    report: Option<Report>,
}

impl RunState {
    fn new(request: ScaffoldRequest, invocation_dir: PathBuf) -> Self {
        Self {
            request,
            invocation_dir,
            root: PathBuf::new(),
            app_name: String::new(),
            framework: DEFAULT_FRAMEWORK.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            package_manager: PackageManager::Npm,
            online: false,
            extracted: Vec::new(),
            rendered: Vec::new(),
            installed: false,
            git_initialized: false,
            report: None,
        }
    }

    fn into_outcome(self) -> ScaffoldResult<ScaffoldOutcome> {
        let report = self.report.ok_or_else(|| {
            ScaffoldError::io(
                "report on",
                &self.root,
                std::io::Error::other("pipeline ended before the report stage"),
            )
        })?;
        Ok(ScaffoldOutcome {
            root: self.root,
            app_name: self.app_name,
            framework: self.framework,
            template: self.template,
            package_manager: self.package_manager,
            online: self.online,
            rendered: self.rendered,
            installed: self.installed,
            git_initialized: self.git_initialized,
            report,
        })
    }
}

/// Resolve `..` and `.` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Absolute project root for `app_path` as typed from `invocation_dir`
pub fn resolve_root(app_path: &Path, invocation_dir: &Path) -> PathBuf {
    if app_path.is_absolute() {
        normalize(app_path)
    } else {
        normalize(&invocation_dir.join(app_path))
    }
}

/// Drives one scaffolding run from validation to the success report
pub struct Orchestrator {
    fetcher: ArchiveFetcher,
    engine: TemplateEngine,
    collaborators: Collaborators,
    options: ScaffoldOptions,
    invocation_dir: Option<PathBuf>,
    version_check: Option<(String, String)>,
}

impl Orchestrator {
    pub fn new(fetcher: ArchiveFetcher, collaborators: Collaborators) -> Self {
        Self {
            fetcher,
            engine: TemplateEngine::new(),
            collaborators,
            options: ScaffoldOptions::default(),
            invocation_dir: None,
            version_check: None,
        }
    }

    pub fn with_options(mut self, options: ScaffoldOptions) -> Self {
        self.options = options;
        self
    }

    /// Directory relative app paths are resolved against (default: cwd)
    pub fn with_invocation_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.invocation_dir = Some(dir.into());
        self
    }

    /// Warn when the catalog was published for a CLI newer than `cli_version`
    pub fn with_version_check(
        mut self,
        cli_version: impl Into<String>,
        upgrade_command: impl Into<String>,
    ) -> Self {
        self.version_check = Some((cli_version.into(), upgrade_command.into()));
        self
    }

    /// Execute every stage in order
    ///
    /// The first failing stage ends the run with its error. Nothing below the
    /// project root is created before both selectors have been validated.
    #[instrument(skip_all, fields(app_path = %request.app_path.display()))]
    pub async fn run(
        &mut self,
        request: ScaffoldRequest,
        observer: &mut dyn PipelineObserver,
    ) -> ScaffoldResult<ScaffoldOutcome> {
        let invocation_dir = match &self.invocation_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| ScaffoldError::io("read the current directory", ".", e))?,
        };

        let mut run = RunState::new(request, invocation_dir);
        let mut stage = Stage::Init;
        loop {
            observer.on_event(&PipelineEvent::StageEntered(stage));
            if let Err(e) = self.execute(stage, &mut run, observer).await {
                if stage.mutates_root() && !e.is_user_error() && run.root.exists() {
                    warn!(
                        %stage,
                        root = %run.root.display(),
                        "run stopped, files written so far are kept"
                    );
                }
                return Err(e);
            }
            match stage.next() {
                Some(next) => stage = next,
                None => break,
            }
        }

        run.into_outcome()
    }

    #[instrument(skip_all, fields(stage = %stage))]
    async fn execute(
        &mut self,
        stage: Stage,
        run: &mut RunState,
        observer: &mut dyn PipelineObserver,
    ) -> ScaffoldResult<()> {
        match stage {
            Stage::Init => self.init(run),
            Stage::Validate => self.validate(run, observer).await,
            Stage::CreateRoot => fs::create_dir_all(&run.root)
                .await
                .map_err(|e| ScaffoldError::io("create", &run.root, e)),
            Stage::CheckEmpty => {
                let conflicts = self
                    .collaborators
                    .folder
                    .conflicts(&run.root)
                    .map_err(|e| ScaffoldError::io("read", &run.root, e))?;
                if conflicts.is_empty() {
                    Ok(())
                } else {
                    Err(ScaffoldError::DestinationNotEmpty {
                        path: run.root.clone(),
                        app_name: run.app_name.clone(),
                        conflicts,
                    })
                }
            }
            Stage::DetectPackageManager => {
                run.package_manager = self.collaborators.package_manager.select();
                info!(manager = %run.package_manager, "package manager selected");
                Ok(())
            }
            Stage::CheckOnline => {
                run.online = self.collaborators.connectivity.is_online().await;
                info!(online = run.online, "connectivity checked");
                Ok(())
            }
            Stage::FetchFramework => {
                observer.on_event(&PipelineEvent::Creating {
                    framework: run.framework.clone(),
                    root: run.root.clone(),
                });
                let written = self
                    .fetch(&run.root, BundleId::framework(&run.framework), observer)
                    .await?;
                run.extracted.extend(written);
                Ok(())
            }
            Stage::FetchTemplate => {
                let bundle = BundleId::template(&run.framework, &run.template);
                let written = self.fetch(&run.root, bundle, observer).await?;
                run.extracted.extend(written);
                Ok(())
            }
            Stage::Render => {
                self.engine.register_helpers();
                let context = RenderContext::new(&run.app_name, &run.framework, &run.template);
                // Only bundle files; whatever already sat in the root is left alone
                run.rendered = self
                    .engine
                    .render_paths(&run.root, &run.extracted, &context)?;
                observer.on_event(&PipelineEvent::Rendered(run.rendered.len()));
                Ok(())
            }
            Stage::WriteIgnoreDefault => {
                let ignore_path = run.root.join(IGNORE_FILE);
                if ignore_path.exists() {
                    debug!("bundle ships its own ignore file");
                    return Ok(());
                }
                fs::write(&ignore_path, DEFAULT_GITIGNORE)
                    .await
                    .map_err(|e| ScaffoldError::io("write", &ignore_path, e))?;
                observer.on_event(&PipelineEvent::WroteDefaultIgnore);
                Ok(())
            }
            Stage::Install => {
                if self.options.skip_install {
                    observer.on_event(&PipelineEvent::InstallSkipped);
                    return Ok(());
                }
                observer.on_event(&PipelineEvent::Installing {
                    manager: run.package_manager,
                    online: run.online,
                });
                self.collaborators
                    .installer
                    .install(&run.root, run.package_manager, run.online)
                    .await?;
                run.installed = true;
                observer.on_event(&PipelineEvent::Installed);
                Ok(())
            }
            Stage::GitInit => {
                if self.options.skip_git {
                    return Ok(());
                }
                run.git_initialized = self.collaborators.version_control.try_git_init(&run.root);
                if run.git_initialized {
                    observer.on_event(&PipelineEvent::GitInitialized);
                }
                Ok(())
            }
            Stage::Report => {
                run.report = Some(Report::build(
                    &run.root,
                    &run.app_name,
                    &run.request.app_path.display().to_string(),
                    &run.invocation_dir,
                    run.package_manager,
                ));
                Ok(())
            }
            Stage::Done => Ok(()),
        }
    }

    /// Fix the project root and apply selector defaults and aliases
    fn init(&self, run: &mut RunState) -> ScaffoldResult<()> {
        run.root = resolve_root(&run.request.app_path, &run.invocation_dir);
        run.app_name = run
            .root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ScaffoldError::io(
                    "name a project after",
                    &run.root,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "path has no final component",
                    ),
                )
            })?;

        if let Some(framework) = &run.request.framework {
            run.framework = framework.clone();
        }
        if let Some(template) = &run.request.template {
            run.template = normalize_template(template);
        }
        Ok(())
    }

    /// Check explicitly requested selectors against the catalog
    ///
    /// Defaults are trusted, so a run with neither selector never loads it.
    async fn validate(
        &mut self,
        run: &RunState,
        observer: &mut dyn PipelineObserver,
    ) -> ScaffoldResult<()> {
        let framework_given = run.request.framework.is_some();
        let template_given = run.request.template.is_some();
        if !framework_given && !template_given {
            debug!("default selectors, catalog not consulted");
            return Ok(());
        }

        let manifest = self
            .fetcher
            .fetch_catalog()
            .await
            .map_err(ScaffoldError::Catalog)?;
        let resolver = CatalogResolver::new(manifest);

        if let Some((cli_version, upgrade_command)) = &self.version_check {
            if let Some(warning) = resolver.compatibility_warning(cli_version, upgrade_command) {
                warn!("{}", warning);
                observer.on_event(&PipelineEvent::VersionWarning(warning));
            }
        }

        if framework_given {
            resolver.validate_framework(&run.framework)?;
        }
        if template_given {
            resolver.validate_template(&run.framework, &run.template)?;
        }
        Ok(())
    }

    async fn fetch(
        &mut self,
        root: &Path,
        bundle: BundleId,
        observer: &mut dyn PipelineObserver,
    ) -> ScaffoldResult<Vec<PathBuf>> {
        observer.on_event(&PipelineEvent::Downloading(bundle.clone()));
        self.fetcher
            .fetch_and_extract(root, &bundle)
            .await
            .map_err(|source| ScaffoldError::Fetch {
                bundle: bundle.to_string(),
                source,
            })
    }
}
