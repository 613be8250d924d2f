//! End-to-end runs of the scaffolding pipeline against a local bundle fixture

use scaffolder_core::archive::pack_bundles;
use scaffolder_core::error::InstallError;
use scaffolder_core::pipeline::{
    Orchestrator, PipelineEvent, ScaffoldOptions, ScaffoldOutcome, ScaffoldRequest, Stage,
    DEFAULT_GITIGNORE,
};
use scaffolder_core::runtime::{
    Collaborators, FixedPackageManager, HarmlessEntriesGuard, Installer, PackageManager,
    StaticConnectivity, VersionControl,
};
use scaffolder_core::{ArchiveFetcher, BundleSource, ScaffoldError, ScaffoldResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;
use walkdir::WalkDir;

const CATALOG: &str = r#"
min_cli_version: "0.1.0"
frameworks:
  react:
    handlebars: true
    templates: [default, sablier-v1, uniswap-v2, broken, ghost]
  vue:
    handlebars: true
    templates: [default]
  angular:
    templates: [default]
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn bundle_fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "catalog.yaml", CATALOG);

    write(
        root,
        "frameworks/react/package.json",
        r#"{ "name": "{{kebabCase appName}}", "private": true }"#,
    );
    write(root, "frameworks/react/README.md", "framework readme");
    write(
        root,
        "frameworks/react/packages/react-app/src/App.js",
        "function App() { return null; }\n",
    );
    write(root, "frameworks/vue/packages/vue-app/package.json", "{}");

    write(root, "templates/react/default/README.md", "# {{appName}}\n");
    write(root, "templates/react/sablier-v1/README.md", "# Sablier v1\n");
    write(root, "templates/react/sablier-v1/.gitignore", "custom\n");
    write(
        root,
        "templates/react/sablier-v1/packages/subgraph/subgraph.yaml",
        "specVersion: 0.0.2\n",
    );
    write(root, "templates/react/uniswap-v2/UNISWAP.md", "v2\n");
    write(root, "templates/react/broken/README.md", "# {{appName\n");
    write(root, "templates/vue/default/README.md", "# {{pascalCase appName}}\n");
    dir
}

type InstallCall = (PathBuf, PackageManager, bool);

#[derive(Clone, Default)]
struct RecordingInstaller {
    calls: Arc<Mutex<Vec<InstallCall>>>,
}

#[async_trait::async_trait]
impl Installer for RecordingInstaller {
    async fn install(
        &self,
        root: &Path,
        manager: PackageManager,
        online: bool,
    ) -> Result<(), InstallError> {
        self.calls
            .lock()
            .unwrap()
            .push((root.to_path_buf(), manager, online));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingGit {
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl VersionControl for RecordingGit {
    fn try_git_init(&self, root: &Path) -> bool {
        self.calls.lock().unwrap().push(root.to_path_buf());
        true
    }
}

struct Harness {
    bundles: TempDir,
    cwd: TempDir,
    installer: RecordingInstaller,
    git: RecordingGit,
    options: ScaffoldOptions,
}

impl Harness {
    fn new() -> Self {
        Self {
            bundles: bundle_fixture(),
            cwd: tempfile::tempdir().unwrap(),
            installer: RecordingInstaller::default(),
            git: RecordingGit::default(),
            options: ScaffoldOptions::default(),
        }
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            connectivity: Box::new(StaticConnectivity(false)),
            package_manager: Box::new(FixedPackageManager(PackageManager::Yarn)),
            folder: Box::new(HarmlessEntriesGuard),
            installer: Box::new(self.installer.clone()),
            version_control: Box::new(self.git.clone()),
        }
    }

    fn orchestrator(&self, fetcher: ArchiveFetcher) -> Orchestrator {
        Orchestrator::new(fetcher, self.collaborators())
            .with_options(self.options)
            .with_invocation_dir(self.cwd.path())
            .with_version_check("0.1.0", "cargo install create-eth-app --force")
    }

    async fn run(
        &self,
        request: ScaffoldRequest,
    ) -> (ScaffoldResult<ScaffoldOutcome>, Vec<PipelineEvent>) {
        let fetcher = ArchiveFetcher::from_local(self.bundles.path(), "test");
        let mut events: Vec<PipelineEvent> = Vec::new();
        let result = self.orchestrator(fetcher).run(request, &mut events).await;
        (result, events)
    }

    fn root(&self, name: &str) -> PathBuf {
        self.cwd.path().join(name)
    }

    fn install_calls(&self) -> Vec<InstallCall> {
        self.installer.calls.lock().unwrap().clone()
    }
}

fn stages(events: &[PipelineEvent]) -> Vec<Stage> {
    events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::StageEntered(stage) => Some(*stage),
            _ => None,
        })
        .collect()
}

fn tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            (
                entry.path().strip_prefix(root).unwrap().to_path_buf(),
                std::fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn default_run_scaffolds_react_project() {
    let harness = Harness::new();
    let (result, events) = harness.run(ScaffoldRequest::new("my-eth-app")).await;
    let outcome = result.unwrap();

    let root = harness.root("my-eth-app");
    assert_eq!(outcome.root, root);
    assert_eq!(outcome.framework, "react");
    assert_eq!(outcome.template, "default");

    // template overlays the framework
    assert_eq!(
        std::fs::read_to_string(root.join("README.md")).unwrap(),
        "# my-eth-app\n"
    );
    assert_eq!(
        std::fs::read_to_string(root.join("package.json")).unwrap(),
        r#"{ "name": "my-eth-app", "private": true }"#
    );
    assert!(root.join("packages/react-app/src/App.js").is_file());
    assert_eq!(
        std::fs::read_to_string(root.join(".gitignore")).unwrap(),
        DEFAULT_GITIGNORE
    );

    let report = &outcome.report;
    assert_eq!(report.cd_path, "my-eth-app");
    assert_eq!(
        report.suggested_command.as_deref(),
        Some("yarn react-app:start")
    );
    let commands: Vec<_> = report.hints().map(|h| h.command.as_str()).collect();
    assert_eq!(commands, vec!["yarn react-app:start", "yarn react-app:build"]);

    assert_eq!(
        harness.install_calls(),
        vec![(root.clone(), PackageManager::Yarn, false)]
    );
    assert!(outcome.installed);
    assert!(outcome.git_initialized);
    assert_eq!(stages(&events), Stage::ORDER.to_vec());
}

#[tokio::test]
async fn default_run_never_reads_the_catalog() {
    let harness = Harness::new();
    std::fs::remove_file(harness.bundles.path().join("catalog.yaml")).unwrap();

    let (result, events) = harness.run(ScaffoldRequest::new("my-eth-app")).await;

    assert!(result.is_ok());
    assert!(!events
        .iter()
        .any(|e| matches!(e, PipelineEvent::VersionWarning(_))));
}

#[tokio::test]
async fn unknown_framework_leaves_destination_untouched() {
    let harness = Harness::new();
    let (result, events) = harness
        .run(ScaffoldRequest::new("my-eth-app").with_framework("svelte"))
        .await;

    match result.unwrap_err() {
        ScaffoldError::FrameworkNotFound {
            framework,
            available,
        } => {
            assert_eq!(framework, "svelte");
            assert_eq!(available, vec!["react", "vue"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!harness.root("my-eth-app").exists());
    assert_eq!(stages(&events), vec![Stage::Init, Stage::Validate]);
    assert!(harness.install_calls().is_empty());
}

#[tokio::test]
async fn framework_without_template_definitions_is_rejected() {
    let harness = Harness::new();
    let (result, _) = harness
        .run(ScaffoldRequest::new("my-eth-app").with_framework("angular"))
        .await;

    assert!(matches!(
        result,
        Err(ScaffoldError::FrameworkNotFound { .. })
    ));
    assert!(!harness.root("my-eth-app").exists());
}

#[tokio::test]
async fn unknown_template_is_rejected_before_extraction() {
    let harness = Harness::new();
    let (result, events) = harness
        .run(
            ScaffoldRequest::new("my-eth-app")
                .with_framework("vue")
                .with_template("uniswap"),
        )
        .await;

    match result.unwrap_err() {
        ScaffoldError::TemplateNotFound {
            framework,
            template,
            ..
        } => {
            assert_eq!(framework, "vue");
            assert_eq!(template, "uniswap-v2");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!harness.root("my-eth-app").exists());
    assert!(!events
        .iter()
        .any(|e| matches!(e, PipelineEvent::Downloading(_))));
}

#[tokio::test]
async fn alias_and_canonical_template_produce_the_same_project() {
    let harness = Harness::new();
    let (aliased, _) = harness
        .run(ScaffoldRequest::new("aliased").with_template("sablier"))
        .await;
    let (canonical, _) = harness
        .run(ScaffoldRequest::new("canonical").with_template("sablier-v1"))
        .await;

    assert_eq!(aliased.unwrap().template, "sablier-v1");
    assert_eq!(canonical.unwrap().template, "sablier-v1");
    // package.json differs only by the rendered app name
    let without_manifest = |root: PathBuf| {
        tree(&root)
            .into_iter()
            .filter(|(path, _)| path != Path::new("package.json"))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        without_manifest(harness.root("aliased")),
        without_manifest(harness.root("canonical"))
    );
}

#[tokio::test]
async fn uniswap_resolves_to_v2() {
    let harness = Harness::new();
    let (result, _) = harness
        .run(ScaffoldRequest::new("my-eth-app").with_template("uniswap"))
        .await;

    let outcome = result.unwrap();
    assert_eq!(outcome.template, "uniswap-v2");
    assert!(harness.root("my-eth-app").join("UNISWAP.md").is_file());
}

#[tokio::test]
async fn bundled_ignore_file_is_kept() {
    let harness = Harness::new();
    let (result, events) = harness
        .run(ScaffoldRequest::new("my-eth-app").with_template("sablier-v1"))
        .await;
    let outcome = result.unwrap();

    assert_eq!(
        std::fs::read_to_string(outcome.root.join(".gitignore")).unwrap(),
        "custom\n"
    );
    assert!(!events.contains(&PipelineEvent::WroteDefaultIgnore));

    // the subgraph package adds its own hints
    let commands: Vec<_> = outcome.report.hints().map(|h| h.command.clone()).collect();
    assert!(commands.contains(&"yarn subgraph:codegen".to_string()));
    assert!(commands.contains(&"yarn subgraph:deploy".to_string()));
}

#[tokio::test]
async fn vue_project_suggests_serve() {
    let harness = Harness::new();
    let (result, _) = harness
        .run(ScaffoldRequest::new("my-eth-app").with_framework("vue"))
        .await;
    let outcome = result.unwrap();

    assert_eq!(
        std::fs::read_to_string(outcome.root.join("README.md")).unwrap(),
        "# MyEthApp\n"
    );
    assert_eq!(
        outcome.report.suggested_command.as_deref(),
        Some("yarn vue-app:serve")
    );
}

#[tokio::test]
async fn non_empty_destination_is_refused() {
    let harness = Harness::new();
    let root = harness.root("my-eth-app");
    write(&root, "package.json", "{}");
    write(&root, "LICENSE", "MIT");

    let (result, events) = harness.run(ScaffoldRequest::new("my-eth-app")).await;

    match result.unwrap_err() {
        ScaffoldError::DestinationNotEmpty {
            app_name,
            conflicts,
            ..
        } => {
            assert_eq!(app_name, "my-eth-app");
            assert_eq!(conflicts, vec!["package.json"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(stages(&events).last(), Some(&Stage::CheckEmpty));
    assert!(!root.join("README.md").exists());
}

#[tokio::test]
async fn existing_docs_are_not_rendered() {
    let harness = Harness::new();
    let root = harness.root("my-eth-app");
    write(&root, "docs/index.md", "# {{ page.title }}\n");
    write(&root, "mkdocs.yml", "site_name: {{ config.name }}\n");

    let (result, _) = harness.run(ScaffoldRequest::new("my-eth-app")).await;
    let outcome = result.unwrap();

    assert_eq!(
        std::fs::read_to_string(root.join("docs/index.md")).unwrap(),
        "# {{ page.title }}\n"
    );
    assert_eq!(
        std::fs::read_to_string(root.join("mkdocs.yml")).unwrap(),
        "site_name: {{ config.name }}\n"
    );
    assert!(outcome.rendered.contains(&PathBuf::from("README.md")));
    assert!(!outcome.rendered.iter().any(|path| path.starts_with("docs")));
    assert_eq!(
        std::fs::read_to_string(root.join("README.md")).unwrap(),
        "# my-eth-app\n"
    );
}

#[tokio::test]
async fn skipped_install_and_git_still_report() {
    let mut harness = Harness::new();
    harness.options = ScaffoldOptions {
        skip_install: true,
        skip_git: true,
    };

    let (result, events) = harness.run(ScaffoldRequest::new("my-eth-app")).await;
    let outcome = result.unwrap();

    assert!(!outcome.installed);
    assert!(!outcome.git_initialized);
    assert!(harness.install_calls().is_empty());
    assert!(harness.git.calls.lock().unwrap().is_empty());
    assert!(events.contains(&PipelineEvent::InstallSkipped));
    assert_eq!(stages(&events), Stage::ORDER.to_vec());
}

#[tokio::test]
async fn newer_catalog_emits_version_warning() {
    let harness = Harness::new();
    write(
        harness.bundles.path(),
        "catalog.yaml",
        &CATALOG.replace("0.1.0", "99.0.0"),
    );

    let (result, events) = harness
        .run(ScaffoldRequest::new("my-eth-app").with_framework("react"))
        .await;

    assert!(result.is_ok());
    assert!(events
        .iter()
        .any(|e| matches!(e, PipelineEvent::VersionWarning(w) if w.contains("99.0.0"))));
}

#[tokio::test]
async fn missing_template_bundle_is_a_fetch_failure() {
    let harness = Harness::new();
    let (result, _) = harness
        .run(ScaffoldRequest::new("my-eth-app").with_template("ghost"))
        .await;

    match result.unwrap_err() {
        ScaffoldError::Fetch { bundle, .. } => assert_eq!(bundle, "templates/react/ghost"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(harness.install_calls().is_empty());
}

#[tokio::test]
async fn malformed_placeholder_halts_the_run() {
    let harness = Harness::new();
    let (result, _) = harness
        .run(ScaffoldRequest::new("my-eth-app").with_template("broken"))
        .await;

    assert!(matches!(result, Err(ScaffoldError::Render(_))));
    assert!(!harness.root("my-eth-app").join(".gitignore").exists());
    assert!(harness.install_calls().is_empty());
}

#[tokio::test]
async fn remote_catalog_run() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let harness = Harness::new();
    let published = tempfile::tempdir().unwrap();
    pack_bundles(harness.bundles.path(), published.path()).unwrap();

    let server = MockServer::start().await;
    for file in ["catalog.yaml", "frameworks/react.zip", "templates/react/uniswap-v2.zip"] {
        let body = std::fs::read(published.path().join(file)).unwrap();
        Mock::given(method("GET"))
            .and(path(format!("/bundles/{}", file)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let base = Url::parse(&format!("{}/bundles/", server.uri())).unwrap();
    let cache = tempfile::tempdir().unwrap();
    let fetcher = ArchiveFetcher::new(BundleSource::Remote(base), "test")
        .with_cache_dir(Some(cache.path().to_path_buf()));

    let outcome = harness
        .orchestrator(fetcher)
        .run(
            ScaffoldRequest::new("my-eth-app").with_template("uniswap"),
            &mut (),
        )
        .await
        .unwrap();

    assert!(outcome.root.join("UNISWAP.md").is_file());
    assert!(outcome.root.join("packages/react-app/src/App.js").is_file());
    assert!(cache.path().join("templates/react/uniswap-v2.zip").is_file());
}
