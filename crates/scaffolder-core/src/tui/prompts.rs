//! Interactive create flow using cliclack

use super::console::ConsoleObserver;
use crate::archive::ArchiveFetcher;
use crate::error::ScaffoldError;
use crate::pipeline::{Orchestrator, Report, ScaffoldOptions, ScaffoldOutcome, ScaffoldRequest};
use crate::product::ProductConfig;
use crate::runtime::Collaborators;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Arguments of the create flow
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project directory; prompted for when absent
    pub app_path: Option<PathBuf>,

    pub framework: Option<String>,

    pub template: Option<String>,

    /// Local bundle directory to use instead of the remote catalog
    pub template_dir: Option<PathBuf>,

    /// Where downloaded bundles are kept between runs
    pub cache_dir: Option<PathBuf>,

    pub skip_install: bool,

    pub skip_git: bool,
}

/// Scaffold a project, reporting progress on the terminal
pub async fn run<C: ProductConfig>(
    config: &C,
    args: CreateArgs,
    cli_version: &str,
) -> Result<ScaffoldOutcome> {
    cliclack::intro(config.display_name())?;

    let fetcher = setup_fetcher(config, &args)?;
    let app_path = select_app_path(&args)?;

    let mut request = ScaffoldRequest::new(app_path);
    request.framework = args.framework.clone();
    request.template = args.template.clone();

    let mut orchestrator = Orchestrator::new(
        fetcher,
        Collaborators::system(config.initial_commit_message()),
    )
    .with_options(ScaffoldOptions {
        skip_install: args.skip_install,
        skip_git: args.skip_git,
    })
    .with_version_check(cli_version, config.upgrade_command());

    let mut observer = ConsoleObserver::new();
    let outcome = match orchestrator.run(request, &mut observer).await {
        Ok(outcome) => outcome,
        Err(e) => {
            observer.fail();
            return Err(e.into());
        }
    };

    print_next_steps(&outcome.report, config.docs_url())?;
    Ok(outcome)
}

fn setup_fetcher<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<ArchiveFetcher> {
    let fetcher = match &args.template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local bundles from {}", path.display()))?;
            ArchiveFetcher::from_local(path.clone(), config.user_agent())
        }
        None => ArchiveFetcher::from_config(config).context("Invalid catalog URL")?,
    };

    Ok(fetcher.with_cache_dir(args.cache_dir.clone()))
}

fn select_app_path(args: &CreateArgs) -> Result<PathBuf> {
    if let Some(path) = &args.app_path {
        return Ok(path.clone());
    }

    let input: String = cliclack::input("What is your project named?")
        .placeholder("my-eth-app")
        .interact()?;
    if input.trim().is_empty() {
        anyhow::bail!("Please specify the project directory");
    }

    Ok(PathBuf::from(input.trim()))
}

fn print_next_steps(report: &Report, docs_url: &str) -> Result<()> {
    println!();
    println!(
        "{} Created {} at {}",
        "Success!".green(),
        report.app_name,
        report.app_path
    );

    if !report.packages.is_empty() {
        println!("Inside that directory, you can run several commands:");
        for hint in report.hints() {
            println!();
            println!("  {}", hint.command.cyan());
            println!("    {}", hint.description);
        }
        println!();
    }

    println!("We suggest that you begin by typing:");
    println!();
    println!("  {} {}", "cd".cyan(), report.cd_path);
    if let Some(command) = &report.suggested_command {
        println!("  {}", command.cyan());
    }
    println!();
    println!("Documentation: {}", docs_url.cyan());
    println!();

    cliclack::outro("Happy hacking!")?;
    Ok(())
}

/// Print a failed run to stderr, with the extra detail each error carries
pub fn print_error(error: &anyhow::Error) {
    let Some(scaffold_error) = error.downcast_ref::<ScaffoldError>() else {
        eprintln!("{} {:#}", "Error:".red().bold(), error);
        return;
    };

    eprintln!("{} {}", "Error:".red().bold(), scaffold_error);

    if let ScaffoldError::DestinationNotEmpty { conflicts, .. } = scaffold_error {
        eprintln!();
        for conflict in conflicts {
            eprintln!("  {}", conflict);
        }
        eprintln!();
    }

    if !scaffold_error.is_user_error() {
        let mut source = std::error::Error::source(scaffold_error);
        while let Some(cause) = source {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
            source = cause.source();
        }
    }

    if let Some(suggestion) = scaffold_error.suggestion() {
        eprintln!("{}", suggestion.yellow());
    }
}
