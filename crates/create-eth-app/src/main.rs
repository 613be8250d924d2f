//! create-eth-app - Create Ethereum-powered apps with one command

mod logging;

use anyhow::{Context, Result};
use clap::{
    ArgAction, Args as ClapArgs, CommandFactory, FromArgMatches, Parser, Subcommand,
};
use colored::Colorize;
use scaffolder_core::archive::pack_bundles;
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::ProductConfig;
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// create-eth-app product configuration
#[derive(Clone)]
pub struct EthAppConfig;

impl ProductConfig for EthAppConfig {
    fn name(&self) -> &'static str {
        "create-eth-app"
    }

    fn display_name(&self) -> &'static str {
        "Create Eth App"
    }

    fn default_catalog_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/paulrberg/create-eth-app/develop/bundles"
    }

    fn catalog_url_env(&self) -> &'static str {
        "CREATE_ETH_APP_CATALOG_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/paulrberg/create-eth-app"
    }

    fn cli_description(&self) -> &'static str {
        "Create Ethereum-powered apps with one command"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install create-eth-app --force"
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-eth-app")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Zip every bundle listed in a local catalog so it can be served remotely (for development use)
    Pack(PackArgs),
}

#[derive(ClapArgs, Debug)]
pub struct CliCreateArgs {
    /// Project directory to create
    #[arg(value_name = "APP_PATH")]
    pub app_path: Option<PathBuf>,

    /// Framework to scaffold with (default: react)
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Template to apply on top of the framework (default: default)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Local directory to use for bundles instead of fetching from remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Directory where downloaded bundles are cached between runs
    #[arg(long = "cache-dir", env = "CREATE_ETH_APP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Do not install packages after scaffolding
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Do not initialize a git repository
    #[arg(long = "skip-git")]
    pub skip_git: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            app_path: args.app_path,
            framework: args.framework,
            template: args.template,
            template_dir: args.template_dir,
            cache_dir: args.cache_dir,
            skip_install: args.skip_install,
            skip_git: args.skip_git,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct PackArgs {
    /// Local bundle directory holding catalog.yaml, frameworks/ and templates/
    #[arg(long = "template-dir")]
    pub template_dir: PathBuf,

    /// Output directory (default: <template-dir>/dist)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

fn pack(config: &EthAppConfig, args: &PackArgs) -> Result<()> {
    if !args.template_dir.is_dir() {
        anyhow::bail!(
            "Bundle directory not found: {}",
            args.template_dir.display()
        );
    }
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| args.template_dir.join("dist"));

    println!(
        "{}",
        format!("Packing {} bundles...", config.display_name())
            .cyan()
            .bold()
    );

    let summary = pack_bundles(&args.template_dir, &out)
        .with_context(|| format!("Failed to pack {}", args.template_dir.display()))?;

    for packed in &summary.packed {
        println!(
            "  {} {} ({} bytes)",
            "->".blue(),
            packed.path.display(),
            packed.size
        );
    }
    for bundle in &summary.missing {
        eprintln!(
            "{} No directory for {}, skipped",
            "Warning:".yellow(),
            bundle
        );
    }

    println!();
    println!(
        "{} {} bundle zip(s) in {}",
        "Built".green().bold(),
        summary.packed.len(),
        out.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let config = EthAppConfig;
    let matches = Args::command()
        .about(config.cli_description())
        .get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    if let Err(e) = logging::init_logging(args.verbose) {
        eprintln!("{e}");
    }

    let result = match args.command {
        Some(Command::Pack(pack_args)) => pack(&config, &pack_args),
        None => scaffolder_core::run(&config, args.create.into(), CLI_VERSION)
            .await
            .map(|_| ()),
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            scaffolder_core::tui::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_app_path() {
        let args = Args::parse_from(["create-eth-app", "my-app", "--template", "uniswap"]);
        assert!(args.command.is_none());
        assert_eq!(args.create.app_path, Some(PathBuf::from("my-app")));
        assert_eq!(args.create.template.as_deref(), Some("uniswap"));
    }

    #[test]
    fn test_pack_subcommand() {
        let args = Args::parse_from(["create-eth-app", "pack", "--template-dir", "bundles"]);
        match args.command {
            Some(Command::Pack(pack)) => {
                assert_eq!(pack.template_dir, PathBuf::from("bundles"));
                assert!(pack.out.is_none());
            }
            None => panic!("expected pack subcommand"),
        }
    }

    #[test]
    fn test_verbose_counts() {
        let args = Args::parse_from(["create-eth-app", "-vv", "my-app"]);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_create_args_conversion() {
        let args = Args::parse_from(["create-eth-app", "app", "--skip-install", "--skip-git"]);
        let create: CreateArgs = args.create.into();
        assert!(create.skip_install);
        assert!(create.skip_git);
        assert!(create.framework.is_none());
    }

    #[test]
    fn test_about_comes_from_config() {
        let command = Args::command().about(EthAppConfig.cli_description());
        let about = command.get_about().map(|about| about.to_string());
        assert_eq!(about.as_deref(), Some(EthAppConfig.cli_description()));
    }

    #[test]
    fn test_verify_cli() {
        Args::command().debug_assert();
    }
}
