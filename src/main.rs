//! plastic-sync - Plastic SCM checkout for Buildkite
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use plastic_sync::buildkite::{AnnotationStyle, Annotator, BuildkiteAgent};
use plastic_sync::cli::{Cli, Commands};
use plastic_sync::config::{Config, ConfigManager};
use plastic_sync::error::{SyncError, SyncResult};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

// Hooks run one after another; nothing here needs more than one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.selected_command();

    let (config, result) = match load_config(&cli).await {
        Ok(config) => {
            init_logging(cli.verbose, &config.general.log_format);
            let result = run(&cli, &command, &config).await;
            (config, result)
        }
        Err(e) => {
            init_logging(cli.verbose, "text");
            (Config::default(), Err(e))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&command, &config, &e).await;
            ExitCode::FAILURE
        }
    }
}

async fn load_config(cli: &Cli) -> SyncResult<Config> {
    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    manager.load().await
}

/// Initialize logging: 0 = info, 1 = debug, 2+ = trace. `RUST_LOG` wins.
fn init_logging(verbose: u8, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("plastic_sync=info"),
        1 => EnvFilter::new("plastic_sync=debug"),
        _ => EnvFilter::new("plastic_sync=trace"),
    });

    // Logs go to stderr so `resolve` and `show` output stays machine-readable.
    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: &Cli, command: &Commands, config: &Config) -> SyncResult<()> {
    match command {
        Commands::Sync => plastic_sync::cli::commands::sync(&cli.build, config).await,
        Commands::Resolve => plastic_sync::cli::commands::resolve(&cli.build, config).await,
        Commands::Show => plastic_sync::cli::commands::show(config).await,
        Commands::FriendlyName(args) => plastic_sync::cli::commands::friendly_name(args),
    }
}

/// Print the error and, for build-facing commands, annotate the build with it
async fn report_failure(command: &Commands, config: &Config, error: &SyncError) {
    eprintln!("{} {}", style("Error:").red().bold(), error);
    if let Some(hint) = error.hint() {
        eprintln!("{} {}", style("Hint:").yellow(), hint);
    }

    if !command.annotates_failures() || !config.annotation.enabled {
        return;
    }

    let agent = BuildkiteAgent::new(&config.tools.agent);
    let message = error.to_string();
    if let Err(e) = agent
        .annotate(AnnotationStyle::Error, &config.annotation.context, &message)
        .await
    {
        warn!("Failed to annotate build: {}", e);
    }
}
