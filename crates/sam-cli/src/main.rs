use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

use commands::shared::verdict::Verdict;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(Verdict::Pass) => {}
        Ok(verdict @ Verdict::Threshold(severity)) => {
            eprintln!("samops: found {severity} issue(s) at or above the --fail-on threshold");
            std::process::exit(verdict.exit_code());
        }
        Err(error) => {
            eprintln!("samops error: {error:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<Verdict> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    match &cli.command {
        cli::Commands::Linkedin { action } => return commands::linkedin::handle(action, &flags),
        cli::Commands::Classify(args) => return commands::classify::handle(args, &flags),
        _ => {}
    }

    let config = bootstrap::load_config()?;
    context::warn_unconfigured(&config);

    if let cli::Commands::Config { action } = &cli.command {
        return commands::config::handle(action, &config, &flags);
    }

    let ctx = context::AppContext::init(config).context("failed to initialize samops application context")?;
    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SAMOPS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
