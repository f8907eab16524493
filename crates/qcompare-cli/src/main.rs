//! qcompare command-line interface.
//!
//! The main entry point for the qcompare CLI tool.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use console::style;

use qcompare_cli::cli::{Cli, Commands};
use qcompare_cli::commands::{
    Session, compare, jobs, overview, providers, refresh, systems, version,
};
use qcompare_cli::config::Config;
use qcompare_cli::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init(cli.verbose, &config.logging)?;

    let session = Session::new(config, cli.json, cli.systems_file, cli.providers_file);

    match cli.command {
        Commands::Systems(args) => systems::execute(&session, &args).await,
        Commands::System { key } => systems::show(&session, &key).await,
        Commands::Providers => providers::execute(&session).await,
        Commands::Provider { key, description } => {
            providers::show(&session, &key, description.into()).await
        }
        Commands::CompareSystems {
            versus,
            only_differences,
        } => compare::systems(&session, &versus, only_differences).await,
        Commands::CompareProviders { versus } => compare::providers(&session, &versus).await,
        Commands::Overview => overview::execute(&session).await,
        Commands::Refresh { provider_id } => refresh::execute(&session, &provider_id).await,
        Commands::Jobs { action } => jobs::execute(&session, action).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
