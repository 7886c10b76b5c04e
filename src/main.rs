use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use coinscrape::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    match try_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("coinscrape: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> anyhow::Result<()> {
    coinscrape::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Scrape(args) => coinscrape::scrape::run(args).await.context("scrape"),
        Command::Specs(args) => coinscrape::detail::run(args).await.context("specs"),
    }
}
