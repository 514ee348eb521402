mod auth;
mod batch;
mod cli;
mod config;
mod dates;
mod error;
mod funding;
mod output;
mod providers;
mod slug;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting funderfinder");
    cli.execute().await?;

    Ok(())
}
