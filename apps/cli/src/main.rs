//! PartCatalog CLI: scrape an appliance-parts catalog into CSV and JSON.
//!
//! Walks every part category reachable from the catalog root, follows each
//! part's detail page, and writes one record per part.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
