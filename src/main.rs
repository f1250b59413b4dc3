use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;

mod config;
mod extract;
mod extraction;
mod output;
mod scrape;
mod search;
mod sources;
mod telemetry;
mod util;

use config::SourcesFile;

#[derive(Parser)]
#[command(name = "scholarship-feeder", about = "Scrape university scholarship pages into a searchable CSV")]
struct Cli {
    /// Sources file (JSON); falls back to SCHOLAR_SOURCES, then the built-in list
    #[arg(global = true, long)]
    sources: Option<PathBuf>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Sources(sources::SourcesCmd),
    Scrape(scrape::ScrapeCmd),
    Extract(extract::ExtractCmd),
    Search(search::SearchCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // logs on stderr; RUST_LOG and SCHOLAR_LOG_FORMAT apply
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Sources(args) => {
            let (file, origin) = SourcesFile::resolve(cli.sources.as_deref())?;
            sources::run(&file, origin.as_ref(), args).await?
        }
        Commands::Scrape(args) => {
            let (file, _) = SourcesFile::resolve(cli.sources.as_deref())?;
            scrape::run(&file, args).await?
        }
        Commands::Extract(args) => {
            let (file, _) = SourcesFile::resolve(cli.sources.as_deref())?;
            extract::run(&file, args).await?
        }
        Commands::Search(args) => search::run(args).await?,
    }

    Ok(())
}
