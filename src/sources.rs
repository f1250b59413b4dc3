use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::config::SourcesFile;
use crate::extraction::types::Source;
use crate::telemetry::{self, ops::sources::Phase};

/// List the configured scholarship pages.
#[derive(Args, Debug)]
pub struct SourcesCmd {
    /// Only list the named source(s); repeatable
    #[arg(long)] pub only: Vec<String>,
}

#[derive(Serialize)]
struct SourcesResult<'a> {
    origin: String,
    sources: Vec<Source>,
    name_tokens: &'a [String],
}

pub async fn run(sources_file: &SourcesFile, origin: Option<&PathBuf>, args: SourcesCmd) -> Result<()> {
    let log = telemetry::sources();
    let _g = log.root_span_kv([("only", format!("{:?}", args.only))]).entered();

    let origin = {
        let _s = log.span(&Phase::Resolve).entered();
        origin.map_or_else(|| "builtin".to_string(), |p| p.display().to_string())
    };
    let sources = sources_file.select(&args.only);
    log.debug_kv("sources resolved", [("origin", origin.clone()), ("count", sources.len().to_string())]);

    let _s = log.span(&Phase::List).entered();
    if telemetry::config::json_mode() {
        log.result(&SourcesResult { origin, sources, name_tokens: &sources_file.name_tokens })?;
    } else {
        println!("📚 Sources ({}) from {}:", sources.len(), origin);
        for s in &sources {
            println!("  {:<24} {:<16} {}", s.name, s.state, s.url);
        }
        println!("🏷️  Name tokens: {}", sources_file.name_tokens.join(", "));
    }
    Ok(())
}
