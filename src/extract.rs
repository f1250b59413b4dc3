use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::SourcesFile;
use crate::extraction::types::{ScholarshipRecord, Source};
use crate::extraction::{ExtractionPipeline, PageReport};
use crate::scrape::{policy_from_flag, write};
use crate::telemetry::{self, ops::extract::Phase};
use crate::util::text::preview;

/// Run extraction over a saved HTML page, without touching the network.
#[derive(Args, Debug)]
pub struct ExtractCmd {
    /// HTML file to read
    pub file: PathBuf,
    #[arg(long)] pub university: String,
    #[arg(long, default_value = "")] pub state: String,
    /// Page URL used for default links and to resolve relative hrefs
    #[arg(long)] pub url: String,
    /// Also write the records as CSV
    #[arg(long)] pub out: Option<PathBuf>,
    #[arg(long, default_value_t = false)] pub emit_before_duplicate: bool,
}

#[derive(Serialize)]
struct ExtractResult<'a> {
    file: String,
    page: PageReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    out: Option<String>,
    records: &'a [ScholarshipRecord],
}

pub async fn run(sources_file: &SourcesFile, args: ExtractCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::extract();
    let _g = log.root_span_kv([
        ("file", args.file.display().to_string()),
        ("university", args.university.clone()),
        ("url", args.url.clone()),
    ]).entered();

    let html = {
        let _s = log.span(&Phase::Read).entered();
        fs::read_to_string(&args.file).with_context(|| format!("read {}", args.file.display()))?
    };

    let source = Source::new(&args.university, &args.url, &args.state);
    let mut pipeline = ExtractionPipeline::new(&sources_file.name_tokens, policy_from_flag(args.emit_before_duplicate))?;
    let page = {
        let _s = log.span(&Phase::Segment).entered();
        pipeline.extract_html(&source, &source.url, &html)
    };
    log.info_kv(
        &format!("Extracted {} record(s) from {}", page.emitted, args.file.display()),
        [("nodes", page.nodes.to_string()), ("triggers", page.triggers.to_string()), ("duplicates", page.duplicates.to_string())],
    );

    let _s = log.span(&Phase::Output).entered();
    if let Some(out) = &args.out {
        write::write_records_to_path(out, pipeline.records())?;
        log.info(format!("💾 Data saved to {}", out.display()));
    }

    if telemetry::config::json_mode() {
        let result = ExtractResult {
            file: args.file.display().to_string(),
            page,
            out: args.out.as_ref().map(|p| p.display().to_string()),
            records: pipeline.records(),
        };
        log.result_timed(&result, started)?;
    } else {
        for (i, r) in pipeline.records().iter().enumerate() {
            println!("🎓 {}. {} ({})", i + 1, r.name, r.university);
            if !r.amount.is_empty() { println!("  Amount: {}", r.amount.trim_end()); }
            if !r.eligibility.is_empty() { println!("  Eligibility: {}", r.eligibility.trim_end()); }
            if !r.deadline.is_empty() { println!("  Deadline: {}", r.deadline.trim_end()); }
            println!("  Link: {}", r.link);
            println!("  Details: {}", preview(r.details.trim_end(), 200));
        }
        if pipeline.records().is_empty() {
            println!("No scholarships extracted. Check HTML structure or dynamic content.");
        }
    }
    Ok(())
}
