use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{self, FetchConfig, SourcesFile};
use crate::extraction::segment::DuplicatePolicy;
use crate::extraction::types::Source;
use crate::extraction::{ExtractionPipeline, ScopeReport};
use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::scrape::{Phase as ScrapePhase, Scrape as ScrapeOp};
use crate::telemetry;

pub mod fetch;
pub mod write;
mod types;

use self::fetch::{Acquire, HttpAcquirer};
use self::types::SourceSummary;

#[derive(Args)]
pub struct ScrapeCmd {
    /// Only scrape the named source(s); repeatable
    #[arg(long)] pub only: Vec<String>,
    /// CSV output path (default: $SCHOLAR_CSV or scholarships.csv)
    #[arg(long)] pub out: Option<PathBuf>,
    #[arg(long)] pub timeout_secs: Option<u64>,
    #[arg(long)] pub user_agent: Option<String>,
    /// Emit the open record when a duplicate heading follows it instead of dropping it
    #[arg(long, default_value_t = false)] pub emit_before_duplicate: bool,
    #[arg(long, default_value_t = false)] pub apply: bool,
    #[arg(long, default_value_t = 10)] pub plan_limit: usize,
}

pub fn policy_from_flag(emit_before_duplicate: bool) -> DuplicatePolicy {
    if emit_before_duplicate { DuplicatePolicy::EmitOpen } else { DuplicatePolicy::DropOpen }
}

pub async fn run(sources_file: &SourcesFile, args: ScrapeCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::scrape();
    let out = config::csv_path(args.out.clone());
    let policy = policy_from_flag(args.emit_before_duplicate);
    let _g = log.root_span_kv([
        ("apply", args.apply.to_string()),
        ("only", format!("{:?}", args.only)),
        ("out", out.display().to_string()),
        ("policy", format!("{:?}", policy)),
        ("plan_limit", args.plan_limit.to_string()),
    ]).entered();

    let sources = sources_file.select(&args.only);
    if sources.is_empty() {
        log.warn(format!("ℹ️  No sources selected (only={:?})", args.only));
        return Ok(());
    }

    if !args.apply {
        if telemetry::config::json_mode() {
            use types::{ScrapePlan, SourceSample};
            let sample_sources = sources.iter().take(args.plan_limit)
                .map(|s| SourceSample { name: s.name.clone(), url: s.url.clone(), state: s.state.clone() })
                .collect();
            let plan = ScrapePlan {
                sources: sources.len(),
                out: out.display().to_string(),
                duplicate_policy: format!("{:?}", policy),
                sample_sources,
            };
            log.plan(&plan)?;
        } else {
            log.info(format!("📝 Scrape plan — sources={} out={} policy={:?}", sources.len(), out.display(), policy));
            for s in sources.iter().take(args.plan_limit) { log.info(format!("  {} ({}) {}", s.name, s.state, s.url)); }
            if sources.len() > args.plan_limit { log.info(format!("  ... ({} more)", sources.len() - args.plan_limit)); }
            log.info("   Use --apply to execute.");
        }
        return Ok(());
    }

    let mut fetch_cfg = FetchConfig::from_env();
    if let Some(secs) = args.timeout_secs { fetch_cfg.timeout = Duration::from_secs(secs); }
    if let Some(ua) = args.user_agent.clone() { fetch_cfg.user_agent = ua; }
    let acquirer = HttpAcquirer::new(&fetch_cfg).context("build http client")?;

    let mut pipeline = ExtractionPipeline::new(&sources_file.name_tokens, policy)?;
    let per_source = collect(&acquirer, &sources, &mut pipeline, &log).await;
    let records = pipeline.into_records();

    {
        let _ws = log.span_kv(&ScrapePhase::Write, [("path", out.display().to_string())]).entered();
        write::write_records_to_path(&out, &records)?;
    }

    let skipped = per_source.iter().filter(|s| s.page.is_none()).count();
    log.totals(per_source.len(), skipped, records.len());
    log.info(format!("💾 Data saved to {}", out.display()));

    if telemetry::config::json_mode() {
        use types::{ScrapeApply, ScrapeTotals};
        let result = ScrapeApply {
            totals: ScrapeTotals { sources: per_source.len(), skipped, records: records.len() },
            out: out.display().to_string(),
            per_source,
        };
        log.result_timed(&result, started)?;
    }
    Ok(())
}

/// Fetches and extracts every source in order. A failed fetch skips that
/// source; nothing here aborts the run.
pub async fn collect<A: Acquire + ?Sized>(
    acquirer: &A,
    sources: &[Source],
    pipeline: &mut ExtractionPipeline,
    log: &LogCtx<ScrapeOp>,
) -> Vec<SourceSummary> {
    let mut per_source = Vec::with_capacity(sources.len());

    for source in sources {
        let _src_span = log.span_kv(&ScrapePhase::Source, [("name", source.name.clone()), ("url", source.url.clone())]).entered();
        log.info(format!("🔎 Scraping {}...", source.name));

        let fetched = {
            let _s = log.span(&ScrapePhase::Fetch).entered();
            acquirer.acquire(&source.url).await
        };
        let page = match fetched {
            Ok(page) => page,
            Err(err) => {
                log.warn_kv(
                    &format!("⚠️  Error fetching {}: {}", source.name, err),
                    [("source", source.name.clone()), ("kind", err.kind().to_string())],
                );
                per_source.push(SourceSummary {
                    name: source.name.clone(),
                    url: source.url.clone(),
                    status: "skipped",
                    error: Some(err.to_string()),
                    page: None,
                });
                continue;
            }
        };

        let report = {
            let _s = log.span(&ScrapePhase::Extract).entered();
            pipeline.extract_html(source, &page.url, &page.html)
        };

        match &report.scope {
            ScopeReport::Section { tag, text, .. } => {
                log.info(format!("Found scholarship section for {} <{}>: {}", source.name, tag, text));
                if report.section_fallback {
                    log.debug(format!("Section for {} has no content nodes; scanned the whole page", source.name));
                }
            }
            ScopeReport::Page => {
                log.info(format!("No scholarship section found for {}. Using page-wide scan.", source.name));
            }
        }
        if report.duplicates > 0 {
            log.debug_kv(
                &format!("Skipped {} duplicate scholarship heading(s) for {}", report.duplicates, source.name),
                [("duplicates", report.duplicates.to_string()), ("discarded", report.discarded.to_string())],
            );
        }
        if report.emitted == 0 {
            log.warn(format!("No scholarships extracted for {}. Check HTML structure or dynamic content.", source.name));
        }
        log.source_summary(&source.name, report.emitted, report.duplicates, report.discarded);

        per_source.push(SourceSummary {
            name: source.name.clone(),
            url: source.url.clone(),
            status: "ok",
            error: None,
            page: Some(report),
        });
    }

    per_source
}
