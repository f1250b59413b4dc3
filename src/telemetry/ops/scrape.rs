use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Scrape;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Source, Fetch, Extract, Write }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Source => "source",
        Phase::Fetch => "fetch",
        Phase::Extract => "extract",
        Phase::Write => "write",
    }}
    fn span(&self) -> Span { match self {
        Phase::Source => info_span!("source"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Extract => info_span!("extract"),
        Phase::Write => info_span!("write"),
    }}
}

impl OpMarker for Scrape {
    const NAME: &'static str = "scrape";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("scrape") }
}
