use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Search;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Load, Index, Rank, Feedback, Output }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Load => "load",
        Phase::Index => "index",
        Phase::Rank => "rank",
        Phase::Feedback => "feedback",
        Phase::Output => "output",
    }}
    fn span(&self) -> Span { match self {
        Phase::Load => info_span!("load"),
        Phase::Index => info_span!("index"),
        Phase::Rank => info_span!("rank"),
        Phase::Feedback => info_span!("feedback"),
        Phase::Output => info_span!("output"),
    }}
}

impl OpMarker for Search {
    const NAME: &'static str = "search";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("search") }
}
