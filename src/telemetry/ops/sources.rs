use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Sources;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Resolve, List }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Resolve => "resolve",
        Phase::List => "list",
    }}
    fn span(&self) -> Span { match self {
        Phase::Resolve => info_span!("resolve"),
        Phase::List => info_span!("list"),
    }}
}

impl OpMarker for Sources {
    const NAME: &'static str = "sources";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("sources") }
}
