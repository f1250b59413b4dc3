use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Extract;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Read, Segment, Output }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Read => "read",
        Phase::Segment => "segment",
        Phase::Output => "output",
    }}
    fn span(&self) -> Span { match self {
        Phase::Read => info_span!("read"),
        Phase::Segment => info_span!("segment"),
        Phase::Output => info_span!("output"),
    }}
}

impl OpMarker for Extract {
    const NAME: &'static str = "extract";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("extract") }
}
