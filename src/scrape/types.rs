use serde::Serialize;

use crate::extraction::PageReport;

// Plan envelope types
#[derive(Serialize)]
pub struct SourceSample { pub name: String, pub url: String, pub state: String }

#[derive(Serialize)]
pub struct ScrapePlan { pub sources: usize, pub out: String, pub duplicate_policy: String, pub sample_sources: Vec<SourceSample> }

// Apply/result envelope types
#[derive(Debug, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub url: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageReport>,
}

impl SourceSummary {
    pub fn emitted(&self) -> usize { self.page.as_ref().map_or(0, |p| p.emitted) }
}

#[derive(Serialize)]
pub struct ScrapeTotals { pub sources: usize, pub skipped: usize, pub records: usize }

#[derive(Serialize)]
pub struct ScrapeApply { pub totals: ScrapeTotals, pub out: String, pub per_source: Vec<SourceSummary> }
