pub mod classify;
pub mod dedup;
pub mod flatten;
pub mod link;
pub mod locate;
pub mod segment;
pub mod types;

use anyhow::Result;
use scraper::Html;
use serde::Serialize;

use crate::util::text::preview;

use self::classify::FieldClassifier;
use self::dedup::Deduplicator;
use self::locate::{MatchKind, Scope, SectionLocator};
use self::segment::{DuplicatePolicy, SegmentStats};
use self::types::{ContentNode, ScholarshipRecord, Source};

/// Which part of the page was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopeReport {
    Section { tag: String, matched: &'static str, text: String },
    Page,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub scope: ScopeReport,
    /// Set when the located section was empty and the whole page was scanned instead.
    pub section_fallback: bool,
    pub nodes: usize,
    pub triggers: usize,
    pub emitted: usize,
    pub duplicates: usize,
    pub discarded: usize,
}

/// Per-run extraction state: one classifier, one seen-set, all records so far.
pub struct ExtractionPipeline {
    classifier: FieldClassifier,
    locator: SectionLocator,
    dedup: Deduplicator,
    policy: DuplicatePolicy,
    records: Vec<ScholarshipRecord>,
}

impl ExtractionPipeline {
    pub fn new<S: AsRef<str>>(name_tokens: &[S], policy: DuplicatePolicy) -> Result<Self> {
        Ok(ExtractionPipeline {
            classifier: FieldClassifier::new(name_tokens)?,
            locator: SectionLocator::new()?,
            dedup: Deduplicator::new(),
            policy,
            records: Vec::new(),
        })
    }

    pub fn extract_nodes(&mut self, source: &Source, page_url: &str, nodes: &[ContentNode]) -> SegmentStats {
        let (mut records, stats) = segment::segment(
            source,
            page_url,
            nodes,
            &self.classifier,
            &mut self.dedup,
            self.policy,
        );
        self.records.append(&mut records);
        stats
    }

    pub fn extract_html(&mut self, source: &Source, page_url: &str, html: &str) -> PageReport {
        let doc = Html::parse_document(html);
        let scope = self.locator.locate(&doc);
        let scope_report = describe(&scope);
        let (nodes, section_fallback) = flatten::flatten_scope(&doc, &scope);
        let stats = self.extract_nodes(source, page_url, &nodes);
        PageReport {
            scope: scope_report,
            section_fallback: section_fallback && !scope.is_page(),
            nodes: nodes.len(),
            triggers: stats.triggers,
            emitted: stats.emitted,
            duplicates: stats.duplicates,
            discarded: stats.discarded,
        }
    }

    pub fn records(&self) -> &[ScholarshipRecord] { &self.records }

    pub fn into_records(self) -> Vec<ScholarshipRecord> { self.records }
}

fn describe(scope: &Scope<'_>) -> ScopeReport {
    match scope {
        Scope::Section { element, matched } => ScopeReport::Section {
            tag: element.value().name().to_string(),
            matched: match matched { MatchKind::Text => "text", MatchKind::Class => "class" },
            text: preview(&flatten::rendered_text(*element), 80),
        },
        Scope::Page => ScopeReport::Page,
    }
}
