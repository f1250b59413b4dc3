use super::classify::{FieldClassifier, Label, LabelSet};
use super::dedup::{dedup_key, Deduplicator};
use super::link;
use super::types::{ContentNode, ScholarshipRecord, Source, Tag};

/// What happens to an open record when the next heading turns out to be a duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Drop the open record without emitting it.
    #[default]
    DropOpen,
    /// Emit the open record, then go idle.
    EmitOpen,
}

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Open(ScholarshipRecord),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    pub triggers: usize,
    pub emitted: usize,
    pub duplicates: usize,
    pub discarded: usize,
}

/// Walks one page's node sequence and turns it into records.
pub struct RecordSegmenter<'a> {
    source: &'a Source,
    page_url: &'a str,
    classifier: &'a FieldClassifier,
    dedup: &'a mut Deduplicator,
    policy: DuplicatePolicy,
    state: ScanState,
    out: Vec<ScholarshipRecord>,
    stats: SegmentStats,
}

impl<'a> RecordSegmenter<'a> {
    pub fn new(
        source: &'a Source,
        page_url: &'a str,
        classifier: &'a FieldClassifier,
        dedup: &'a mut Deduplicator,
        policy: DuplicatePolicy,
    ) -> Self {
        RecordSegmenter {
            source,
            page_url,
            classifier,
            dedup,
            policy,
            state: ScanState::Idle,
            out: Vec::new(),
            stats: SegmentStats::default(),
        }
    }

    pub fn feed(&mut self, node: &ContentNode) {
        let labels = match node.tag {
            Tag::Container | Tag::Span | Tag::Article | Tag::Paragraph | Tag::ListItem | Tag::List
                if !node.text.is_empty() => self.classifier.classify(&node.text),
            _ => LabelSet::default(),
        };

        match node.tag {
            Tag::Heading(_) => self.on_trigger(&node.text),
            Tag::Container | Tag::Span | Tag::Article if labels.contains(Label::HeadingTrigger) => {
                self.on_trigger(&node.text)
            }
            Tag::Paragraph | Tag::ListItem | Tag::Container | Tag::Span | Tag::List | Tag::Article => {
                if node.text.is_empty() { return; }
                let ScanState::Open(rec) = &mut self.state else { return };
                append_text(rec, &node.text, labels);
            }
            Tag::Table => {
                let ScanState::Open(rec) = &mut self.state else { return };
                for row in &node.rows {
                    rec.details.push_str(&row.join(" | "));
                    rec.details.push(' ');
                }
            }
            Tag::Anchor => {
                let Some(href) = node.href.as_deref().filter(|h| !h.is_empty()) else { return };
                let ScanState::Open(rec) = &mut self.state else { return };
                if let Some(resolved) = link::resolve(href, self.page_url) {
                    rec.link = resolved;
                }
            }
        }
    }

    pub fn finish(mut self) -> (Vec<ScholarshipRecord>, SegmentStats) {
        self.close();
        (self.out, self.stats)
    }

    fn on_trigger(&mut self, text: &str) {
        self.stats.triggers += 1;
        let key = dedup_key(&self.source.name, text);
        if !self.dedup.admit(&key) {
            self.stats.duplicates += 1;
            match self.policy {
                DuplicatePolicy::DropOpen => {
                    if let ScanState::Open(_) = std::mem::take(&mut self.state) {
                        self.stats.discarded += 1;
                    }
                }
                DuplicatePolicy::EmitOpen => self.close(),
            }
            return;
        }
        self.close();
        self.state = ScanState::Open(ScholarshipRecord::open(self.source, text, self.page_url));
    }

    fn close(&mut self) {
        if let ScanState::Open(rec) = std::mem::take(&mut self.state) {
            self.out.push(rec);
            self.stats.emitted += 1;
        }
    }
}

fn append_text(rec: &mut ScholarshipRecord, text: &str, labels: LabelSet) {
    let buckets = [
        (Label::Amount, &mut rec.amount),
        (Label::Eligibility, &mut rec.eligibility),
        (Label::Deadline, &mut rec.deadline),
    ];
    rec.details.push_str(text);
    rec.details.push(' ');
    for (label, field) in buckets {
        if labels.contains(label) {
            field.push_str(text);
            field.push(' ');
        }
    }
}

/// Segments a full node sequence in one go.
pub fn segment(
    source: &Source,
    page_url: &str,
    nodes: &[ContentNode],
    classifier: &FieldClassifier,
    dedup: &mut Deduplicator,
    policy: DuplicatePolicy,
) -> (Vec<ScholarshipRecord>, SegmentStats) {
    let mut seg = RecordSegmenter::new(source, page_url, classifier, dedup, policy);
    for node in nodes {
        seg.feed(node);
    }
    seg.finish()
}
