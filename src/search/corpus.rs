use std::path::Path;

use anyhow::Result;

use crate::extraction::types::ScholarshipRecord;
use crate::scrape::write::read_records_from_path;

use super::text::clean_text;

/// Searchable text of one record.
pub fn combined_text(r: &ScholarshipRecord) -> String {
    format!("{} {} {} {}", r.details, r.eligibility, r.university, r.amount)
}

/// Persisted records alongside their cleaned search text.
pub struct Corpus {
    pub records: Vec<ScholarshipRecord>,
    pub cleaned: Vec<String>,
}

impl Corpus {
    pub fn from_records(records: Vec<ScholarshipRecord>) -> Self {
        let cleaned = records.iter().map(|r| clean_text(&combined_text(r))).collect();
        Corpus { records, cleaned }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_records(read_records_from_path(path)?))
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}
