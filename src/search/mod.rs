use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use crate::config;
use crate::telemetry::{self, ops::search::Phase as SearchPhase};
use crate::util::text::preview;

mod corpus;
mod ndcg;
mod text;
mod tfidf;

pub use corpus::Corpus;
pub use ndcg::Grade;
pub use tfidf::TfidfIndex;

#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Free-text query, e.g. "scholarships for btech students in andhra pradesh"
    pub query: String,
    /// CSV to search (default: $SCHOLAR_CSV or scholarships.csv)
    #[arg(long)] pub csv: Option<PathBuf>,
    #[arg(long, default_value_t = 5)] pub top_n: usize,
    /// Relevance feedback for a shown result, RANK=GRADE with GRADE 0-3; repeatable
    #[arg(long = "grade")] pub grades: Vec<Grade>,
    #[arg(long, default_value_t = false)] pub show_details: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub score: f64,
    pub row: usize,
    pub university: String,
    pub state: String,
    pub name: String,
    pub amount: String,
    pub deadline: String,
    pub eligibility: String,
    pub details: String,
    pub link: String,
}

#[derive(Serialize)]
struct SearchResult<'a> {
    query: &'a str,
    corpus: usize,
    hits: &'a [SearchHit],
    #[serde(skip_serializing_if = "Option::is_none")]
    ndcg: Option<f64>,
}

/// Ranks the corpus against `query`. An empty corpus yields no hits.
/// Rows with equal scores are listed in CSV order.
pub fn search(corpus: &Corpus, index: &TfidfIndex, query: &str, top_n: usize) -> Vec<SearchHit> {
    if corpus.is_empty() { return Vec::new(); }
    let sims = index.similarities(&text::clean_text(query));
    tfidf::top_n(sims.view(), top_n)
        .into_iter()
        .enumerate()
        .map(|(i, (row, score))| {
            let r = &corpus.records[row];
            SearchHit {
                rank: i + 1,
                score,
                row,
                university: r.university.clone(),
                state: r.state.clone(),
                name: r.name.clone(),
                amount: r.amount.trim_end().to_string(),
                deadline: r.deadline.trim_end().to_string(),
                eligibility: r.eligibility.trim_end().to_string(),
                details: r.details.trim_end().to_string(),
                link: r.link.clone(),
            }
        })
        .collect()
}

/// NDCG of the graded hits, ordered by their cosine score. Later grades for
/// the same rank replace earlier ones.
pub fn feedback_ndcg(hits: &[SearchHit], grades: &[Grade]) -> Result<Option<f64>> {
    if grades.is_empty() { return Ok(None); }
    let mut by_rank: BTreeMap<usize, u8> = BTreeMap::new();
    for g in grades {
        if g.rank > hits.len() { bail!("grade for rank {} but only {} result(s) shown", g.rank, hits.len()); }
        by_rank.insert(g.rank, g.grade);
    }
    let (relevance, predicted): (Vec<f64>, Vec<f64>) = by_rank
        .iter()
        .map(|(&rank, &grade)| (grade as f64, hits[rank - 1].score))
        .unzip();
    Ok(Some(ndcg::ndcg(&relevance, &predicted)))
}

pub async fn run(args: SearchCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::search();
    let csv_path = config::csv_path(args.csv.clone());
    let _g = log.root_span_kv([
        ("query", args.query.clone()),
        ("csv", csv_path.display().to_string()),
        ("top_n", args.top_n.to_string()),
        ("grades", args.grades.len().to_string()),
    ]).entered();

    let corpus = {
        let _s = log.span(&SearchPhase::Load).entered();
        Corpus::load(&csv_path)?
    };
    let index = {
        let _s = log.span(&SearchPhase::Index).entered();
        TfidfIndex::fit(&corpus.cleaned)
    };
    log.debug_kv("index built", [("docs", index.len().to_string()), ("vocab", index.vocab_len().to_string())]);

    let hits = {
        let _s = log.span(&SearchPhase::Rank).entered();
        search(&corpus, &index, &args.query, args.top_n)
    };
    let ndcg = {
        let _s = log.span(&SearchPhase::Feedback).entered();
        feedback_ndcg(&hits, &args.grades)?
    };

    let _out = log.span(&SearchPhase::Output).entered();
    if telemetry::config::json_mode() {
        let result = SearchResult { query: &args.query, corpus: corpus.len(), hits: &hits, ndcg };
        log.result_timed(&result, started)?;
        return Ok(());
    }

    if hits.is_empty() {
        println!("😕 No scholarships matched your search.");
        return Ok(());
    }
    println!("🔎 Top matching scholarships for {:?}:", args.query);
    for h in &hits {
        println!("#{}  score={:.4}  🏫 {} - {}", h.rank, h.score, h.university, h.state);
        println!("  🎓 {}", h.name);
        println!("  💰 Amount: {}", h.amount);
        println!("  🗓 Deadline: {}", h.deadline);
        println!("  🎯 Eligibility: {}", h.eligibility);
        if args.show_details {
            println!("  📌 Details: {}", h.details);
        } else {
            println!("  📌 Details: {}", preview(&h.details, 160));
        }
        println!("  🔗 {}", h.link);
    }
    if let Some(score) = ndcg {
        println!("📈 NDCG based on your feedback: {:.4}", score);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::types::{ScholarshipRecord, Source};
    use crate::scrape::write;

    fn rec(uni: &str, state: &str, name: &str, details: &str, amount: &str) -> ScholarshipRecord {
        let src = Source::new(uni, "https://example.edu/", state);
        let mut r = ScholarshipRecord::open(&src, name, &src.url);
        r.details = details.to_string();
        r.amount = amount.to_string();
        r
    }

    fn corpus() -> Corpus {
        Corpus::from_records(vec![
            rec("VIT-AP", "Andhra Pradesh", "Merit Scholarship", "Merit scholarship for BTech students ", "100% tuition waiver "),
            rec("Christ University", "Karnataka", "Sports Scholarship", "For national level athletes ", "Up to ₹50,000 "),
            rec("SRM AP", "Andhra Pradesh", "Founder's Scholarship", "BTech admission merit list toppers ", "50% waiver "),
        ])
    }

    #[test]
    fn ranks_relevant_records_first() {
        let c = corpus();
        let idx = TfidfIndex::fit(&c.cleaned);
        let hits = search(&c, &idx, "merit scholarships for BTech students", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].university, "VIT-AP");
        assert_eq!(hits[0].rank, 1);
        assert_eq!(hits[1].university, "SRM AP");
        assert!(hits[0].score >= hits[1].score);
        assert_eq!(hits[0].amount, "100% tuition waiver");
    }

    #[test]
    fn zero_scores_still_fill_the_list() {
        let c = corpus();
        let idx = TfidfIndex::fit(&c.cleaned);
        let hits = search(&c, &idx, "hostel canteen", 5);
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.score == 0.0));
        let rows: Vec<usize> = hits.iter().map(|h| h.row).collect();
        assert_eq!(rows, [0, 1, 2]);
    }

    #[test]
    fn empty_corpus_has_no_hits() {
        let c = Corpus::from_records(Vec::new());
        let idx = TfidfIndex::fit(&c.cleaned);
        assert!(search(&c, &idx, "merit", 5).is_empty());
    }

    #[test]
    fn feedback_scores_graded_hits() {
        let c = corpus();
        let idx = TfidfIndex::fit(&c.cleaned);
        let hits = search(&c, &idx, "merit btech", 3);

        assert_eq!(feedback_ndcg(&hits, &[]).unwrap(), None);

        let grades = [Grade { rank: 1, grade: 3 }, Grade { rank: 2, grade: 1 }];
        assert_eq!(feedback_ndcg(&hits, &grades).unwrap(), Some(1.0));

        let grades = [Grade { rank: 1, grade: 0 }, Grade { rank: 3, grade: 0 }];
        assert_eq!(feedback_ndcg(&hits, &grades).unwrap(), Some(0.0));

        assert!(feedback_ndcg(&hits, &[Grade { rank: 4, grade: 2 }]).is_err());
    }

    #[tokio::test]
    async fn searches_csv_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scholarships.csv");
        write::write_records_to_path(&path, &corpus().records).unwrap();

        let loaded = Corpus::load(&path).unwrap();
        assert_eq!(loaded.len(), 3);

        let args = SearchCmd {
            query: "athletes".into(),
            csv: Some(path),
            top_n: 1,
            grades: vec![Grade { rank: 1, grade: 2 }],
            show_details: true,
        };
        run(args).await.unwrap();
    }
}
