use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Error};

pub const MAX_GRADE: u8 = 3;

/// Relevance grade given to the result shown at `rank` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub rank: usize,
    pub grade: u8,
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rank, grade) = s.split_once('=').ok_or_else(|| anyhow!("expected RANK=GRADE, got {s:?}"))?;
        let rank: usize = rank.trim().parse().with_context(|| format!("bad rank in {s:?}"))?;
        let grade: u8 = grade.trim().parse().with_context(|| format!("bad grade in {s:?}"))?;
        if rank == 0 { bail!("ranks start at 1"); }
        if grade > MAX_GRADE { bail!("grade {grade} out of range 0-{MAX_GRADE}"); }
        Ok(Grade { rank, grade })
    }
}

/// NDCG of `relevance` when ordered by `predicted` (descending).
/// Linear gains, `1/log2(i+2)` discounts; items with equal predicted scores
/// share the mean gain of their group. 0 when no item is relevant.
pub fn ndcg(relevance: &[f64], predicted: &[f64]) -> f64 {
    debug_assert_eq!(relevance.len(), predicted.len());
    let idcg = tie_averaged_dcg(relevance, relevance);
    if idcg == 0.0 { return 0.0; }
    tie_averaged_dcg(relevance, predicted) / idcg
}

fn tie_averaged_dcg(gains: &[f64], scores: &[f64]) -> f64 {
    let mut order: Vec<usize> = (0..gains.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut total = 0.0;
    let mut pos = 0;
    for group in order.chunk_by(|&a, &b| scores[a] == scores[b]) {
        let mean_gain = group.iter().map(|&i| gains[i]).sum::<f64>() / group.len() as f64;
        let discounts: f64 = (pos..pos + group.len()).map(discount).sum();
        total += mean_gain * discounts;
        pos += group.len();
    }
    total
}

fn discount(i: usize) -> f64 { 1.0 / ((i + 2) as f64).log2() }
