use std::collections::{BTreeSet, HashMap};

use ndarray::{Array1, Array2, ArrayView1, Axis};

use super::text::tokenize;

/// TF-IDF matrix over a cleaned corpus, one L2-normalized row per document.
pub struct TfidfIndex {
    vocab: HashMap<String, usize>,
    idf: Array1<f64>,
    matrix: Array2<f64>,
}

impl TfidfIndex {
    pub fn fit<S: AsRef<str>>(docs: &[S]) -> Self {
        let terms: BTreeSet<&str> = docs.iter().flat_map(|d| tokenize(d.as_ref())).collect();
        let vocab: HashMap<String, usize> = terms.into_iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect();

        let (n, v) = (docs.len(), vocab.len());
        let mut counts = Array2::<f64>::zeros((n, v));
        for (i, doc) in docs.iter().enumerate() {
            for tok in tokenize(doc.as_ref()) {
                if let Some(&j) = vocab.get(tok) { counts[[i, j]] += 1.0; }
            }
        }

        // smooth idf: ln((1 + n) / (1 + df)) + 1
        let df = counts.map(|&c| if c > 0.0 { 1.0 } else { 0.0 }).sum_axis(Axis(0));
        let idf = df.mapv(|d| ((1.0 + n as f64) / (1.0 + d)).ln() + 1.0);

        let mut matrix = counts * &idf;
        for mut row in matrix.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 { row /= norm; }
        }
        TfidfIndex { vocab, idf, matrix }
    }

    pub fn len(&self) -> usize { self.matrix.nrows() }

    pub fn vocab_len(&self) -> usize { self.vocab.len() }

    /// Query vector in the fitted vocabulary; unknown terms are ignored.
    pub fn transform(&self, cleaned: &str) -> Array1<f64> {
        let mut q = Array1::<f64>::zeros(self.vocab.len());
        for tok in tokenize(cleaned) {
            if let Some(&j) = self.vocab.get(tok) { q[j] += 1.0; }
        }
        q *= &self.idf;
        let norm = q.dot(&q).sqrt();
        if norm > 0.0 { q /= norm; }
        q
    }

    /// Cosine similarity of the query against every document.
    pub fn similarities(&self, cleaned_query: &str) -> Array1<f64> {
        let q = self.transform(cleaned_query);
        self.matrix.dot(&q)
    }
}

/// Indices of the `n` highest scores, descending; equal scores keep corpus order.
pub fn top_n(scores: ArrayView1<'_, f64>, n: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    #[test]
    fn rows_are_unit_length() {
        let idx = TfidfIndex::fit(&["merit scholarship btech", "sports quota", "merit merit award"]);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.vocab_len(), 6);
        for row in idx.matrix.axis_iter(Axis(0)) {
            assert!(close(row.dot(&row), 1.0));
        }
    }

    #[test]
    fn idf_is_smoothed() {
        let idx = TfidfIndex::fit(&["alpha beta", "alpha"]);
        let alpha = idx.vocab["alpha"];
        let beta = idx.vocab["beta"];
        assert!(close(idx.idf[alpha], 1.0));
        assert!(close(idx.idf[beta], (3.0f64 / 2.0).ln() + 1.0));
    }

    #[test]
    fn identical_text_scores_one() {
        let idx = TfidfIndex::fit(&["merit scholarship btech", "sports quota"]);
        let sims = idx.similarities("merit scholarship btech");
        assert!(close(sims[0], 1.0));
        assert!(close(sims[1], 0.0));
    }

    #[test]
    fn unknown_query_terms_score_zero() {
        let idx = TfidfIndex::fit(&["merit scholarship"]);
        let sims = idx.similarities("hostel canteen");
        assert!(close(sims[0], 0.0));
    }

    #[test]
    fn top_n_is_stable_on_ties() {
        let scores = Array1::from(vec![0.2, 0.5, 0.2, 0.9, 0.0]);
        let top = top_n(scores.view(), 4);
        let idx: Vec<usize> = top.iter().map(|(i, _)| *i).collect();
        assert_eq!(idx, [3, 1, 0, 2]);
        assert_eq!(top_n(scores.view(), 10).len(), 5);
    }
}
