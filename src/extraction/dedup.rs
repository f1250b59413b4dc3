use std::collections::HashSet;

pub fn dedup_key(university: &str, name: &str) -> String {
    format!("{}_{}", university.to_lowercase(), name.to_lowercase())
}

/// Run-scoped set of scholarship keys already seen.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self { Self::default() }

    /// True (and remembered) the first time a key shows up, false afterwards.
    pub fn admit(&mut self, key: &str) -> bool {
        if self.seen.contains(key) { return false; }
        self.seen.insert(key.to_string())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize { self.seen.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_once_per_key() {
        let mut d = Deduplicator::new();
        assert!(d.admit("x_merit"));
        assert!(!d.admit("x_merit"));
        assert!(!d.admit("x_merit"));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn key_folds_case_and_keeps_university() {
        assert_eq!(dedup_key("VIT-AP", "Merit Scholarship"), "vit-ap_merit scholarship");
        let mut d = Deduplicator::new();
        assert!(d.admit(&dedup_key("VIT-AP", "Merit Scholarship")));
        assert!(!d.admit(&dedup_key("vit-ap", "MERIT SCHOLARSHIP")));
        assert!(d.admit(&dedup_key("Manipal", "Merit Scholarship")));
    }
}
