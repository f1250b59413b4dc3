use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

/// Vocabulary that marks a fragment as a scholarship title or section.
pub const SECTION_KEYWORDS: &str = r"scholarship|merit|financial aid|fees|award";

/// Scholarship-name tokens recognized on the default deployment.
pub const DEFAULT_NAME_TOKENS: &[&str] = &[
    "freeship", "GV", "Rajeswari", "Kalam", "EduEmpower", "Achiever", "Scholar",
];

const AMOUNT_PATTERN: &str = r"[$₹£€]\s?\d|up to|worth|waiver|free";
const ELIGIBILITY_PATTERN: &str = r"eligible|criteria|requirement|rank|cgpa|score|marks|percentile";
const DEADLINE_PATTERN: &str = r"deadline|apply by|closing|\d{1,2}/\d{1,2}/\d{4}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    HeadingTrigger,
    Amount,
    Eligibility,
    Deadline,
}

impl Label {
    fn bit(self) -> u8 {
        match self {
            Label::HeadingTrigger => 1,
            Label::Amount => 1 << 1,
            Label::Eligibility => 1 << 2,
            Label::Deadline => 1 << 3,
        }
    }
}

/// Non-exclusive set of labels attached to a single fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelSet(u8);

impl LabelSet {
    pub fn insert(&mut self, label: Label) { self.0 |= label.bit(); }
    pub fn contains(&self, label: Label) -> bool { self.0 & label.bit() != 0 }
    pub fn is_empty(&self) -> bool { self.0 == 0 }
}

struct Rule {
    label: Label,
    pattern: Regex,
}

/// Table-driven matcher; every rule runs against every fragment.
pub struct FieldClassifier {
    rules: Vec<Rule>,
}

impl FieldClassifier {
    pub fn new<S: AsRef<str>>(name_tokens: &[S]) -> Result<Self> {
        let mut trigger = SECTION_KEYWORDS.to_string();
        for token in name_tokens {
            let token = token.as_ref().trim();
            if token.is_empty() { continue; }
            trigger.push('|');
            trigger.push_str(&regex::escape(token));
        }

        let table: [(Label, &str); 4] = [
            (Label::HeadingTrigger, trigger.as_str()),
            (Label::Amount, AMOUNT_PATTERN),
            (Label::Eligibility, ELIGIBILITY_PATTERN),
            (Label::Deadline, DEADLINE_PATTERN),
        ];

        let mut rules = Vec::with_capacity(table.len());
        for (label, pattern) in table {
            let pattern = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("compile {:?} pattern", label))?;
            rules.push(Rule { label, pattern });
        }
        Ok(FieldClassifier { rules })
    }

    pub fn with_default_tokens() -> Result<Self> {
        Self::new(DEFAULT_NAME_TOKENS)
    }

    pub fn classify(&self, text: &str) -> LabelSet {
        let mut labels = LabelSet::default();
        for rule in &self.rules {
            if rule.pattern.is_match(text) { labels.insert(rule.label); }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> FieldClassifier {
        FieldClassifier::with_default_tokens().unwrap()
    }

    #[test]
    fn single_fragment_feeds_several_fields() {
        let labels = classifier().classify("Merit scholarship: up to ₹50,000, deadline 31/07/2025");
        assert!(labels.contains(Label::HeadingTrigger));
        assert!(labels.contains(Label::Amount));
        assert!(labels.contains(Label::Deadline));
        assert!(!labels.contains(Label::Eligibility));
    }

    #[test]
    fn matching_ignores_case() {
        let c = classifier();
        assert!(c.classify("FINANCIAL AID office").contains(Label::HeadingTrigger));
        assert!(c.classify("Minimum CGPA of 8.5").contains(Label::Eligibility));
        assert!(c.classify("APPLY BY next Friday").contains(Label::Deadline));
        assert!(c.classify("Tuition WAIVER").contains(Label::Amount));
    }

    #[test]
    fn name_tokens_trigger_headings() {
        let c = classifier();
        assert!(c.classify("Dr. APJ Abdul Kalam Award").contains(Label::HeadingTrigger));
        assert!(c.classify("EduEmpower programme").contains(Label::HeadingTrigger));
        assert!(!c.classify("Campus life and hostels").contains(Label::HeadingTrigger));
    }

    #[test]
    fn custom_tokens_are_literal() {
        let c = FieldClassifier::new(&["A+ Grant"]).unwrap();
        assert!(c.classify("the a+ grant for women").contains(Label::HeadingTrigger));
        assert!(!c.classify("aa grant").contains(Label::HeadingTrigger));
    }

    #[test]
    fn currency_requires_a_digit() {
        let c = classifier();
        assert!(c.classify("₹20,000 per year").contains(Label::Amount));
        assert!(c.classify("$ 500 stipend").contains(Label::Amount));
        assert!(!c.classify("paid in ₹ annually").contains(Label::Amount));
    }

    #[test]
    fn date_pattern_counts_as_deadline() {
        assert!(classifier().classify("Submit before 5/8/2025").contains(Label::Deadline));
    }

    #[test]
    fn plain_text_has_no_labels() {
        assert!(classifier().classify("Welcome to the campus").is_empty());
    }
}
