use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html};

use super::classify::SECTION_KEYWORDS;
use super::flatten::is_hidden;

/// Tags tried in order when looking for the scholarship section.
pub const SECTION_TAGS: &[&str] = &["h1", "h2", "h3", "div", "section", "article"];

const CLASS_KEYWORDS: &str = r"scholarship|merit|financial|fees|award|item|list";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Text,
    Class,
}

#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Section { element: ElementRef<'a>, matched: MatchKind },
    Page,
}

impl Scope<'_> {
    pub fn is_page(&self) -> bool { matches!(self, Scope::Page) }
}

pub struct SectionLocator {
    text_pattern: Regex,
    class_pattern: Regex,
}

impl SectionLocator {
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(SECTION_KEYWORDS, CLASS_KEYWORDS)
    }

    pub fn with_vocabulary(text_vocab: &str, class_vocab: &str) -> Result<Self> {
        let text_pattern = RegexBuilder::new(text_vocab)
            .case_insensitive(true)
            .build()
            .context("compile section text pattern")?;
        let class_pattern = RegexBuilder::new(class_vocab)
            .case_insensitive(true)
            .build()
            .context("compile section class pattern")?;
        Ok(SectionLocator { text_pattern, class_pattern })
    }

    /// First section by tag priority, then text-before-class, then document order.
    /// Falls back to the whole page when nothing qualifies.
    pub fn locate<'a>(&self, doc: &'a Html) -> Scope<'a> {
        for tag in SECTION_TAGS {
            let text_hit = elements_named(doc, tag).find(|el| {
                own_string(*el).is_some_and(|s| self.text_pattern.is_match(&s))
            });
            if let Some(element) = text_hit {
                return Scope::Section { element, matched: MatchKind::Text };
            }

            let class_hit = elements_named(doc, tag)
                .find(|el| el.value().classes().any(|c| self.class_pattern.is_match(c)));
            if let Some(element) = class_hit {
                return Scope::Section { element, matched: MatchKind::Class };
            }
        }
        Scope::Page
    }
}

fn elements_named<'a>(doc: &'a Html, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

// The element's sole string: its only child if that is text, or the sole
// string of its only child element. Mixed content has none.
fn own_string(el: ElementRef<'_>) -> Option<String> {
    if is_hidden(el) { return None; }
    let mut children = el.children();
    let only = children.next()?;
    if children.next().is_some() { return None; }
    if let Some(text) = only.value().as_text() {
        let s: &str = &text.text;
        return Some(s.to_string());
    }
    ElementRef::wrap(only).and_then(own_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate_name(html: &str) -> Option<(String, MatchKind)> {
        let doc = Html::parse_document(html);
        match SectionLocator::new().unwrap().locate(&doc) {
            Scope::Section { element, matched } => {
                let label = format!("{}#{}", element.value().name(), element.value().id().unwrap_or(""));
                Some((label, matched))
            }
            Scope::Page => None,
        }
    }

    #[test]
    fn heading_text_beats_containers() {
        let html = r#"<html><body>
            <div id="d" class="scholarship-list"><p>x</p></div>
            <h2 id="h">Merit Scholarships</h2>
        </body></html>"#;
        assert_eq!(locate_name(html), Some(("h2#h".into(), MatchKind::Text)));
    }

    #[test]
    fn text_match_beats_class_match_for_same_tag() {
        let html = r#"<html><body>
            <div id="first" class="news-item"><p>x</p></div>
            <div id="second">Financial Aid</div>
        </body></html>"#;
        assert_eq!(locate_name(html), Some(("div#second".into(), MatchKind::Text)));
    }

    #[test]
    fn class_match_when_no_text_match() {
        let html = r#"<html><body>
            <div id="nav"><a href="/">Home</a><a href="/x">About</a></div>
            <section id="s" class="AwardList"><p>Something</p></section>
        </body></html>"#;
        assert_eq!(locate_name(html), Some(("section#s".into(), MatchKind::Class)));
    }

    #[test]
    fn mixed_content_has_no_own_string() {
        let html = r#"<html><body>
            <h1 id="t">Our <em>scholarship</em> programme</h1>
            <h3 id="k"><strong>Award winners</strong></h3>
        </body></html>"#;
        assert_eq!(locate_name(html), Some(("h3#k".into(), MatchKind::Text)));
    }

    #[test]
    fn script_strings_do_not_mark_a_section() {
        let html = r#"<html><body>
            <div id="js"><script>var scholarship = true;</script></div>
            <div id="real">Financial Aid</div>
        </body></html>"#;
        assert_eq!(locate_name(html), Some(("div#real".into(), MatchKind::Text)));
    }

    #[test]
    fn no_candidate_falls_back_to_page() {
        let html = r#"<html><body><h1>Welcome</h1><p>Campus tour</p></body></html>"#;
        assert_eq!(locate_name(html), None);
    }

    #[test]
    fn locating_is_repeatable() {
        let html = r#"<html><body><h3 id="a">Fees</h3><h3 id="b">Award</h3></body></html>"#;
        let first = locate_name(html);
        assert_eq!(first, locate_name(html));
        assert_eq!(first, Some(("h3#a".into(), MatchKind::Text)));
    }
}
