use serde::{Deserialize, Serialize};

/// A configured scholarship page: where to fetch it and what to stamp on its records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub state: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>, state: impl Into<String>) -> Self {
        Source { name: name.into(), url: url.into(), state: state.into() }
    }
}

/// Element kinds the segmenter understands. Anything else never becomes a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Heading(u8),
    Paragraph,
    ListItem,
    Container,
    Span,
    Table,
    Anchor,
    List,
    Article,
}

impl Tag {
    pub fn from_element_name(name: &str) -> Option<Tag> {
        let tag = match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "li" => Tag::ListItem,
            "div" => Tag::Container,
            "span" => Tag::Span,
            "table" => Tag::Table,
            "a" => Tag::Anchor,
            "ul" => Tag::List,
            "article" => Tag::Article,
            _ => return None,
        };
        Some(tag)
    }
}

/// One rendered element in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    pub tag: Tag,
    pub text: String,
    pub href: Option<String>,
    /// Cell texts per row; only populated for tables.
    pub rows: Vec<Vec<String>>,
}

impl ContentNode {
    pub fn new(tag: Tag, text: impl Into<String>) -> Self {
        ContentNode { tag, text: text.into(), href: None, rows: Vec::new() }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self { Self::new(Tag::Heading(level), text) }
    pub fn paragraph(text: impl Into<String>) -> Self { Self::new(Tag::Paragraph, text) }
    pub fn container(text: impl Into<String>) -> Self { Self::new(Tag::Container, text) }

    pub fn anchor(text: impl Into<String>, href: Option<String>) -> Self {
        ContentNode { href, ..Self::new(Tag::Anchor, text) }
    }

    pub fn table(rows: Vec<Vec<String>>) -> Self {
        let text = rows.iter().map(|r| r.join(" ")).collect::<Vec<_>>().join(" ");
        ContentNode { rows, ..Self::new(Tag::Table, text) }
    }
}

/// Column order here is the persisted column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    pub state: String,
    pub university: String,
    pub name: String,
    pub details: String,
    pub eligibility: String,
    pub amount: String,
    pub deadline: String,
    pub link: String,
}

impl ScholarshipRecord {
    pub fn open(source: &Source, name: &str, page_url: &str) -> Self {
        ScholarshipRecord {
            state: source.state.clone(),
            university: source.name.clone(),
            name: name.to_string(),
            details: String::new(),
            eligibility: String::new(),
            amount: String::new(),
            deadline: String::new(),
            link: page_url.to_string(),
        }
    }
}
