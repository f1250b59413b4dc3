use scraper::{ElementRef, Html, Node};

use super::locate::Scope;
use super::types::{ContentNode, Tag};
use crate::util::text::collapse_whitespace;

/// Element names collected into the node sequence, in document order.
pub const CONTENT_TAGS: &[&str] = &["h3", "h4", "p", "li", "div", "span", "table", "a", "ul", "article"];

/// Subtrees whose text is never rendered.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub(crate) fn is_hidden(el: ElementRef<'_>) -> bool {
    HIDDEN_TAGS.contains(&el.value().name())
}

/// Whitespace-collapsed text of `el`, leaving out script/style/noscript/template content.
pub fn rendered_text(el: ElementRef<'_>) -> String {
    let mut buf = String::new();
    push_rendered(el, &mut buf);
    collapse_whitespace(&buf)
}

fn push_rendered(el: ElementRef<'_>, buf: &mut String) {
    if is_hidden(el) { return; }
    for child in el.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(&text.text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) { push_rendered(child_el, buf); }
            }
            _ => {}
        }
    }
}

/// Flattens everything below `root` (not `root` itself).
pub fn flatten(root: ElementRef<'_>) -> Vec<ContentNode> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| !is_hidden(*el) && !el.ancestors().filter_map(ElementRef::wrap).any(is_hidden))
        .filter_map(to_node)
        .collect()
}

/// Flattens the located scope; an empty section falls back to the whole page.
pub fn flatten_scope(doc: &Html, scope: &Scope<'_>) -> (Vec<ContentNode>, bool) {
    if let Scope::Section { element, .. } = scope {
        let nodes = flatten(*element);
        if !nodes.is_empty() { return (nodes, false); }
    }
    (flatten(doc.root_element()), true)
}

fn to_node(el: ElementRef<'_>) -> Option<ContentNode> {
    let name = el.value().name();
    if !CONTENT_TAGS.contains(&name) { return None; }
    let tag = Tag::from_element_name(name)?;
    let text = rendered_text(el);
    let node = match tag {
        Tag::Anchor => {
            let href = el.value().attr("href").map(str::to_string);
            ContentNode::anchor(text, href)
        }
        Tag::Table => ContentNode { rows: table_rows(el), ..ContentNode::new(tag, text) },
        _ => ContentNode::new(tag, text),
    };
    Some(node)
}

fn table_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(|row| {
            row.descendants()
                .filter_map(ElementRef::wrap)
                .filter(|c| matches!(c.value().name(), "td" | "th"))
                .map(rendered_text)
                .collect()
        })
        .collect()
}
