use url::Url;

fn is_relevant(href: &str) -> bool {
    let lower = href.to_lowercase();
    lower.contains("apply") || lower.contains("scholarship")
}

/// Absolute link for an application/scholarship anchor, or `None` when the
/// anchor is unrelated and the current link should stay.
pub fn resolve(href: &str, base_url: &str) -> Option<String> {
    if !is_relevant(href) { return None; }
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    Some(format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_relative_href_onto_page_url() {
        assert_eq!(
            resolve("/apply/now", "https://uni.edu/fees/").as_deref(),
            Some("https://uni.edu/fees/apply/now")
        );
        assert_eq!(
            resolve("scholarship-form.pdf", "https://uni.edu/aid").as_deref(),
            Some("https://uni.edu/aid/scholarship-form.pdf")
        );
    }

    #[test]
    fn absolute_href_is_kept() {
        assert_eq!(resolve("https://x.com/apply", "https://uni.edu/").as_deref(), Some("https://x.com/apply"));
    }

    #[test]
    fn relevance_ignores_case() {
        assert!(resolve("/Scholarships/2025", "https://uni.edu").is_some());
        assert!(resolve("/APPLY", "https://uni.edu").is_some());
    }

    #[test]
    fn unrelated_href_is_ignored() {
        assert_eq!(resolve("/contact-us", "https://uni.edu/"), None);
        assert_eq!(resolve("https://x.com/about", "https://uni.edu/"), None);
    }
}
