use ammonia::{Builder, UrlRelative};

/// Sanitizes pasted rich-text HTML before it is stored. Scripts, event
/// handlers, and relative URLs are stripped; links get rel hardening.
pub fn sanitize_html(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tags_are_stripped() {
        let dirty = "<p>hello</p><script>alert('x')</script>";
        let clean = sanitize_html(dirty);
        assert!(clean.contains("<p>hello</p>"));
        assert!(!clean.contains("script"));
    }

    #[test]
    fn event_handlers_are_stripped() {
        let dirty = r#"<img src="https://cdn.example/a.png" onerror="alert(1)">"#;
        let clean = sanitize_html(dirty);
        assert!(!clean.contains("onerror"));
    }

    #[test]
    fn links_get_rel_hardening() {
        let clean = sanitize_html(r#"<a href="https://example.com">x</a>"#);
        assert!(clean.contains("noopener"));
    }
}
