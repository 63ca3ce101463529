//! Utility functions and helpers.

pub mod http;
pub mod log;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Origin of a URL (`scheme://host[:port]/`) as a base for resolving links.
pub fn origin_of(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/path/").unwrap();
        assert_eq!(
            resolve_url(&base, "page.html"),
            "https://example.com/path/page.html"
        );
        assert_eq!(
            resolve_url(&base, "/root.html"),
            "https://example.com/root.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_origin_of() {
        let url = Url::parse("https://example.com:8443/flats/berlin/2?minRooms=3#top").unwrap();
        assert_eq!(origin_of(&url).as_str(), "https://example.com:8443/");
    }

    #[test]
    fn test_relative_link_resolves_against_origin() {
        let search = Url::parse("https://example.com/flats/berlin/2?minRooms=3").unwrap();
        assert_eq!(
            resolve_url(&origin_of(&search), "flat/42"),
            "https://example.com/flat/42"
        );
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  98 m²\n\t furnished "), "98 m² furnished");
    }
}
