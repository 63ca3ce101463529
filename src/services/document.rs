//! Queries against fetched static markup.
//!
//! `scraper::Html` is not `Send`, so documents are kept as raw markup and
//! parsed per query. No parsed tree is ever held across an `.await`.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Raw markup of one fetched page.
#[derive(Debug, Clone)]
pub struct StaticDocument {
    url: String,
    html: String,
}

impl StaticDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// URL the markup was fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Whether at least one element matches the selector.
    pub fn contains(&self, selector: &str) -> Result<bool> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        let found = document.select(&selector).next().is_some();
        Ok(found)
    }

    /// Trimmed text of the first matching element, `None` when absent.
    pub fn text(&self, selector: &str) -> Result<Option<String>> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        let text = document.select(&selector).next().map(element_text);
        Ok(text)
    }

    /// Attribute values of every matching element, in document order.
    pub fn attributes(&self, selector: &str, attr: &str) -> Result<Vec<String>> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        let values = document
            .select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .map(str::to_string)
            .collect();
        Ok(values)
    }
}

/// Parse a CSS selector, mapping failures to [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h2 class="title">  Sunny loft  </h2>
          <ul>
            <li><a href="/a">A</a></li>
            <li><a href="/b">B</a></li>
            <li><a>no link</a></li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div.class").is_ok());
        assert!(parse_selector("tr:has(a)").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn text_is_trimmed_and_optional() {
        let doc = StaticDocument::new("https://example.com", PAGE);
        assert_eq!(doc.text("h2.title").unwrap(), Some("Sunny loft".to_string()));
        assert_eq!(doc.text("h3").unwrap(), None);
    }

    #[test]
    fn attributes_skip_elements_without_attr() {
        let doc = StaticDocument::new("https://example.com", PAGE);
        assert_eq!(doc.attributes("a", "href").unwrap(), vec!["/a", "/b"]);
    }

    #[test]
    fn contains_reports_presence() {
        let doc = StaticDocument::new("https://example.com", PAGE);
        assert!(doc.contains("ul li").unwrap());
        assert!(!doc.contains("table").unwrap());
    }
}
