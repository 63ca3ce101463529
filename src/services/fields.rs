//! Single-field extraction and parsing.
//!
//! Every function here degrades to `None`; a missing element or an
//! unparseable value never fails the surrounding record.

use std::sync::LazyLock;

use regex::Regex;

use crate::services::browser::BrowserSession;
use crate::utils::normalize_whitespace;

static POSTAL_CODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(\d{5})\b").ok());
static DECIMAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").ok());
static INTEGER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d+)").ok());

/// Text of the first element matching `selector`, whitespace-normalized.
///
/// Absent elements, empty text and session errors all yield `None`.
pub async fn extract_field(session: &mut dyn BrowserSession, selector: &str) -> Option<String> {
    match session.extract_text(selector).await {
        Ok(Some(text)) => {
            let text = normalize_whitespace(&text);
            (!text.is_empty()).then_some(text)
        }
        Ok(None) => {
            log::debug!("No element for '{}'", selector);
            None
        }
        Err(e) => {
            log::debug!("Field '{}' unavailable: {}", selector, e);
            None
        }
    }
}

/// First standalone 5-digit group, e.g. `"10437"` from `"Kastanienallee 1, 10437 Berlin"`.
pub fn parse_postal_code(text: &str) -> Option<String> {
    POSTAL_CODE
        .as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First number in the text, decimals allowed (`"72.5 m²"` → `72.5`).
pub fn parse_size(text: &str) -> Option<f64> {
    DECIMAL
        .as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First integer in the text (`"3 rooms"` → `3`).
pub fn parse_rooms(text: &str) -> Option<u32> {
    INTEGER
        .as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Price with every character except digits and dots stripped.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match cleaned.parse() {
        Ok(price) => Some(price),
        Err(_) => {
            log::debug!("Unparseable price '{}'", text);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert!(POSTAL_CODE.is_some());
        assert!(DECIMAL.is_some());
        assert!(INTEGER.is_some());
    }

    #[test]
    fn test_parse_postal_code() {
        assert_eq!(
            parse_postal_code("Kastanienallee 12, 10437 Berlin").as_deref(),
            Some("10437")
        );
        assert_eq!(parse_postal_code("Berlin Mitte"), None);
        assert_eq!(parse_postal_code("Apt 123456 Berlin"), None);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("98 m², 3rd floor"), Some(98.0));
        assert_eq!(parse_size("72.5 m²"), Some(72.5));
        assert_eq!(parse_size("n/a"), None);
    }

    #[test]
    fn test_parse_rooms() {
        assert_eq!(parse_rooms("3 rooms"), Some(3));
        assert_eq!(parse_rooms("Rooms: 2.5"), Some(2));
        assert_eq!(parse_rooms("studio"), None);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("€1,960"), Some(1960.0));
        assert_eq!(parse_price("1950.50 EUR per month"), Some(1950.5));
        assert_eq!(parse_price("on request"), None);
        assert_eq!(parse_price("1.950.00"), None);
    }
}
