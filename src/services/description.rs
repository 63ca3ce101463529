//! Description fallback chain.
//!
//! Listing templates put the description in one of several places. Each
//! location is a [`DescriptionStrategy`]; the resolver tries them in order
//! and the first non-empty text wins.

use crate::models::DescriptionSelectors;
use crate::services::browser::BrowserSession;
use crate::services::fields::extract_field;

/// One place the description may live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionStrategy {
    /// Paragraph nested inside a wrapper element
    NestedParagraph { selector: String },
    /// Span nested inside a direct paragraph
    NestedSpan { selector: String },
    /// Direct paragraph, skipped when `overlap` (the span strategy's child
    /// of that same paragraph) has text, so it is not reported twice
    Paragraph { selector: String, overlap: String },
}

impl DescriptionStrategy {
    /// Try this strategy against the loaded page.
    pub async fn try_extract(&self, session: &mut dyn BrowserSession) -> Option<String> {
        match self {
            Self::NestedParagraph { selector } | Self::NestedSpan { selector } => {
                extract_field(session, selector).await
            }
            Self::Paragraph { selector, overlap } => {
                if extract_field(session, overlap).await.is_some() {
                    log::debug!("Paragraph '{}' overlaps '{}', skipping", selector, overlap);
                    return None;
                }
                extract_field(session, selector).await
            }
        }
    }
}

/// Ordered strategies combined first-success-wins.
#[derive(Debug, Clone)]
pub struct DescriptionResolver {
    strategies: Vec<DescriptionStrategy>,
}

impl DescriptionResolver {
    pub fn new(strategies: Vec<DescriptionStrategy>) -> Self {
        Self { strategies }
    }

    /// Standard three-step chain built from configured selectors.
    pub fn from_selectors(selectors: &DescriptionSelectors) -> Self {
        Self::new(vec![
            DescriptionStrategy::NestedParagraph {
                selector: selectors.nested_paragraph.clone(),
            },
            DescriptionStrategy::NestedSpan {
                selector: selectors.nested_span.clone(),
            },
            DescriptionStrategy::Paragraph {
                selector: selectors.paragraph.clone(),
                overlap: selectors.paragraph_overlap(),
            },
        ])
    }

    pub fn strategies(&self) -> &[DescriptionStrategy] {
        &self.strategies
    }

    /// First non-empty description, or `None` when every strategy misses.
    pub async fn resolve(&self, session: &mut dyn BrowserSession) -> Option<String> {
        for (index, strategy) in self.strategies.iter().enumerate() {
            if let Some(text) = strategy.try_extract(session).await {
                log::debug!("Description resolved by strategy {}", index + 1);
                return Some(text);
            }
        }
        None
    }
}
