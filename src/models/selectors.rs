// src/models/selectors.rs

//! CSS selectors for scraping search-result pages and listing pages.

use serde::{Deserialize, Serialize};

/// CSS selectors for every element the crawler reads or clicks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Cookie/consent overlay button dismissed before reading results
    #[serde(default = "defaults::consent_button")]
    pub consent_button: String,

    /// Container that holds the search results
    #[serde(default = "defaults::results_container")]
    pub results_container: String,

    /// Anchor of each listing card on a search page
    #[serde(default = "defaults::listing_link")]
    pub listing_link: String,

    /// HTML attribute holding the listing URL (usually "href")
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    #[serde(default = "defaults::title")]
    pub title: String,

    #[serde(default = "defaults::address")]
    pub address: String,

    #[serde(default = "defaults::size")]
    pub size: String,

    #[serde(default = "defaults::rooms")]
    pub rooms: String,

    #[serde(default = "defaults::price")]
    pub price: String,

    /// "Show more" control that expands the description
    #[serde(default = "defaults::show_more")]
    pub show_more: String,

    /// Description strategies, tried in order
    #[serde(default)]
    pub description: DescriptionSelectors,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            consent_button: defaults::consent_button(),
            results_container: defaults::results_container(),
            listing_link: defaults::listing_link(),
            link_attr: defaults::link_attr(),
            title: defaults::title(),
            address: defaults::address(),
            size: defaults::size(),
            rooms: defaults::rooms(),
            price: defaults::price(),
            show_more: defaults::show_more(),
            description: DescriptionSelectors::default(),
        }
    }
}

impl ListingSelectors {
    /// All selectors paired with their config key, for validation.
    pub fn named(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("selectors.consent_button", self.consent_button.as_str()),
            ("selectors.results_container", self.results_container.as_str()),
            ("selectors.listing_link", self.listing_link.as_str()),
            ("selectors.title", self.title.as_str()),
            ("selectors.address", self.address.as_str()),
            ("selectors.size", self.size.as_str()),
            ("selectors.rooms", self.rooms.as_str()),
            ("selectors.price", self.price.as_str()),
            ("selectors.show_more", self.show_more.as_str()),
            (
                "selectors.description.nested_paragraph",
                self.description.nested_paragraph.as_str(),
            ),
            (
                "selectors.description.nested_span",
                self.description.nested_span.as_str(),
            ),
            (
                "selectors.description.paragraph",
                self.description.paragraph.as_str(),
            ),
        ]
    }
}

/// Selectors for the description fallback chain.
///
/// The description moves around between listing templates, so three
/// locations are tried in order. `overlap_child` is the direct child of
/// `paragraph` that `nested_span` targets; when the paragraph the last
/// strategy would return holds such a child with text, it is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionSelectors {
    #[serde(default = "defaults::nested_paragraph")]
    pub nested_paragraph: String,

    #[serde(default = "defaults::nested_span")]
    pub nested_span: String,

    #[serde(default = "defaults::paragraph")]
    pub paragraph: String,

    #[serde(default = "defaults::overlap_child")]
    pub overlap_child: String,
}

impl Default for DescriptionSelectors {
    fn default() -> Self {
        Self {
            nested_paragraph: defaults::nested_paragraph(),
            nested_span: defaults::nested_span(),
            paragraph: defaults::paragraph(),
            overlap_child: defaults::overlap_child(),
        }
    }
}

impl DescriptionSelectors {
    /// Selector for an `overlap_child` directly under the first paragraph.
    pub fn paragraph_overlap(&self) -> String {
        format!("{}:first-of-type > {}", self.paragraph, self.overlap_child)
    }
}

mod defaults {
    pub fn consent_button() -> String {
        "button[data-testid='uc-accept-all-button']".into()
    }
    pub fn results_container() -> String {
        "div.ListingsList".into()
    }
    pub fn listing_link() -> String {
        "div.ListingsList a[href]".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
    pub fn title() -> String {
        "h2.ListingDetails-title".into()
    }
    pub fn address() -> String {
        "span[data-testid='ListingDetailsPage-address']".into()
    }
    pub fn size() -> String {
        "div.ListingDetails-stats span.ListingDetails-statsElt.floor > span".into()
    }
    pub fn rooms() -> String {
        "div.ListingDetails-stats span.ListingDetails-statsElt.rooms > span".into()
    }
    pub fn price() -> String {
        "div.ListingPriceText__wrapper strong.ListingPriceText__value".into()
    }
    pub fn show_more() -> String {
        "button.ListingDetails-descriptionToggle".into()
    }
    pub fn nested_paragraph() -> String {
        "div.ListingDetails-description div.ListingDetails-descriptionText p".into()
    }
    pub fn nested_span() -> String {
        "div.ListingDetails-description > p > span".into()
    }
    pub fn paragraph() -> String {
        "div.ListingDetails-description > p".into()
    }
    pub fn overlap_child() -> String {
        "span".into()
    }
}
