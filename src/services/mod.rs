//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Session contract and default engine (`BrowserSession`, `HttpSessionProvider`)
//! - Search-page link collection (`LinkExtractor`)
//! - Listing record extraction (`DetailExtractor`, `DescriptionResolver`)
//! - Postal code classification (`neighborhood_for`)
//! - Diagnostic snapshots (`SnapshotWriter`)

pub mod browser;
pub mod description;
pub mod detail;
pub mod diagnostics;
pub mod document;
pub mod fields;
pub mod http_session;
pub mod links;
pub mod neighborhood;

pub use browser::{BrowserSession, SessionProvider, WaitCondition, with_session};
pub use description::{DescriptionResolver, DescriptionStrategy};
pub use detail::{DetailExtractor, LinkContext};
pub use diagnostics::SnapshotWriter;
pub use http_session::HttpSessionProvider;
pub use links::{LinkExtractor, SearchPage};
pub use neighborhood::{UNKNOWN_NEIGHBORHOOD, neighborhood_for};
