//! Detail-resolution pipeline for the book catalog.
//!
//! [`DetailFetchOrchestrator`] runs the primary and similar-books lookups for
//! one book; [`DetailViewController`] turns those results into the state
//! the presentation layer renders.

pub mod catalog;
pub mod error;
pub mod orchestrator;
pub mod similar;
pub mod view_state;

pub use catalog::{CatalogService, HttpCatalogClient};
pub use error::{CatalogError, DetailError};
pub use orchestrator::{DetailFetchOrchestrator, DetailSubscription, StageEvent, SubscriptionId};
pub use similar::{derive_search_query, select_similar, MAX_SIMILAR_BOOKS};
pub use view_state::{DetailViewController, OpenView, StageUpdate, ViewState};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod catalog_tests;
