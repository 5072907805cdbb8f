//! Local book inventory feeding the detail pipeline.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared::domain::{BookId, BookSummary};
use storage::KeyValueStore;
use thiserror::Error;
use tracing::{info, warn};

mod price;

pub use price::{format_price, parse_price, PriceFilter};

pub const BOOKS_KEY: &str = "books";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150x200";

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("book {0} is not in the inventory")]
    UnknownBook(BookId),
    #[error("a book title is required")]
    MissingTitle,
    #[error("invalid price '{0}'")]
    InvalidPrice(String),
    #[error("unknown price filter '{0}' (expected all, lt10, 10to20 or gt20)")]
    UnknownPriceFilter(String),
}

/// Form input for adding or updating a book. Empty strings mean "not given".
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub detail_url: String,
    pub price: String,
}

pub struct BookInventory {
    store: Arc<dyn KeyValueStore>,
    books: Vec<BookSummary>,
}

impl BookInventory {
    /// Reads the persisted list, falling back to `seed` when nothing usable is stored.
    pub async fn load(store: Arc<dyn KeyValueStore>, seed: Vec<BookSummary>) -> Result<Self> {
        let stored = store
            .load(BOOKS_KEY)
            .await
            .context("failed to read stored inventory")?;

        let mut books = match stored {
            Some(raw) => match serde_json::from_str::<Vec<BookSummary>>(&raw) {
                Ok(books) => books,
                Err(error) => {
                    warn!(%error, "stored inventory is unreadable; using seed data");
                    seed
                }
            },
            None => seed,
        };
        for book in &mut books {
            book.selected = false;
        }

        info!(count = books.len(), "inventory loaded");
        Ok(Self { store, books })
    }

    pub async fn persist(&self) -> Result<()> {
        if self.books.is_empty() {
            return self.store.remove(BOOKS_KEY).await;
        }
        let raw = serde_json::to_string(&self.books).context("failed to encode inventory")?;
        self.store.save(BOOKS_KEY, &raw).await
    }

    pub fn books(&self) -> &[BookSummary] {
        &self.books
    }

    pub fn get(&self, id: &BookId) -> Option<&BookSummary> {
        self.books.iter().find(|b| &b.id == id)
    }

    pub fn selected(&self) -> Option<&BookSummary> {
        self.books.iter().find(|b| b.selected)
    }

    /// Toggles `id` and clears every other selection.
    ///
    /// Returns the book when it ends up selected.
    pub fn select(&mut self, id: &BookId) -> Option<&BookSummary> {
        for book in &mut self.books {
            book.selected = if &book.id == id { !book.selected } else { false };
        }
        self.books.iter().find(|b| &b.id == id && b.selected)
    }

    pub fn filtered(&self, filter: PriceFilter) -> Vec<&BookSummary> {
        self.books
            .iter()
            .filter(|b| filter.matches(b.price_display.as_deref()))
            .collect()
    }

    pub fn add(&mut self, book: NewBook) -> Result<&BookSummary, InventoryError> {
        let title = required_title(&book.title)?;
        let price_display = optional_price(&book.price)?;

        self.books.push(BookSummary {
            id: BookId(uuid::Uuid::new_v4().to_string()),
            title,
            author: non_empty(&book.author),
            price_display,
            image_url: Some(non_empty(&book.image_url).unwrap_or_else(|| PLACEHOLDER_IMAGE.into())),
            detail_url: non_empty(&book.detail_url),
            selected: false,
        });
        let added = self.books.len() - 1;
        Ok(&self.books[added])
    }

    /// Replaces the editable fields; an empty image or price keeps the previous value.
    pub fn update(&mut self, id: &BookId, book: NewBook) -> Result<&BookSummary, InventoryError> {
        let title = required_title(&book.title)?;
        let price_display = optional_price(&book.price)?;

        let index = self
            .books
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| InventoryError::UnknownBook(id.clone()))?;
        let entry = &mut self.books[index];

        entry.title = title;
        entry.author = non_empty(&book.author);
        entry.detail_url = non_empty(&book.detail_url);
        let previous_image = entry.image_url.take();
        entry.image_url = non_empty(&book.image_url)
            .or(previous_image)
            .or_else(|| Some(PLACEHOLDER_IMAGE.into()));
        if price_display.is_some() {
            entry.price_display = price_display;
        }
        entry.selected = false;

        Ok(&self.books[index])
    }

    pub fn delete_selected(&mut self) -> usize {
        let before = self.books.len();
        self.books.retain(|b| !b.selected);
        before - self.books.len()
    }
}

/// Parses the bundled seed list (same field names as the stored list).
pub fn seed_from_json(raw: &str) -> Result<Vec<BookSummary>> {
    serde_json::from_str(raw).context("invalid seed inventory")
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn required_title(title: &str) -> Result<String, InventoryError> {
    non_empty(title).ok_or(InventoryError::MissingTitle)
}

fn optional_price(price: &str) -> Result<Option<String>, InventoryError> {
    match non_empty(price) {
        Some(price) => format_price(&price).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
