use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{
    domain::BookId,
    protocol::{BookRecordPayload, SearchPayload},
};
use tokio::sync::oneshot;

use crate::{catalog::CatalogService, error::CatalogError};

type Reply<T> = Result<T, CatalogError>;

enum Scripted<T> {
    Now(Reply<T>),
    Gated(oneshot::Receiver<Reply<T>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Reply<T> {
        match self {
            Scripted::Now(reply) => reply,
            Scripted::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(CatalogError::Unreachable("gate dropped".into()))),
        }
    }
}

/// Catalog fake whose replies are scripted per book id / query.
///
/// Each scripted reply is consumed by the first matching call; unscripted
/// calls fail as unreachable.
#[derive(Default)]
pub(crate) struct ScriptedCatalog {
    books: Mutex<HashMap<String, Scripted<BookRecordPayload>>>,
    searches: Mutex<HashMap<String, Scripted<SearchPayload>>>,
    book_calls: Mutex<Vec<String>>,
    search_calls: Mutex<Vec<String>>,
}

impl ScriptedCatalog {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn book(&self, id: &str, payload: Value) -> &Self {
        let payload = serde_json::from_value(payload).expect("book payload");
        self.books
            .lock()
            .expect("books lock")
            .insert(id.to_string(), Scripted::Now(Ok(payload)));
        self
    }

    pub(crate) fn book_error(&self, id: &str, error: CatalogError) -> &Self {
        self.books
            .lock()
            .expect("books lock")
            .insert(id.to_string(), Scripted::Now(Err(error)));
        self
    }

    pub(crate) fn gated_book(&self, id: &str) -> oneshot::Sender<Reply<BookRecordPayload>> {
        let (tx, rx) = oneshot::channel();
        self.books
            .lock()
            .expect("books lock")
            .insert(id.to_string(), Scripted::Gated(rx));
        tx
    }

    pub(crate) fn search(&self, query: &str, payload: Value) -> &Self {
        let payload = serde_json::from_value(payload).expect("search payload");
        self.searches
            .lock()
            .expect("searches lock")
            .insert(query.to_string(), Scripted::Now(Ok(payload)));
        self
    }

    pub(crate) fn search_error(&self, query: &str, error: CatalogError) -> &Self {
        self.searches
            .lock()
            .expect("searches lock")
            .insert(query.to_string(), Scripted::Now(Err(error)));
        self
    }

    pub(crate) fn gated_search(&self, query: &str) -> oneshot::Sender<Reply<SearchPayload>> {
        let (tx, rx) = oneshot::channel();
        self.searches
            .lock()
            .expect("searches lock")
            .insert(query.to_string(), Scripted::Gated(rx));
        tx
    }

    pub(crate) fn book_calls(&self) -> Vec<String> {
        self.book_calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl CatalogService for ScriptedCatalog {
    async fn fetch_book(&self, id: &BookId) -> Result<BookRecordPayload, CatalogError> {
        self.book_calls
            .lock()
            .expect("calls lock")
            .push(id.to_string());
        let scripted = self.books.lock().expect("books lock").remove(id.as_str());
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Err(CatalogError::Unreachable(format!("no scripted book {id}"))),
        }
    }

    async fn search(&self, query: &str) -> Result<SearchPayload, CatalogError> {
        self.search_calls
            .lock()
            .expect("calls lock")
            .push(query.to_string());
        let scripted = self.searches.lock().expect("searches lock").remove(query);
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Err(CatalogError::Unreachable(format!("no scripted search {query}"))),
        }
    }
}

pub(crate) fn book_payload(id: &str, title: &str, authors: &str) -> Value {
    json!({
        "error": "0",
        "isbn13": id,
        "title": title,
        "authors": authors,
        "price": "$29.99",
    })
}

pub(crate) fn search_payload(ids: &[&str]) -> Value {
    let books: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "isbn13": id, "title": format!("Book {id}"), "price": "$12.00" }))
        .collect();
    json!({ "error": "0", "total": ids.len().to_string(), "books": books })
}

pub(crate) fn payload_of<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("payload")
}
