//! Two-stage detail lookup: the primary record, then books similar to it.
//!
//! Each [`DetailSubscription`] owns a cancellation token. Both network calls
//! race against it, and every event is checked against it before it is sent.
//! A response that lands after `close()` is dropped here, so business logic
//! never observes a superseded request.

use std::{
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use shared::domain::{BookDetail, BookId, FetchStage, SimilarBookSummary};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    catalog::CatalogService,
    error::DetailError,
    similar::{derive_search_query, select_similar},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// The primary record arrived; the similar-books lookup for `query` starts next.
    PrimaryLoaded { detail: BookDetail, query: String },
    PrimaryFailed(DetailError),
    Ready(Vec<SimilarBookSummary>),
    /// The similar-books lookup failed; the primary detail stays valid.
    SecondaryFailed(DetailError),
}

impl StageEvent {
    /// Stage the subscription is in once this event is applied.
    pub fn stage(&self) -> FetchStage {
        match self {
            StageEvent::PrimaryLoaded { .. } => FetchStage::LoadingSecondary,
            StageEvent::PrimaryFailed(_) => FetchStage::PrimaryFailed,
            StageEvent::Ready(_) => FetchStage::Ready,
            StageEvent::SecondaryFailed(_) => FetchStage::SecondaryFailed,
        }
    }
}

pub struct DetailFetchOrchestrator {
    catalog: Arc<dyn CatalogService>,
    next_id: AtomicU64,
}

impl DetailFetchOrchestrator {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            next_id: AtomicU64::new(1),
        }
    }

    /// Starts the lookup for `book_id` in `LoadingPrimary`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(&self, book_id: BookId, fallback_title: impl Into<String>) -> DetailSubscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let token = CancellationToken::new();
        let (tx, events) = mpsc::unbounded_channel();

        let sink = EventSink {
            subscription: id,
            token: token.clone(),
            tx,
        };
        let task = tokio::spawn(run_lookup(
            self.catalog.clone(),
            book_id.clone(),
            fallback_title.into(),
            sink,
        ));

        DetailSubscription {
            id,
            book_id,
            token,
            events,
            task,
        }
    }
}

pub struct DetailSubscription {
    id: SubscriptionId,
    book_id: BookId,
    token: CancellationToken,
    events: mpsc::UnboundedReceiver<StageEvent>,
    task: JoinHandle<()>,
}

impl DetailSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Next stage event, or `None` once the lookup finished or was closed.
    pub async fn next_event(&mut self) -> Option<StageEvent> {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            event = self.events.recv() => event,
        }
    }

    /// Cancels in-flight requests. No event is delivered after this returns.
    pub fn close(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        self.task.abort();
        self.events.close();
        while self.events.try_recv().is_ok() {}
        debug!(subscription = %self.id, book_id = %self.book_id, "detail subscription closed");
    }
}

impl Drop for DetailSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

struct EventSink {
    subscription: SubscriptionId,
    token: CancellationToken,
    tx: mpsc::UnboundedSender<StageEvent>,
}

impl EventSink {
    /// Runs `request` unless the subscription is closed first.
    async fn guard<T>(&self, request: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            outcome = request => Some(outcome),
        }
    }

    fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    fn emit(&self, event: StageEvent) -> bool {
        if !self.is_live() {
            return false;
        }
        debug!(subscription = %self.subscription, stage = %event.stage(), "stage transition");
        self.tx.send(event).is_ok()
    }
}

async fn run_lookup(
    catalog: Arc<dyn CatalogService>,
    book_id: BookId,
    fallback_title: String,
    sink: EventSink,
) {
    let Some((detail, query)) =
        primary_stage(catalog.as_ref(), &book_id, &fallback_title, &sink).await
    else {
        return;
    };
    if !sink.emit(StageEvent::PrimaryLoaded {
        detail,
        query: query.clone(),
    }) {
        return;
    }

    if let Some(event) = secondary_stage(catalog.as_ref(), &book_id, &query, &sink).await {
        sink.emit(event);
    }
}

// PrimaryPending: yields the detail and its derived query, or emits the failure itself.
async fn primary_stage(
    catalog: &dyn CatalogService,
    book_id: &BookId,
    fallback_title: &str,
    sink: &EventSink,
) -> Option<(BookDetail, String)> {
    let outcome = sink.guard(catalog.fetch_book(book_id)).await?;

    let failure = match outcome {
        Ok(payload) => match payload.check_status() {
            Ok(()) => {
                let detail = payload.into_detail(book_id);
                let query = derive_search_query(&detail, fallback_title);
                return Some((detail, query));
            }
            Err(api_error) if api_error.is_not_found() => {
                if sink.is_live() {
                    warn!(%book_id, code = %api_error.raw_code, "book not found in catalog");
                }
                DetailError::PrimaryNotFound
            }
            Err(api_error) => {
                if sink.is_live() {
                    warn!(%book_id, code = %api_error.raw_code, "catalog rejected book lookup");
                }
                DetailError::PrimaryUnknown
            }
        },
        Err(error) => {
            if sink.is_live() {
                warn!(%book_id, %error, "book lookup failed");
            }
            DetailError::PrimaryUnknown
        }
    };

    sink.emit(StageEvent::PrimaryFailed(failure));
    None
}

// SecondaryPending: `None` only when the subscription was closed mid-flight.
async fn secondary_stage(
    catalog: &dyn CatalogService,
    book_id: &BookId,
    query: &str,
    sink: &EventSink,
) -> Option<StageEvent> {
    if query.is_empty() {
        debug!(%book_id, "no search terms for similar books");
        return Some(StageEvent::Ready(Vec::new()));
    }

    let outcome = sink.guard(catalog.search(query)).await?;

    let event = match outcome {
        Ok(payload) => match payload.check_status() {
            Ok(()) => StageEvent::Ready(select_similar(payload.books, book_id)),
            Err(api_error) => {
                if sink.is_live() {
                    warn!(%book_id, query, code = %api_error.raw_code, "similar-books search rejected");
                }
                StageEvent::SecondaryFailed(DetailError::SimilarUnavailable)
            }
        },
        Err(error) => {
            if sink.is_live() {
                warn!(%book_id, query, %error, "similar-books search failed");
            }
            StageEvent::SecondaryFailed(DetailError::SimilarUnavailable)
        }
    };
    Some(event)
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
