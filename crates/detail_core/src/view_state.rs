//! Observable state of the book detail view.

use shared::domain::{
    BookDetail, BookId, BookSummary, FetchStage, SelectionHandler, SimilarBookSummary,
};
use tracing::{debug, info};

use crate::orchestrator::{DetailFetchOrchestrator, DetailSubscription, StageEvent, SubscriptionId};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Closed,
    Open(OpenView),
}

impl ViewState {
    pub fn is_open(&self) -> bool {
        matches!(self, ViewState::Open(_))
    }

    pub fn stage(&self) -> Option<FetchStage> {
        match self {
            ViewState::Closed => None,
            ViewState::Open(view) => Some(view.stage),
        }
    }

    pub fn view(&self) -> Option<&OpenView> {
        match self {
            ViewState::Closed => None,
            ViewState::Open(view) => Some(view),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenView {
    pub subscription: SubscriptionId,
    pub book_id: BookId,
    pub stage: FetchStage,
    pub detail: Option<BookDetail>,
    pub query: Option<String>,
    pub similar: Vec<SimilarBookSummary>,
    pub error_primary: Option<String>,
    pub error_secondary: Option<String>,
}

impl OpenView {
    fn loading(subscription: SubscriptionId, book_id: BookId) -> Self {
        Self {
            subscription,
            book_id,
            stage: FetchStage::LoadingPrimary,
            detail: None,
            query: None,
            similar: Vec::new(),
            error_primary: None,
            error_secondary: None,
        }
    }

    fn apply(&mut self, event: StageEvent) {
        self.stage = event.stage();
        match event {
            StageEvent::PrimaryLoaded { detail, query } => {
                self.detail = Some(detail);
                self.query = Some(query);
            }
            StageEvent::PrimaryFailed(error) => {
                self.error_primary = Some(error.to_string());
            }
            StageEvent::Ready(similar) => {
                self.similar = similar;
            }
            StageEvent::SecondaryFailed(error) => {
                self.similar.clear();
                self.error_secondary = Some(error.to_string());
            }
        }
    }
}

/// Stage event tagged with the subscription that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct StageUpdate {
    pub subscription: SubscriptionId,
    pub event: StageEvent,
}

/// Mediates open/dismiss intent and the orchestrator's results.
///
/// The live subscription is written only by [`request_open`](Self::request_open)
/// and [`dismiss`](Self::dismiss); updates from any other subscription are dropped.
pub struct DetailViewController {
    orchestrator: DetailFetchOrchestrator,
    live: Option<DetailSubscription>,
    state: ViewState,
}

impl DetailViewController {
    pub fn new(orchestrator: DetailFetchOrchestrator) -> Self {
        Self {
            orchestrator,
            live: None,
            state: ViewState::Closed,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn live_subscription(&self) -> Option<SubscriptionId> {
        self.live.as_ref().map(DetailSubscription::id)
    }

    /// Opens the view for `book_id`, superseding any view already open.
    pub fn request_open(&mut self, book_id: BookId, fallback_title: impl Into<String>) {
        if let Some(mut previous) = self.live.take() {
            previous.close();
        }

        let subscription = self.orchestrator.open(book_id.clone(), fallback_title);
        info!(%book_id, subscription = %subscription.id(), "detail view opened");

        self.state = ViewState::Open(OpenView::loading(subscription.id(), book_id));
        self.live = Some(subscription);
    }

    /// Closes the view and discards its data. Calling it on a closed view does nothing.
    pub fn dismiss(&mut self) {
        if let Some(mut subscription) = self.live.take() {
            subscription.close();
            info!(book_id = %subscription.book_id(), "detail view dismissed");
        }
        self.state = ViewState::Closed;
    }

    /// Applies `update` when it belongs to the live subscription.
    ///
    /// Returns whether the state changed.
    pub fn apply(&mut self, update: StageUpdate) -> bool {
        let is_live = self.live_subscription() == Some(update.subscription);
        let ViewState::Open(view) = &mut self.state else {
            debug!(subscription = %update.subscription, "dropping stage event for closed view");
            return false;
        };
        if !is_live || view.subscription != update.subscription {
            debug!(subscription = %update.subscription, "dropping stale stage event");
            return false;
        }
        if view.stage.is_terminal() {
            debug!(subscription = %update.subscription, stage = %view.stage, "view already settled");
            return false;
        }

        view.apply(update.event);
        true
    }

    /// Waits for the live subscription's next event and applies it.
    ///
    /// Returns the resulting stage, or `None` when there is nothing left to wait for.
    pub async fn next_update(&mut self) -> Option<FetchStage> {
        let live = self.live.as_mut()?;
        let subscription = live.id();
        let event = live.next_event().await?;
        self.apply(StageUpdate {
            subscription,
            event,
        });
        self.state.stage()
    }

    /// Pumps updates until the view reaches a terminal stage or is closed.
    pub async fn settle(&mut self) -> &ViewState {
        while let Some(stage) = self.state.stage() {
            if stage.is_terminal() || self.next_update().await.is_none() {
                break;
            }
        }
        &self.state
    }
}

impl SelectionHandler for DetailViewController {
    fn on_select(&mut self, book: &BookSummary) {
        self.request_open(book.id.clone(), book.title.clone());
    }
}

#[cfg(test)]
#[path = "tests/view_state_tests.rs"]
mod tests;
