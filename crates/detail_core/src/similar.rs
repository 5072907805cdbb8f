use shared::{
    domain::{BookDetail, BookId, SimilarBookSummary},
    protocol::SearchEntryPayload,
};

pub const MAX_SIMILAR_BOOKS: usize = 6;

/// Builds the URL-encoded search query for the "similar books" lookup.
///
/// Uses the surname of the first listed author, else the detail title, else
/// `fallback_title`. Returns an empty string when all of them are blank.
pub fn derive_search_query(detail: &BookDetail, fallback_title: &str) -> String {
    if let Some(surname) = detail.authors.as_deref().and_then(first_author_surname) {
        return urlencoding::encode(surname).into_owned();
    }

    let title = if detail.title.trim().is_empty() {
        fallback_title.trim()
    } else {
        detail.title.trim()
    };
    urlencoding::encode(title).into_owned()
}

fn first_author_surname(authors: &str) -> Option<&str> {
    authors.split(',').next()?.split_whitespace().last()
}

/// Drops the viewed book and keeps the first [`MAX_SIMILAR_BOOKS`] entries in order.
pub fn select_similar(entries: Vec<SearchEntryPayload>, viewed: &BookId) -> Vec<SimilarBookSummary> {
    entries
        .into_iter()
        .filter(|entry| entry.id != viewed.as_str())
        .take(MAX_SIMILAR_BOOKS)
        .map(SimilarBookSummary::from)
        .collect()
}

#[cfg(test)]
#[path = "tests/similar_tests.rs"]
mod tests;
