use super::*;

fn detail(title: &str, authors: Option<&str>) -> BookDetail {
    BookDetail {
        id: BookId::from("9781491950357"),
        title: title.to_string(),
        authors: authors.map(str::to_string),
        ..BookDetail::default()
    }
}

fn entry(id: &str) -> SearchEntryPayload {
    SearchEntryPayload {
        id: id.to_string(),
        title: format!("Book {id}"),
        subtitle: None,
        image_url: None,
        price_display: Some("$10.00".into()),
    }
}

#[test]
fn query_uses_surname_of_first_author() {
    let d = detail("Refactoring", Some("Martin Fowler"));
    assert_eq!(derive_search_query(&d, "fallback"), "Fowler");

    let d = detail("Design Patterns", Some("Erich Gamma, Richard Helm, Ralph Johnson"));
    assert_eq!(derive_search_query(&d, "fallback"), "Gamma");
}

#[test]
fn query_handles_single_token_and_padded_names() {
    let d = detail("Title", Some("  Plato  "));
    assert_eq!(derive_search_query(&d, "fallback"), "Plato");

    let d = detail("Title", Some("Guido van  Rossum , Someone Else"));
    assert_eq!(derive_search_query(&d, "fallback"), "Rossum");
}

#[test]
fn query_is_url_encoded() {
    let d = detail("Title", Some("José Müller"));
    assert_eq!(derive_search_query(&d, "fallback"), "M%C3%BCller");

    let d = detail("C++ Primer & More", None);
    assert_eq!(derive_search_query(&d, "fallback"), "C%2B%2B%20Primer%20%26%20More");
}

#[test]
fn blank_authors_fall_back_to_title() {
    let d = detail("Building Microservices", Some("   "));
    assert_eq!(derive_search_query(&d, "fallback"), "Building%20Microservices");

    let d = detail("Building Microservices", Some(", Sam Newman"));
    assert_eq!(derive_search_query(&d, "fallback"), "Building%20Microservices");
}

#[test]
fn blank_title_falls_back_to_caller_title() {
    let d = detail("  ", None);
    assert_eq!(derive_search_query(&d, "Learning Rust"), "Learning%20Rust");

    let d = detail("", None);
    assert_eq!(derive_search_query(&d, "  "), "");
}

#[test]
fn similar_excludes_viewed_book_and_caps_length() {
    let viewed = BookId::from("3");
    let entries = (1..=9).map(|i| entry(&i.to_string())).collect();

    let similar = select_similar(entries, &viewed);
    let ids: Vec<_> = similar.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "4", "5", "6", "7"]);
    assert_eq!(similar[0].price_display.as_deref(), Some("$10.00"));
}

#[test]
fn similar_removes_every_duplicate_of_viewed_id() {
    let viewed = BookId::from("7");
    let similar = select_similar(vec![entry("7"), entry("8"), entry("7")], &viewed);
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].id, BookId::from("8"));
}

#[test]
fn similar_of_empty_results_is_empty() {
    assert!(select_similar(Vec::new(), &BookId::from("1")).is_empty());
}
