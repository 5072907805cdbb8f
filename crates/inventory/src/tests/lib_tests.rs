use super::*;
use storage::MemoryStore;

fn summary(id: &str, title: &str, price: Option<&str>) -> BookSummary {
    BookSummary {
        id: BookId::from(id),
        title: title.to_string(),
        author: None,
        price_display: price.map(str::to_string),
        image_url: None,
        detail_url: None,
        selected: false,
    }
}

fn seed() -> Vec<BookSummary> {
    vec![
        summary("9781491950357", "Building Microservices", Some("$35.99")),
        summary("9781449355739", "Learning Python", Some("$9.50")),
        summary("9780134757599", "Refactoring", Some("$15.00")),
        summary("0000000000000", "Untitled Draft", None),
    ]
}

async fn loaded(store: Arc<dyn KeyValueStore>) -> BookInventory {
    BookInventory::load(store, seed()).await.expect("load")
}

#[tokio::test]
async fn falls_back_to_seed_when_store_is_empty() {
    let inventory = loaded(Arc::new(MemoryStore::new())).await;
    assert_eq!(inventory.books().len(), 4);
}

#[tokio::test]
async fn falls_back_to_seed_when_stored_data_is_corrupt() {
    let store = Arc::new(MemoryStore::with_entries([(BOOKS_KEY, "{not json")]));
    let inventory = loaded(store).await;
    assert_eq!(inventory.books().len(), 4);
}

#[tokio::test]
async fn stored_selection_is_reset_on_load() {
    let mut stored = seed();
    stored[1].selected = true;
    let raw = serde_json::to_string(&stored).expect("encode");
    let store = Arc::new(MemoryStore::with_entries([(BOOKS_KEY, raw)]));

    let inventory = loaded(store).await;
    assert!(inventory.selected().is_none());
}

#[tokio::test]
async fn reads_seed_field_names() {
    let seed = seed_from_json(
        r#"[{"isbn13":"9781617294136","title":"Rust in Action","price":"$39.99","image":"https://img/1.png","url":"https://itbook.store/books/9781617294136"}]"#,
    )
    .expect("seed");
    assert_eq!(seed[0].id, BookId::from("9781617294136"));
    assert_eq!(seed[0].price_display.as_deref(), Some("$39.99"));
    assert_eq!(
        seed[0].detail_url.as_deref(),
        Some("https://itbook.store/books/9781617294136")
    );
}

#[tokio::test]
async fn select_toggles_and_keeps_a_single_selection() {
    let mut inventory = loaded(Arc::new(MemoryStore::new())).await;
    let first = BookId::from("9781491950357");
    let second = BookId::from("9781449355739");

    let selected = inventory.select(&first).map(|b| b.id.clone());
    assert_eq!(selected, Some(first.clone()));

    inventory.select(&second);
    let selected: Vec<_> = inventory.books().iter().filter(|b| b.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, second);

    assert!(inventory.select(&second).is_none());
    assert!(inventory.selected().is_none());
}

#[tokio::test]
async fn price_filter_excludes_unpriced_books() {
    let inventory = loaded(Arc::new(MemoryStore::new())).await;

    let titles = |filter| {
        inventory
            .filtered(filter)
            .into_iter()
            .map(|b| b.title.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(titles(PriceFilter::Under10), vec!["Learning Python"]);
    assert_eq!(titles(PriceFilter::From10To20), vec!["Refactoring"]);
    assert_eq!(titles(PriceFilter::Over20), vec!["Building Microservices"]);
    assert_eq!(titles(PriceFilter::All).len(), 4);
}

#[tokio::test]
async fn add_applies_defaults_and_formats_price() {
    let mut inventory = loaded(Arc::new(MemoryStore::new())).await;
    let added = inventory
        .add(NewBook {
            title: "  Zero To Production  ".into(),
            price: "42".into(),
            ..NewBook::default()
        })
        .expect("add")
        .clone();

    assert_eq!(added.title, "Zero To Production");
    assert_eq!(added.price_display.as_deref(), Some("$42.00"));
    assert_eq!(added.image_url.as_deref(), Some(PLACEHOLDER_IMAGE));
    assert!(added.author.is_none());
    assert_eq!(inventory.books().len(), 5);
}

#[tokio::test]
async fn add_rejects_blank_title_and_bad_price() {
    let mut inventory = loaded(Arc::new(MemoryStore::new())).await;
    assert!(matches!(
        inventory.add(NewBook::default()),
        Err(InventoryError::MissingTitle)
    ));
    assert!(matches!(
        inventory.add(NewBook {
            title: "Priced".into(),
            price: "twelve".into(),
            ..NewBook::default()
        }),
        Err(InventoryError::InvalidPrice(_))
    ));
    assert_eq!(inventory.books().len(), 4);
}

#[tokio::test]
async fn update_keeps_previous_image_and_price_when_blank() {
    let mut inventory = loaded(Arc::new(MemoryStore::new())).await;
    let id = BookId::from("9781491950357");
    inventory.books[0].image_url = Some("https://img/original.png".into());

    let updated = inventory
        .update(
            &id,
            NewBook {
                title: "Building Microservices, 2nd Edition".into(),
                author: "Sam Newman".into(),
                ..NewBook::default()
            },
        )
        .expect("update")
        .clone();

    assert_eq!(updated.title, "Building Microservices, 2nd Edition");
    assert_eq!(updated.author.as_deref(), Some("Sam Newman"));
    assert_eq!(updated.image_url.as_deref(), Some("https://img/original.png"));
    assert_eq!(updated.price_display.as_deref(), Some("$35.99"));
}

#[tokio::test]
async fn update_of_unknown_book_fails() {
    let mut inventory = loaded(Arc::new(MemoryStore::new())).await;
    let err = inventory
        .update(
            &BookId::from("missing"),
            NewBook {
                title: "x".into(),
                ..NewBook::default()
            },
        )
        .expect_err("must fail");
    assert!(matches!(err, InventoryError::UnknownBook(_)));
}

#[tokio::test]
async fn delete_selected_removes_only_selection() {
    let mut inventory = loaded(Arc::new(MemoryStore::new())).await;
    assert_eq!(inventory.delete_selected(), 0);

    inventory.select(&BookId::from("9781449355739"));
    assert_eq!(inventory.delete_selected(), 1);
    assert!(inventory.get(&BookId::from("9781449355739")).is_none());
    assert_eq!(inventory.books().len(), 3);
}

#[tokio::test]
async fn persist_round_trips_and_clears_key_when_empty() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut inventory = loaded(store.clone()).await;
    inventory.select(&BookId::from("0000000000000"));
    assert_eq!(inventory.delete_selected(), 1);
    inventory.persist().await.expect("persist");

    let reloaded = BookInventory::load(store.clone(), Vec::new())
        .await
        .expect("reload");
    assert_eq!(reloaded.books().len(), 3);

    for book in seed() {
        inventory.select(&book.id);
        inventory.delete_selected();
    }
    inventory.persist().await.expect("persist empty");
    assert!(store.load(BOOKS_KEY).await.expect("load").is_none());
}
