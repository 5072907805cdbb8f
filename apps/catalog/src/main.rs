use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use detail_core::{DetailFetchOrchestrator, DetailViewController, HttpCatalogClient, OpenView};
use inventory::{seed_from_json, BookInventory, NewBook, PriceFilter};
use shared::domain::{BookId, SelectionHandler};
use storage::{KeyValueStore, SqliteStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::{load_settings, normalize_database_url};

const SEED_BOOKS: &str = include_str!("../data/books.json");

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Book catalog with detail lookups")]
struct Cli {
    /// Overrides the catalog service base url.
    #[arg(long, global = true)]
    catalog_url: Option<String>,
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the local inventory.
    List {
        #[arg(long, default_value = "all")]
        price: PriceFilter,
    },
    /// Resolve a book's details and similar books from the catalog service.
    Show {
        id: String,
        /// Title used for the similar-books search when the catalog has none.
        #[arg(long)]
        title: Option<String>,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        price: String,
    },
    /// Replace a book's fields; an empty image or price keeps the current one.
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        price: String,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(url) = cli.catalog_url {
        settings.catalog_url = url;
    }
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    settings.validate()?;
    info!(catalog_url = %settings.catalog_url, "starting catalog");
    let database_url = normalize_database_url(&settings.database_url);
    let store = SqliteStore::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let store: Arc<dyn KeyValueStore> = Arc::new(store);
    let seed = seed_from_json(SEED_BOOKS)?;
    let mut inventory = BookInventory::load(store, seed).await?;

    match cli.command {
        Command::List { price } => {
            let books = inventory.filtered(price);
            println!("{} book(s) (price filter: {price})", books.len());
            for book in books {
                println!(
                    "  {}  {}  {}",
                    book.id,
                    book.title,
                    book.price_display.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Show { id, title } => {
            let catalog =
                HttpCatalogClient::with_timeout(&settings.catalog_url, settings.request_timeout())
                    .context("failed to build catalog client")?;
            let mut controller =
                DetailViewController::new(DetailFetchOrchestrator::new(Arc::new(catalog)));

            let id = BookId::from(id);
            match inventory.select(&id) {
                Some(book) => controller.on_select(book),
                None => {
                    let fallback = title.unwrap_or_else(|| id.to_string());
                    controller.request_open(id, fallback);
                }
            }

            if let Some(view) = controller.settle().await.view() {
                print_view(view);
            }
            controller.dismiss();
        }
        Command::Add {
            title,
            author,
            image,
            url,
            price,
        } => {
            let book = NewBook {
                title,
                author,
                image_url: image,
                detail_url: url,
                price,
            };
            println!("{}", commands::add_book(&mut inventory, book).await?);
        }
        Command::Update {
            id,
            title,
            author,
            image,
            url,
            price,
        } => {
            let book = NewBook {
                title,
                author,
                image_url: image,
                detail_url: url,
                price,
            };
            println!(
                "{}",
                commands::update_book(&mut inventory, BookId::from(id), book).await?
            );
        }
        Command::Delete { id } => {
            println!(
                "{}",
                commands::delete_book(&mut inventory, BookId::from(id)).await?
            );
        }
    }

    Ok(())
}

fn print_view(view: &OpenView) {
    println!("[{}] {}", view.stage, view.book_id);

    if let Some(error) = &view.error_primary {
        println!("error: {error}");
    }

    if let Some(detail) = &view.detail {
        println!("{}", detail.title);
        if let Some(subtitle) = &detail.subtitle {
            println!("  {subtitle}");
        }
        for (label, value) in [
            ("authors", &detail.authors),
            ("publisher", &detail.publisher),
            ("year", &detail.year),
            ("pages", &detail.pages),
            ("language", &detail.language),
            ("isbn10", &detail.isbn10),
            ("price", &detail.price),
            ("rating", &detail.rating),
            ("url", &detail.canonical_url),
        ] {
            if let Some(value) = value {
                println!("  {label}: {value}");
            }
        }
        if let Some(description) = &detail.description {
            println!("\n{description}");
        }
        for (label, link) in &detail.sample_links {
            println!("  sample {label}: {link}");
        }
    }

    if let Some(error) = &view.error_secondary {
        println!("\nsimilar books: {error}");
    } else if !view.similar.is_empty() {
        println!("\nsimilar books:");
        for book in &view.similar {
            println!(
                "  {}  {}  {}",
                book.id,
                book.title,
                book.price_display.as_deref().unwrap_or("-")
            );
        }
    }
}
