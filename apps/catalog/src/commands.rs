use anyhow::Result;
use inventory::{BookInventory, InventoryError, NewBook};
use shared::domain::BookId;

pub async fn add_book(inventory: &mut BookInventory, book: NewBook) -> Result<String> {
    let added = inventory.add(book)?;
    let message = format!("added {} ({})", added.title, added.id);
    inventory.persist().await?;
    Ok(message)
}

pub async fn update_book(
    inventory: &mut BookInventory,
    id: BookId,
    book: NewBook,
) -> Result<String> {
    let updated = inventory.update(&id, book)?;
    let message = format!("updated {} ({})", updated.title, updated.id);
    inventory.persist().await?;
    Ok(message)
}

/// Selects `id` and deletes the selection, as the grid's delete action does.
pub async fn delete_book(inventory: &mut BookInventory, id: BookId) -> Result<String> {
    let Some(book) = inventory.select(&id) else {
        return Err(InventoryError::UnknownBook(id).into());
    };
    let message = format!("deleted {} ({})", book.title, book.id);
    inventory.delete_selected();
    inventory.persist().await?;
    Ok(message)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
