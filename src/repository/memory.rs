//! In-process book repository.
//!
//! Used by the `memory` storage backend and by the router tests. Books are kept
//! in insertion order, which matches the `_id` ordering of the MongoDB backend.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{skip_for, BookPage, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch, NewBook},
};

#[derive(Default)]
pub struct InMemoryBookRepository {
    books: RwLock<Vec<Book>>,
    failing: AtomicBool,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail as a storage outage would
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self, context: impl Into<String>) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            let context = context.into();
            tracing::error!("Storage unavailable: {}", context);
            return Err(AppError::Persistence(context));
        }
        Ok(())
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list_paged(&self, page: u64, limit: u64) -> AppResult<BookPage> {
        self.check_available("Failed to retrieve books from the database")?;

        let books = self.books.read().await;
        let items = books
            .iter()
            .skip(skip_for(page, limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(BookPage::new(items, books.len() as u64, limit))
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Book>> {
        self.check_available(format!("Failed to find book with ID {}", id))?;

        let books = self.books.read().await;
        Ok(books.iter().find(|b| b.id == *id).cloned())
    }

    async fn insert(&self, book: NewBook) -> AppResult<Book> {
        self.check_available("Failed to add new book to the database")?;

        let book = Book::from_new(ObjectId::new(), book);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn update_partial(&self, id: &ObjectId, patch: &BookPatch) -> AppResult<Option<Book>> {
        self.check_available(format!("Failed to update book with ID {}", id))?;

        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|b| b.id == *id).map(|book| {
            patch.apply(book);
            book.clone()
        }))
    }

    async fn delete_by_id(&self, id: &ObjectId) -> AppResult<Option<Book>> {
        self.check_available(format!("Failed to delete book with ID {}", id))?;

        let mut books = self.books.write().await;
        let index = books.iter().position(|b| b.id == *id);
        Ok(index.map(|index| books.remove(index)))
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available("Database ping failed")
    }
}
