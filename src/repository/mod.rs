//! Repository layer for book persistence

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use mongodb::Database;

use crate::{
    error::AppResult,
    models::book::{Book, BookPatch, NewBook},
};

/// One page of books plus the numbers needed to describe the whole result set
#[derive(Debug, Clone, PartialEq)]
pub struct BookPage {
    pub items: Vec<Book>,
    pub total_count: u64,
    pub total_pages: u64,
}

impl BookPage {
    pub fn new(items: Vec<Book>, total_count: u64, limit: u64) -> Self {
        Self {
            items,
            total_count,
            total_pages: total_pages(total_count, limit),
        }
    }
}

/// `ceil(total / limit)`, zero when the limit is zero
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}

/// Number of documents to skip for a 1-based page, capped at `i64::MAX`
/// which is the largest skip the MongoDB wire protocol accepts
pub fn skip_for(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1)
        .saturating_mul(limit)
        .min(i64::MAX as u64)
}

/// Book persistence operations.
///
/// Implementations report every storage failure as `AppError::Persistence`.
/// Absent books are `Ok(None)`, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list_paged(&self, page: u64, limit: u64) -> AppResult<BookPage>;

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Book>>;

    async fn insert(&self, book: NewBook) -> AppResult<Book>;

    /// Apply only the provided fields and return the updated book
    async fn update_partial(&self, id: &ObjectId, patch: &BookPatch) -> AppResult<Option<Book>>;

    /// Hard delete, returning the removed book
    async fn delete_by_id(&self, id: &ObjectId) -> AppResult<Option<Book>>;

    /// Storage round-trip used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    /// Repository backed by the given MongoDB database
    pub fn new(database: Database) -> Self {
        Self {
            books: Arc::new(books::MongoBookRepository::new(database)),
        }
    }

    /// Repository kept entirely in process memory
    pub fn in_memory() -> Self {
        Self::with_books(Arc::new(memory::InMemoryBookRepository::new()))
    }

    pub fn with_books(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}
