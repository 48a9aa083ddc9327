//! Business logic services

pub mod books;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BookService::new(repository.books.clone()),
            repository,
        }
    }

    /// Check that the storage backend answers
    pub async fn ping_storage(&self) -> crate::error::AppResult<()> {
        self.repository.books.ping().await
    }
}
