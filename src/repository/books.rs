//! MongoDB-backed book repository

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use super::{skip_for, BookPage, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch, NewBook},
};

pub const COLLECTION: &str = "books";

/// Log the driver error and replace it with a detail-free persistence error
fn storage_failure(context: String) -> impl FnOnce(mongodb::error::Error) -> AppError {
    move |e| {
        tracing::error!(error = ?e, "{}", context);
        AppError::Persistence(context)
    }
}

#[derive(Clone)]
pub struct MongoBookRepository {
    database: Database,
    books: Collection<Book>,
}

impl MongoBookRepository {
    pub fn new(database: Database) -> Self {
        let books = database.collection::<Book>(COLLECTION);
        Self { database, books }
    }
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    async fn list_paged(&self, page: u64, limit: u64) -> AppResult<BookPage> {
        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(skip_for(page, limit))
            .limit(limit as i64)
            .build();

        let fetch_page = async {
            let cursor = self.books.find(None, options).await?;
            cursor.try_collect::<Vec<Book>>().await
        };
        let count = self.books.count_documents(None, None);

        let (items, total) = futures::try_join!(fetch_page, count)
            .map_err(storage_failure("Failed to retrieve books from the database".to_string()))?;

        Ok(BookPage::new(items, total, limit))
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Book>> {
        self.books
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(storage_failure(format!("Failed to find book with ID {}", id)))
    }

    async fn insert(&self, book: NewBook) -> AppResult<Book> {
        let book = Book::from_new(ObjectId::new(), book);

        self.books
            .insert_one(&book, None)
            .await
            .map_err(storage_failure("Failed to add new book to the database".to_string()))?;

        tracing::debug!("Inserted book {}", book.id);
        Ok(book)
    }

    async fn update_partial(&self, id: &ObjectId, patch: &BookPatch) -> AppResult<Option<Book>> {
        let update = patch.to_set_document().map_err(|e| {
            tracing::error!(error = ?e, "Failed to encode update for book {}", id);
            AppError::Persistence(format!("Failed to update book with ID {}", id))
        })?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.books
            .find_one_and_update(doc! { "_id": *id }, update, options)
            .await
            .map_err(storage_failure(format!("Failed to update book with ID {}", id)))
    }

    async fn delete_by_id(&self, id: &ObjectId) -> AppResult<Option<Book>> {
        self.books
            .find_one_and_delete(doc! { "_id": *id }, None)
            .await
            .map_err(storage_failure(format!("Failed to delete book with ID {}", id)))
    }

    async fn ping(&self) -> AppResult<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(storage_failure("Database ping failed".to_string()))
    }
}
