//! Book catalog service

use std::sync::Arc;

use bson::oid::ObjectId;

use crate::{
    error::{AppError, AppResult, FieldError},
    models::{
        book::{BookPatch, CreateBook, NewBook, UpdateBook},
        dto::{BookCreatedResponse, BookFactory, BookIdResponse, BookListResponse, BookResponse},
    },
    repository::BookRepository,
};

/// Parse a client-supplied identifier; malformed ids are a client error, not a lookup miss
fn parse_book_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::Validation {
        message: format!("Invalid ObjectId: {}", id),
        errors: vec![FieldError::new("id", "Invalid ObjectId format")],
    })
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Book with ID {} not found.", id))
}

fn invalid_birth_date() -> AppError {
    AppError::invalid_fields(vec![FieldError::new("author.birthDate", "Invalid birth date")])
}

#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Paginated listing. An empty collection is reported as not found; a page
    /// past the end of a non-empty collection is an empty list.
    pub async fn list_books(&self, page: u64, limit: u64) -> AppResult<BookListResponse> {
        let result = self.repository.list_paged(page, limit).await?;

        if result.items.is_empty() && result.total_count == 0 {
            return Err(AppError::NotFound("No books found for the given page".to_string()));
        }

        Ok(BookFactory::list_books(
            &result.items,
            result.total_count,
            result.total_pages,
            page,
        ))
    }

    pub async fn get_book(&self, id: &str) -> AppResult<BookResponse> {
        let object_id = parse_book_id(id)?;
        let book = self
            .repository
            .find_by_id(&object_id)
            .await?
            .ok_or_else(|| not_found(id))?;

        Ok(BookFactory::get_book(&book))
    }

    pub async fn create_book(&self, input: CreateBook) -> AppResult<BookCreatedResponse> {
        let author = input.author.into_author().ok_or_else(invalid_birth_date)?;

        let book = self
            .repository
            .insert(NewBook {
                title: input.title,
                price: input.price,
                isbn: input.isbn,
                language: input.language,
                number_of_pages: input.number_of_pages,
                publisher: input.publisher,
                author,
            })
            .await?;

        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(BookFactory::book_created(&book))
    }

    pub async fn update_book(&self, id: &str, input: UpdateBook) -> AppResult<BookIdResponse> {
        if input.is_empty() {
            return Err(AppError::validation("Book data is required for update."));
        }
        let object_id = parse_book_id(id)?;

        let author = match input.author {
            Some(author) => Some(author.into_author().ok_or_else(invalid_birth_date)?),
            None => None,
        };
        let patch = BookPatch {
            title: input.title,
            price: input.price,
            isbn: input.isbn,
            language: input.language,
            number_of_pages: input.number_of_pages,
            publisher: input.publisher,
            author,
        };

        let book = self
            .repository
            .update_partial(&object_id, &patch)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!("Updated book {}", book.id);
        Ok(BookFactory::book_updated(&book))
    }

    pub async fn delete_book(&self, id: &str) -> AppResult<BookIdResponse> {
        let object_id = parse_book_id(id)?;
        let book = self
            .repository
            .delete_by_id(&object_id)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!("Deleted book {}", book.id);
        Ok(BookFactory::book_deleted(&book))
    }
}
