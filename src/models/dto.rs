//! Response DTOs and the factory that shapes persisted books into them

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::book::Book;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub name: String,
    pub country: String,
    /// RFC 3339 date-time
    pub birth_date: String,
}

/// Full public view of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub isbn: String,
    pub language: String,
    pub number_of_pages: i64,
    pub publisher: String,
    pub author: AuthorDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub data: BookDto,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookListResponse {
    pub data: Vec<BookDto>,
    pub message: String,
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookCreatedData {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookCreatedResponse {
    pub data: BookCreatedData,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookIdData {
    pub id: String,
}

/// Confirmation returned by update and delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookIdResponse {
    pub data: BookIdData,
    pub message: String,
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Stateless mapping from persisted books to response shapes
pub struct BookFactory;

impl BookFactory {
    pub fn book_dto(book: &Book) -> BookDto {
        BookDto {
            id: book.id.to_hex(),
            title: book.title.clone(),
            price: book.price,
            isbn: book.isbn.clone(),
            language: book.language.clone(),
            number_of_pages: book.number_of_pages,
            publisher: book.publisher.clone(),
            author: AuthorDto {
                name: book.author.name.clone(),
                country: book.author.country.clone(),
                birth_date: format_date(&book.author.birth_date),
            },
        }
    }

    pub fn get_book(book: &Book) -> BookResponse {
        BookResponse {
            data: Self::book_dto(book),
            message: "Book retrieved successfully".to_string(),
        }
    }

    pub fn list_books(books: &[Book], total_items: u64, total_pages: u64, page: u64) -> BookListResponse {
        BookListResponse {
            data: books.iter().map(Self::book_dto).collect(),
            message: "Books retrieved successfully".to_string(),
            metadata: PageMetadata {
                current_page: page,
                total_pages,
                total_items,
            },
        }
    }

    pub fn book_created(book: &Book) -> BookCreatedResponse {
        BookCreatedResponse {
            data: BookCreatedData {
                id: book.id.to_hex(),
                title: book.title.clone(),
            },
            message: "Book created successfully".to_string(),
        }
    }

    pub fn book_updated(book: &Book) -> BookIdResponse {
        BookIdResponse {
            data: BookIdData { id: book.id.to_hex() },
            message: "Book updated successfully".to_string(),
        }
    }

    pub fn book_deleted(book: &Book) -> BookIdResponse {
        BookIdResponse {
            data: BookIdData { id: book.id.to_hex() },
            message: "Book deleted successfully".to_string(),
        }
    }
}
