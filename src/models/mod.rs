//! Data models for the bookstore

pub mod author;
pub mod book;
pub mod dto;

// Re-export commonly used types
pub use author::{Author, AuthorInput, BirthDateInput};
pub use book::{Book, BookIdParams, BookPatch, CreateBook, NewBook, PaginationQuery, UpdateBook};
pub use dto::BookFactory;
