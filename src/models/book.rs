//! Book model, request payloads and the partial-update patch

use bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::author::{Author, AuthorInput};
use crate::validation::{validate_isbn, validate_object_id};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 25;

/// Book document as persisted in the `books` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub price: f64,
    pub isbn: String,
    pub language: String,
    pub number_of_pages: i64,
    pub publisher: String,
    pub author: Author,
}

impl Book {
    pub fn from_new(id: ObjectId, new: NewBook) -> Self {
        Self {
            id,
            title: new.title,
            price: new.price,
            isbn: new.isbn,
            language: new.language,
            number_of_pages: new.number_of_pages,
            publisher: new.publisher,
            author: new.author,
        }
    }
}

/// Validated book data ready to be inserted (no identifier yet)
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub price: f64,
    pub isbn: String,
    pub language: String,
    pub number_of_pages: i64,
    pub publisher: String,
    pub author: Author,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required and cannot be empty"))]
    pub title: String,
    #[validate(range(min = 0.0, message = "Price must be a positive number"))]
    pub price: f64,
    #[validate(custom(function = "validate_isbn"))]
    #[schema(example = "978-3-16-148410-0")]
    pub isbn: String,
    #[validate(length(min = 1, message = "Language is required and cannot be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "Number of pages must be a positive number"))]
    pub number_of_pages: i64,
    #[validate(length(min = 1, message = "Publisher is required and cannot be empty"))]
    pub publisher: String,
    #[validate(nested)]
    pub author: AuthorInput,
}

/// Partial update request. At least one field must be present.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be a positive number"))]
    pub price: Option<f64>,
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: Option<String>,
    #[validate(length(min = 1, message = "Language cannot be empty"))]
    pub language: Option<String>,
    #[validate(range(min = 1, message = "Number of pages must be a positive number"))]
    pub number_of_pages: Option<i64>,
    #[validate(length(min = 1, message = "Publisher cannot be empty"))]
    pub publisher: Option<String>,
    #[validate(nested)]
    pub author: Option<AuthorInput>,
}

impl UpdateBook {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.isbn.is_none()
            && self.language.is_none()
            && self.number_of_pages.is_none()
            && self.publisher.is_none()
            && self.author.is_none()
    }
}

/// Set of field changes applied by a partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub number_of_pages: Option<i64>,
    pub publisher: Option<String>,
    pub author: Option<Author>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        *self == BookPatch::default()
    }

    /// `$set` document touching only the provided fields
    pub fn to_set_document(&self) -> Result<Document, bson::ser::Error> {
        let mut set = Document::new();
        if let Some(ref title) = self.title {
            set.insert("title", title.as_str());
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        if let Some(ref isbn) = self.isbn {
            set.insert("isbn", isbn.as_str());
        }
        if let Some(ref language) = self.language {
            set.insert("language", language.as_str());
        }
        if let Some(pages) = self.number_of_pages {
            set.insert("numberOfPages", pages);
        }
        if let Some(ref publisher) = self.publisher {
            set.insert("publisher", publisher.as_str());
        }
        if let Some(ref author) = self.author {
            set.insert("author", bson::to_bson(author)?);
        }
        Ok(doc! { "$set": Bson::Document(set) })
    }

    /// Apply in place to an already loaded book
    pub fn apply(&self, book: &mut Book) {
        if let Some(ref title) = self.title {
            book.title = title.clone();
        }
        if let Some(price) = self.price {
            book.price = price;
        }
        if let Some(ref isbn) = self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(ref language) = self.language {
            book.language = language.clone();
        }
        if let Some(pages) = self.number_of_pages {
            book.number_of_pages = pages;
        }
        if let Some(ref publisher) = self.publisher {
            book.publisher = publisher.clone();
        }
        if let Some(ref author) = self.author {
            book.author = author.clone();
        }
    }
}

/// Pagination query parameters. Empty values (`?page=`) fall back to the defaults.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number (default: 1)
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<i64>,
    /// Items per page (default: 10, max: 25)
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(range(min = 1, max = 25, message = "Limit must be between 1 and 25"))]
    pub limit: Option<i64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.map(|p| p.max(1) as u64).unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .map(|l| (l.max(1) as u64).min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT)
    }
}

/// Path parameters for routes addressing a single book
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct BookIdParams {
    /// Book ObjectId (24 hex characters)
    #[validate(custom(function = "validate_object_id"))]
    pub id: String,
}
