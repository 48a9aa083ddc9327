//! Book endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        book::{BookIdParams, CreateBook, PaginationQuery, UpdateBook},
        dto::{BookCreatedResponse, BookIdResponse, BookListResponse, BookResponse},
    },
};

use super::{ValidJson, ValidPath, ValidPathJson, ValidQuery};

/// List books with pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of books", body = BookListResponse),
        (status = 400, description = "Invalid pagination parameters", body = crate::error::ErrorResponse),
        (status = 404, description = "No books stored", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    ValidQuery(query): ValidQuery<PaginationQuery>,
) -> AppResult<Json<BookListResponse>> {
    let books = state
        .services
        .books
        .list_books(query.page(), query.limit())
        .await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(BookIdParams),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 400, description = "Invalid book ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    ValidPath(params): ValidPath<BookIdParams>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get_book(&params.id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookCreatedResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ValidJson(book): ValidJson<CreateBook>,
) -> AppResult<(StatusCode, Json<BookCreatedResponse>)> {
    let created = state.services.books.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update some fields of an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(BookIdParams),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookIdResponse),
        (status = 400, description = "Invalid book ID or empty update", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    ValidPathJson(params, patch): ValidPathJson<BookIdParams, UpdateBook>,
) -> AppResult<Json<BookIdResponse>> {
    let updated = state.services.books.update_book(&params.id, patch).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(BookIdParams),
    responses(
        (status = 200, description = "Book deleted", body = BookIdResponse),
        (status = 400, description = "Invalid book ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    ValidPath(params): ValidPath<BookIdParams>,
) -> AppResult<Json<BookIdResponse>> {
    let deleted = state.services.books.delete_book(&params.id).await?;
    Ok(Json(deleted))
}
