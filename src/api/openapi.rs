//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookstore API",
        version = "1.0.0",
        description = "Book catalog REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api", description = "Bookstore API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            // Requests
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::PaginationQuery,
            crate::models::author::AuthorInput,
            // Responses
            crate::models::dto::AuthorDto,
            crate::models::dto::BookDto,
            crate::models::dto::BookResponse,
            crate::models::dto::PageMetadata,
            crate::models::dto::BookListResponse,
            crate::models::dto::BookCreatedData,
            crate::models::dto::BookCreatedResponse,
            crate::models::dto::BookIdData,
            crate::models::dto::BookIdResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::ErrorBody,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
