//! API handlers for bookstore REST endpoints
//!
//! Request validation happens in the extractors below: each one deserializes a
//! request part, runs its `validator` schema and rejects with a single
//! `AppError` carrying every violated field.

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    error::{AppError, FieldError},
    validation::field_errors,
};

/// Path parameters that passed their schema
pub struct ValidPath<T>(pub T);

/// Query string that passed its schema
pub struct ValidQuery<T>(pub T);

/// JSON body that passed its schema
pub struct ValidJson<T>(pub T);

/// Path parameters and JSON body validated together, violations of both reported at once
pub struct ValidPathJson<P, B>(pub P, pub B);

fn path_rejection(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(e) => {
            AppError::invalid_fields(vec![FieldError::new("params", e.body_text())])
        }
        other => AppError::Internal(anyhow::anyhow!(other.body_text())),
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::invalid_fields(vec![FieldError::new("query", rejection.body_text())])
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            AppError::invalid_fields(vec![FieldError::new("body", e.body_text())])
        }
        other => AppError::MalformedPayload(other.body_text()),
    }
}

/// Field errors of a validation failure; any other failure aborts extraction
fn field_errors_or_abort(err: AppError) -> Result<Vec<FieldError>, AppError> {
    match err {
        AppError::Validation { errors, .. } => Ok(errors),
        other => Err(other),
    }
}

fn violations<T: Validate>(value: &T) -> Vec<FieldError> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(e) => field_errors(&e),
    }
}

fn into_result<T>(value: T, errors: Vec<FieldError>) -> Result<T, AppError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AppError::invalid_fields(errors))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;
        let errors = violations(&value);
        into_result(ValidPath(value), errors)
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        let errors = violations(&value);
        into_result(ValidQuery(value), errors)
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        let errors = violations(&value);
        into_result(ValidJson(value), errors)
    }
}

#[async_trait]
impl<P, B, S> FromRequest<S> for ValidPathJson<P, B>
where
    P: DeserializeOwned + Validate + Send,
    B: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        // Violations in the path do not hide violations in the body
        let mut errors = Vec::new();
        let params = match Path::<P>::from_request_parts(&mut parts, state).await {
            Ok(Path(params)) => {
                errors.extend(violations(&params));
                Some(params)
            }
            Err(rejection) => {
                errors.extend(field_errors_or_abort(path_rejection(rejection))?);
                None
            }
        };

        let req = Request::from_parts(parts, body);
        let payload = match Json::<B>::from_request(req, state).await {
            Ok(Json(payload)) => {
                errors.extend(violations(&payload));
                Some(payload)
            }
            Err(rejection) => {
                errors.extend(field_errors_or_abort(json_rejection(rejection))?);
                None
            }
        };

        match (params, payload) {
            (Some(params), Some(payload)) if errors.is_empty() => Ok(ValidPathJson(params, payload)),
            _ => Err(AppError::invalid_fields(errors)),
        }
    }
}

/// Fallback for unknown routes
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
