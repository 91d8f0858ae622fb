//! Typed errors and HTTP mapping.

use crate::remote::ErrorDetails;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    /// Normalized outcome of a guarded remote call.
    #[error("{}", .0.message)]
    Remote(ErrorDetails),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<ErrorDetails> for AppError {
    fn from(details: ErrorDetails) -> Self {
        AppError::Remote(details)
    }
}

/// For code that talks to the database outside a guarded call (bootstrap,
/// readiness probes). The error still arrives in its normalized shape.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Remote(ErrorDetails::from(crate::remote::RemoteError::from(err)))
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Status for a normalized database error, by SQLSTATE class.
fn remote_status(details: &ErrorDetails) -> StatusCode {
    match details.code.as_deref() {
        Some("23505") => StatusCode::CONFLICT,
        Some("23502") | Some("23503") | Some("23514") => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, details, hint) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found".to_string(), None, None),
            AppError::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error".to_string(),
                None,
                None,
            ),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict".to_string(), None, None),
            AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "bad_request".to_string(), None, None)
            }
            AppError::Remote(e) => (
                remote_status(e),
                e.code.clone().unwrap_or_else(|| "remote_error".to_string()),
                e.details.clone(),
                e.hint.clone(),
            ),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message: self.to_string(),
                details,
                hint,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(code: Option<&str>) -> AppError {
        AppError::Remote(ErrorDetails {
            code: code.map(String::from),
            message: "db said no".into(),
            details: None,
            hint: None,
        })
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let resp = remote(Some("23505")).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn constraint_violations_map_to_unprocessable() {
        for code in ["23502", "23503", "23514"] {
            let resp = remote(Some(code)).into_response();
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn codeless_remote_errors_are_internal() {
        let resp = remote(None).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::NotFound("patient".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
