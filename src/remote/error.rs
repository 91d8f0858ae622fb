//! Error shapes for remote database calls.

use serde::Serialize;
use thiserror::Error;

/// Raw failure of a remote call, tagged at the boundary.
///
/// Every failure is classified exactly once, in [`From<sqlx::Error>`]; the
/// rest of the crate matches on the variant and never probes fields to tell
/// a database error from anything else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Structured database error with PostgreSQL diagnostics attached.
    #[error("database error: {message}")]
    Database {
        /// SQLSTATE code, e.g. `23505` for a unique violation.
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },
    /// Any other failure of the call: pool, connection, decode, protocol.
    #[error("remote call failed: {message}")]
    Service { message: String },
}

impl RemoteError {
    pub fn service(message: impl Into<String>) -> Self {
        RemoteError::Service {
            message: message.into(),
        }
    }

    /// Human-readable description, present for every variant.
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Database { message, .. } => message,
            RemoteError::Service { message } => message,
        }
    }
}

impl From<sqlx::Error> for RemoteError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => {
                let pg = db.try_downcast_ref::<sqlx::postgres::PgDatabaseError>();
                RemoteError::Database {
                    code: db.code().map(|c| c.into_owned()),
                    message: db.message().to_string(),
                    details: pg.and_then(|p| p.detail().map(str::to_string)),
                    hint: pg.and_then(|p| p.hint().map(str::to_string)),
                }
            }
            other => RemoteError::Service {
                message: other.to_string(),
            },
        }
    }
}

/// Uniform error value handed to calling code. `message` is always
/// populated; the other fields carry over only when the source supplied
/// them. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorDetails {
    pub fn from_message(message: impl Into<String>) -> Self {
        ErrorDetails {
            code: None,
            message: message.into(),
            details: None,
            hint: None,
        }
    }
}

/// The pure mapping from raw to normalized. [`crate::remote::Guard`] layers
/// diagnostic reporting on top of this.
impl From<&RemoteError> for ErrorDetails {
    fn from(error: &RemoteError) -> Self {
        match error {
            RemoteError::Database {
                code,
                message,
                details,
                hint,
            } => ErrorDetails {
                code: code.clone(),
                message: message.clone(),
                details: details.clone(),
                hint: hint.clone(),
            },
            RemoteError::Service { message } => ErrorDetails::from_message(message.clone()),
        }
    }
}

impl From<RemoteError> for ErrorDetails {
    fn from(error: RemoteError) -> Self {
        ErrorDetails::from(&error)
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_becomes_service_variant() {
        let err = RemoteError::from(sqlx::Error::PoolTimedOut);
        match err {
            RemoteError::Service { message } => assert!(!message.is_empty()),
            other => panic!("expected Service, got {:?}", other),
        }
    }

    #[test]
    fn row_not_found_becomes_service_variant() {
        let err = RemoteError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RemoteError::Service { .. }));
    }

    #[test]
    fn details_serialization_omits_absent_fields() {
        let details = ErrorDetails::from_message("boom");
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "boom" }));

        let full = ErrorDetails {
            code: Some("23505".into()),
            message: "duplicate key".into(),
            details: Some("Key (email) already exists.".into()),
            hint: None,
        };
        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["code"], "23505");
        assert_eq!(json["details"], "Key (email) already exists.");
        assert!(json.get("hint").is_none());
    }
}
