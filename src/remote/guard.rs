//! Guarded execution of remote calls.
//!
//! [`Guard::run`] folds every way a remote call can settle into an
//! [`Outcome`] value, so callers never branch on error shape or unwind.

use super::{ErrorDetails, RemoteError};
use std::future::Future;
use std::sync::Arc;

/// Injected diagnostics. The guard reports every failure here before
/// normalizing it; reporting must not affect the returned value.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, error: &RemoteError);
}

/// Default sink: structured `tracing` events. Database errors keep their
/// diagnostic fields; everything else is reported by message alone.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, error: &RemoteError) {
        match error {
            RemoteError::Database {
                code,
                message,
                details,
                hint,
            } => {
                tracing::error!(
                    code = code.as_deref(),
                    details = details.as_deref(),
                    hint = hint.as_deref(),
                    "database error: {message}"
                );
            }
            RemoteError::Service { message } => {
                tracing::error!("remote call failed: {message}");
            }
        }
    }
}

/// Discards all reports. For callers that handle their own diagnostics.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _error: &RemoteError) {}
}

/// What a settled remote call reports: a data/error pair. The error arm
/// carries failures the service returned in band; abrupt faults travel as
/// the `Err` of the operation future instead.
#[derive(Debug)]
pub struct Reply<T> {
    pub data: Option<T>,
    pub error: Option<RemoteError>,
}

impl<T> Reply<T> {
    pub fn ok(data: T) -> Self {
        Reply {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: RemoteError) -> Self {
        Reply {
            data: None,
            error: Some(error),
        }
    }
}

/// Value-shaped result of a guarded call: payload or normalized error,
/// never an unwind.
#[derive(Debug)]
pub struct Outcome<T> {
    pub data: Option<T>,
    pub error: Option<ErrorDetails>,
}

impl<T> Outcome<T> {
    /// The classic `(data, error)` pair.
    pub fn into_pair(self) -> (Option<T>, Option<ErrorDetails>) {
        (self.data, self.error)
    }

    /// Collapse into a `Result`. A success that settled with no payload is
    /// surfaced as an error value so callers always hold one or the other.
    pub fn into_result(self) -> Result<T, ErrorDetails> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(ErrorDetails::from_message(
                "remote call settled with no data",
            )),
        }
    }
}

/// Runs remote operations behind the normalization boundary.
///
/// Cloneable and cheap to share; holds only the diagnostic sink.
#[derive(Clone)]
pub struct Guard {
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for Guard {
    fn default() -> Self {
        Guard::new(Arc::new(TracingSink))
    }
}

impl Guard {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Guard { sink }
    }

    /// Map a raw remote error to its uniform shape. `None` stays `None`.
    /// Reports the error to the sink first; never fails.
    pub fn normalize(&self, error: Option<&RemoteError>) -> Option<ErrorDetails> {
        let error = error?;
        self.sink.report(error);
        Some(ErrorDetails::from(error))
    }

    /// Run one remote call. The operation is awaited exactly once; a fault
    /// (`Err`) and an in-band error (`Reply.error`) both come back as a
    /// normalized value with no data.
    pub async fn run<T, F, Fut>(&self, op: F) -> Outcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Reply<T>, RemoteError>>,
    {
        match op().await {
            Err(fault) => Outcome {
                data: None,
                error: self.normalize(Some(&fault)),
            },
            Ok(Reply {
                error: Some(raw), ..
            }) => Outcome {
                data: None,
                error: self.normalize(Some(&raw)),
            },
            Ok(Reply { data, error: None }) => Outcome { data, error: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CaptureSink {
        seen: Mutex<Vec<RemoteError>>,
    }

    impl CaptureSink {
        fn new() -> Arc<Self> {
            Arc::new(CaptureSink {
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl DiagnosticSink for CaptureSink {
        fn report(&self, error: &RemoteError) {
            self.seen.lock().unwrap().push(error.clone());
        }
    }

    fn db_error() -> RemoteError {
        RemoteError::Database {
            code: Some("23505".into()),
            message: "duplicate key value violates unique constraint".into(),
            details: Some("Key (email) already exists.".into()),
            hint: Some("Use a different email.".into()),
        }
    }

    #[test]
    fn normalize_none_is_none() {
        let guard = Guard::new(CaptureSink::new());
        assert_eq!(guard.normalize(None), None);
    }

    #[test]
    fn normalize_copies_database_fields_verbatim() {
        let guard = Guard::new(CaptureSink::new());
        let details = guard.normalize(Some(&db_error())).unwrap();
        assert_eq!(details.code.as_deref(), Some("23505"));
        assert_eq!(
            details.message,
            "duplicate key value violates unique constraint"
        );
        assert_eq!(details.details.as_deref(), Some("Key (email) already exists."));
        assert_eq!(details.hint.as_deref(), Some("Use a different email."));
    }

    #[test]
    fn normalize_keeps_only_message_for_service_errors() {
        let guard = Guard::new(CaptureSink::new());
        let details = guard
            .normalize(Some(&RemoteError::service("connection reset")))
            .unwrap();
        assert_eq!(details.message, "connection reset");
        assert_eq!(details.code, None);
        assert_eq!(details.details, None);
        assert_eq!(details.hint, None);
    }

    #[tokio::test]
    async fn run_passes_data_through_on_success() {
        let guard = Guard::new(CaptureSink::new());
        let out = guard.run(|| async { Ok(Reply::ok(vec![1, 2, 3])) }).await;
        assert_eq!(out.data, Some(vec![1, 2, 3]));
        assert!(out.error.is_none());
    }

    #[tokio::test]
    async fn run_normalizes_in_band_errors() {
        let guard = Guard::new(CaptureSink::new());
        let out: Outcome<()> = guard.run(|| async { Ok(Reply::err(db_error())) }).await;
        assert!(out.data.is_none());
        let error = out.error.unwrap();
        assert_eq!(error.code.as_deref(), Some("23505"));
        assert_eq!(error.hint.as_deref(), Some("Use a different email."));
    }

    #[tokio::test]
    async fn run_normalizes_faults() {
        let guard = Guard::new(CaptureSink::new());
        let out: Outcome<()> = guard
            .run(|| async { Err(RemoteError::service("network down")) })
            .await;
        assert!(out.data.is_none());
        assert_eq!(out.error.unwrap().message, "network down");
    }

    #[tokio::test]
    async fn run_returns_values_for_every_failure_mode() {
        let guard = Guard::new(CaptureSink::new());
        let from_fault: Outcome<i32> = guard
            .run(|| async { Err(RemoteError::service("io")) })
            .await;
        let from_reply: Outcome<i32> = guard
            .run(|| async { Ok(Reply::err(RemoteError::service("io"))) })
            .await;
        assert!(from_fault.error.is_some());
        assert!(from_reply.error.is_some());
    }

    #[tokio::test]
    async fn sink_choice_does_not_alter_returned_values() {
        let capture = CaptureSink::new();
        let noisy = Guard::new(capture.clone());
        let silent = Guard::new(Arc::new(NullSink));

        let a: Outcome<i32> = noisy.run(|| async { Ok(Reply::err(db_error())) }).await;
        let b: Outcome<i32> = silent.run(|| async { Ok(Reply::err(db_error())) }).await;
        assert_eq!(a.error, b.error);
        assert_eq!(capture.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn into_result_surfaces_both_sides() {
        let ok: Outcome<i32> = Outcome {
            data: Some(7),
            error: None,
        };
        assert_eq!(ok.into_result().unwrap(), 7);

        let err: Outcome<i32> = Outcome {
            data: None,
            error: Some(ErrorDetails::from_message("bad")),
        };
        assert_eq!(err.into_result().unwrap_err().message, "bad");
    }
}
