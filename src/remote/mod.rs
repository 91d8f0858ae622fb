//! Remote data-service boundary: tagged raw errors, their normalized form,
//! and guarded execution so callers always receive a `(data, error)` pair.

mod error;
mod guard;

pub use error::{ErrorDetails, RemoteError};
pub use guard::{DiagnosticSink, Guard, NullSink, Outcome, Reply, TracingSink};
