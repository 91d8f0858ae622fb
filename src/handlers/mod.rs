//! HTTP handlers per entity plus the dashboard.

pub mod appointments;
pub mod billing;
pub mod dashboard;
pub mod departments;
pub mod patients;
pub mod users;

use crate::error::AppError;
use crate::service::{DEFAULT_LIMIT, MAX_LIMIT};
use uuid::Uuid;

/// All entity ids are UUIDs.
pub(crate) fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::BadRequest("invalid uuid".into()))
}

/// Clamp pagination params: page is 1-based, limit defaults to 100 and is
/// capped at 1000. Returns (page, limit, offset).
pub(crate) fn page_params(page: Option<u32>, limit: Option<u32>) -> (u32, u32, u32) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let page = page.unwrap_or(1).max(1);
    (page, limit, (page - 1) * limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_clamp_and_offset() {
        assert_eq!(page_params(None, None), (1, 100, 0));
        assert_eq!(page_params(Some(3), Some(20)), (3, 20, 40));
        assert_eq!(page_params(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(page_params(Some(1), Some(5000)), (1, 1000, 0));
    }

    #[test]
    fn bad_uuid_is_a_bad_request() {
        assert!(parse_id("not-a-uuid").is_err());
        assert!(parse_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
    }
}
