//! Human-readable record numbers for patients, appointments, and bills.

use chrono::Utc;
use uuid::Uuid;

/// `PREFIX-YYYYMMDD-XXXXXX`: creation date plus a short random suffix.
/// Uniqueness is enforced by the UNIQUE index on the column.
pub fn record_number(prefix: &str) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, date, suffix[..6].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_numbers_carry_prefix_and_date() {
        let id = record_number("PAT");
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PAT");
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn record_numbers_differ_between_calls() {
        assert_ne!(record_number("BILL"), record_number("BILL"));
    }
}
