//! Database row types and their relation-extended variants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff role. Stored as TEXT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Staff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    M,
    F,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Legal status moves. `Completed`, `Cancelled`, and `NoShow` are
    /// terminal.
    pub fn can_become(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Scheduled, Confirmed)
                | (Scheduled, Cancelled)
                | (Scheduled, NoShow)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Pending,
    Paid,
    PartiallyPaid,
    Overdue,
    Cancelled,
    Refunded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Cheque,
    Insurance,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Patient {
    pub id: Uuid,
    /// Human-readable identifier, e.g. `PAT-20250801-4F2A`.
    pub record_number: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: Gender,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub current_medications: Option<String>,
    pub blood_group: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub head_doctor_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Appointment {
    pub id: Uuid,
    /// Human-readable identifier, e.g. `APT-20250801-91C3`.
    pub record_number: String,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub reason: String,
    pub appointment_type: String,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// All money columns are integer paise.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bill {
    pub id: Uuid,
    /// Human-readable identifier, e.g. `BILL-20250801-07D9`.
    pub bill_number: String,
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
    /// Line items as stored, a JSON array of `{description, quantity, unit_price}`.
    pub items: serde_json::Value,
    pub consultation_fee: i64,
    pub subtotal: i64,
    pub discount: i64,
    pub cgst: i64,
    pub sgst: i64,
    pub igst: i64,
    pub total_tax: i64,
    pub total_amount: i64,
    pub paid_amount: Option<i64>,
    pub status: BillStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PatientWithRelations {
    #[serde(flatten)]
    pub patient: Patient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_user: Option<User>,
    pub appointments: Vec<Appointment>,
    pub bills: Vec<Bill>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentWithRelations {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    pub bills: Vec<Bill>,
}

#[derive(Debug, Serialize)]
pub struct BillWithRelations {
    #[serde(flatten)]
    pub bill: Bill,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_serialize_as_screaming_snake() {
        assert_eq!(serde_json::to_value(Gender::Other).unwrap(), "OTHER");
        assert_eq!(
            serde_json::to_value(AppointmentStatus::InProgress).unwrap(),
            "IN_PROGRESS"
        );
        assert_eq!(
            serde_json::to_value(PaymentMethod::BankTransfer).unwrap(),
            "BANK_TRANSFER"
        );
    }

    #[test]
    fn terminal_statuses_accept_no_moves() {
        use AppointmentStatus::*;
        for terminal in [Completed, Cancelled, NoShow] {
            for next in [Scheduled, Confirmed, InProgress, Completed, Cancelled, NoShow] {
                assert!(!terminal.can_become(next));
            }
        }
    }

    #[test]
    fn scheduled_confirms_but_never_completes_directly() {
        use AppointmentStatus::*;
        assert!(Scheduled.can_become(Confirmed));
        assert!(Confirmed.can_become(InProgress));
        assert!(InProgress.can_become(Completed));
        assert!(!Scheduled.can_become(Completed));
        assert!(!Scheduled.can_become(InProgress));
    }
}
