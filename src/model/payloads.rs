//! Create and update payloads accepted by the API.

use super::rows::{Gender, PaymentMethod, Role};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: Gender,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub current_medications: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: Uuid,
}

/// Partial patient update; only the present fields change.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdatePatient {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub current_medications: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdatePatient {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.age.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.emergency_contact_name.is_none()
            && self.emergency_contact_phone.is_none()
            && self.medical_history.is_none()
            && self.allergies.is_none()
            && self.current_medications.is_none()
            && self.blood_group.is_none()
            && self.notes.is_none()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    pub reason: String,
    #[serde(default)]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial appointment update for clinical fields; status moves go through
/// the dedicated transition endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateAppointment {
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub prescription: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateAppointment {
    pub fn is_empty(&self) -> bool {
        self.scheduled_at.is_none()
            && self.duration_minutes.is_none()
            && self.reason.is_none()
            && self.diagnosis.is_none()
            && self.prescription.is_none()
            && self.follow_up_date.is_none()
            && self.notes.is_none()
    }
}

/// One billable line. `unit_price` is paise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BillItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewBill {
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
    pub items: Vec<BillItem>,
    pub consultation_fee: i64,
    #[serde(default)]
    pub discount: Option<i64>,
    /// Inter-state supplies attract IGST instead of the CGST/SGST split.
    #[serde(default)]
    pub inter_state: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: Uuid,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RecordPayment {
    /// Paise.
    pub amount: i64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub head_doctor_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateDepartment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub head_doctor_id: Option<Uuid>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateDepartment {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.head_doctor_id.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}
