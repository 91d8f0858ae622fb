//! Request validation for create and payment payloads.

use crate::error::AppError;
use crate::model::{NewAppointment, NewBill, NewDepartment, NewPatient, NewUser, RecordPayment};
use regex::Regex;
use std::sync::OnceLock;

const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").expect("phone pattern"))
}

pub struct RequestValidator;

impl RequestValidator {
    pub fn new_patient(p: &NewPatient) -> Result<(), AppError> {
        require(&p.first_name, "first_name")?;
        require(&p.last_name, "last_name")?;
        require(&p.address, "address")?;
        require(&p.emergency_contact_name, "emergency_contact_name")?;
        if !(0..=150).contains(&p.age) {
            return Err(AppError::Validation("age must be between 0 and 150".into()));
        }
        phone(&p.phone, "phone")?;
        phone(&p.emergency_contact_phone, "emergency_contact_phone")?;
        if let Some(email) = &p.email {
            email_shape(email)?;
        }
        if let Some(group) = &p.blood_group {
            if !BLOOD_GROUPS.contains(&group.as_str()) {
                return Err(AppError::Validation(format!(
                    "blood_group must be one of: {:?}",
                    BLOOD_GROUPS
                )));
            }
        }
        Ok(())
    }

    pub fn new_appointment(a: &NewAppointment) -> Result<(), AppError> {
        require(&a.reason, "reason")?;
        if let Some(minutes) = a.duration_minutes {
            if !(5..=480).contains(&minutes) {
                return Err(AppError::Validation(
                    "duration_minutes must be between 5 and 480".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn new_bill(b: &NewBill) -> Result<(), AppError> {
        if b.items.is_empty() && b.consultation_fee == 0 {
            return Err(AppError::Validation(
                "bill must have line items or a consultation fee".into(),
            ));
        }
        non_negative(b.consultation_fee, "consultation_fee")?;
        if let Some(discount) = b.discount {
            non_negative(discount, "discount")?;
        }
        for item in &b.items {
            require(&item.description, "items.description")?;
            if item.quantity < 1 {
                return Err(AppError::Validation(
                    "items.quantity must be at least 1".into(),
                ));
            }
            non_negative(item.unit_price, "items.unit_price")?;
        }
        Ok(())
    }

    pub fn payment(p: &RecordPayment) -> Result<(), AppError> {
        if p.amount <= 0 {
            return Err(AppError::Validation("amount must be positive".into()));
        }
        Ok(())
    }

    pub fn new_department(d: &NewDepartment) -> Result<(), AppError> {
        require(&d.name, "name")
    }

    pub fn new_user(u: &NewUser) -> Result<(), AppError> {
        require(&u.first_name, "first_name")?;
        require(&u.last_name, "last_name")?;
        email_shape(&u.email)
    }
}

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn email_shape(value: &str) -> Result<(), AppError> {
    if !value.contains('@') || value.len() < 3 {
        return Err(AppError::Validation("email must be a valid email".into()));
    }
    Ok(())
}

fn phone(value: &str, field: &str) -> Result<(), AppError> {
    if !phone_pattern().is_match(value) {
        return Err(AppError::Validation(format!(
            "{} must be a valid phone number",
            field
        )));
    }
    Ok(())
}

fn non_negative(value: i64, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BillItem, Gender, Role};
    use uuid::Uuid;

    fn patient() -> NewPatient {
        NewPatient {
            first_name: "Asha".into(),
            last_name: "Verma".into(),
            age: 34,
            gender: Gender::F,
            phone: "+91 98765 43210".into(),
            email: Some("asha@example.com".into()),
            address: "12 Station Road, Bhilwara".into(),
            emergency_contact_name: "Ravi Verma".into(),
            emergency_contact_phone: "+91 98765 43211".into(),
            medical_history: None,
            allergies: None,
            current_medications: None,
            blood_group: Some("O+".into()),
            notes: None,
            created_by: Uuid::new_v4(),
        }
    }

    #[test]
    fn valid_patient_passes() {
        assert!(RequestValidator::new_patient(&patient()).is_ok());
    }

    #[test]
    fn out_of_range_age_is_rejected() {
        let mut p = patient();
        p.age = 151;
        assert!(RequestValidator::new_patient(&p).is_err());
    }

    #[test]
    fn malformed_phone_is_rejected() {
        let mut p = patient();
        p.phone = "call me".into();
        assert!(RequestValidator::new_patient(&p).is_err());
    }

    #[test]
    fn unknown_blood_group_is_rejected() {
        let mut p = patient();
        p.blood_group = Some("Q+".into());
        assert!(RequestValidator::new_patient(&p).is_err());
    }

    #[test]
    fn bill_without_items_or_fee_is_rejected() {
        let b = NewBill {
            patient_id: Uuid::new_v4(),
            appointment_id: Uuid::new_v4(),
            items: vec![],
            consultation_fee: 0,
            discount: None,
            inter_state: false,
            notes: None,
            created_by: Uuid::new_v4(),
        };
        assert!(RequestValidator::new_bill(&b).is_err());
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let b = NewBill {
            patient_id: Uuid::new_v4(),
            appointment_id: Uuid::new_v4(),
            items: vec![BillItem {
                description: "Bandage".into(),
                quantity: 0,
                unit_price: 500,
            }],
            consultation_fee: 0,
            discount: None,
            inter_state: false,
            notes: None,
            created_by: Uuid::new_v4(),
        };
        assert!(RequestValidator::new_bill(&b).is_err());
    }

    #[test]
    fn non_positive_payment_is_rejected() {
        use crate::model::PaymentMethod;
        let p = RecordPayment {
            amount: 0,
            payment_method: PaymentMethod::Cash,
            payment_reference: None,
        };
        assert!(RequestValidator::payment(&p).is_err());
    }

    #[test]
    fn user_email_needs_an_at_sign() {
        let u = NewUser {
            email: "not-an-email".into(),
            first_name: "Meera".into(),
            last_name: "Shah".into(),
            role: Role::Nurse,
        };
        assert!(RequestValidator::new_user(&u).is_err());
    }
}
