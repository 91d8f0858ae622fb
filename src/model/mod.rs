//! Data-transfer schemas mirroring the hospital database. The database owns
//! these shapes; nothing here enforces invariants beyond what the column
//! definitions already guarantee.

mod dashboard;
mod payloads;
mod rows;

pub use dashboard::{ChartBreakdowns, DashboardStats, MonthPoint, Page};
pub use payloads::{
    BillItem, NewAppointment, NewBill, NewDepartment, NewPatient, NewUser, RecordPayment,
    UpdateAppointment, UpdateDepartment, UpdatePatient,
};
pub use rows::{
    Appointment, AppointmentStatus, AppointmentWithRelations, Bill, BillStatus, BillWithRelations,
    Department, Gender, Patient, PatientWithRelations, PaymentMethod, Role, User,
};
