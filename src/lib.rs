//! Hospital SDK: hospital management REST backend library.

pub mod error;
pub mod handlers;
pub mod model;
pub mod remote;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use error::AppError;
pub use remote::{DiagnosticSink, ErrorDetails, Guard, NullSink, Outcome, RemoteError, Reply, TracingSink};
pub use response::{error_body, success_many, success_one, success_page};
pub use routes::{api_routes, common_routes, common_routes_with_ready};
pub use service::{
    AppointmentService, BillingService, DashboardService, DepartmentService, PatientService,
    UserService,
};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_hospital_tables};
