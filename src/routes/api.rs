//! Entity and dashboard routes. Static segments (`today`, `doctors`) are
//! registered alongside the `:id` routes; the router prefers the static
//! match.

use crate::handlers::{appointments, billing, dashboard, departments, patients, users};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/patients", get(patients::list).post(patients::create))
        .route(
            "/patients/:id",
            get(patients::read).patch(patients::update),
        )
        .route("/patients/:id/full", get(patients::read_full))
        .route("/patients/:id/archive", post(patients::archive))
        .route(
            "/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route("/appointments/today", get(appointments::today))
        .route(
            "/appointments/:id",
            get(appointments::read).patch(appointments::update),
        )
        .route("/appointments/:id/full", get(appointments::read_full))
        .route("/appointments/:id/status", post(appointments::transition))
        .route("/bills", get(billing::list).post(billing::create))
        .route("/bills/:id", get(billing::read))
        .route("/bills/:id/full", get(billing::read_full))
        .route("/bills/:id/payments", post(billing::record_payment))
        .route(
            "/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/departments/:id",
            get(departments::read).patch(departments::update),
        )
        .route("/users", get(users::list).post(users::create))
        .route("/users/doctors", get(users::doctors))
        .route("/users/:id", get(users::read))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/charts", get(dashboard::charts))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
