//! Shared application state for all routes.

use crate::remote::Guard;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Remote-call guard; carries the configured diagnostic sink.
    pub guard: Guard,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        AppState {
            pool,
            guard: Guard::default(),
        }
    }
}
