//! Dashboard handlers.

use crate::error::AppError;
use crate::response::success_one_ok;
use crate::service::DashboardService;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = DashboardService::stats(&state.guard, &state.pool)
        .await
        .into_result()?;
    Ok(success_one_ok(stats))
}

pub async fn charts(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let charts = DashboardService::charts(&state.guard, &state.pool)
        .await
        .into_result()?;
    Ok(success_one_ok(charts))
}
