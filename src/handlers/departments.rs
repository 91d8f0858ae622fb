//! Department handlers.

use crate::error::AppError;
use crate::handlers::parse_id;
use crate::model::{NewDepartment, UpdateDepartment};
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::{DepartmentService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct DepartmentListQuery {
    pub is_active: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<DepartmentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = DepartmentService::list(&state.guard, &state.pool, q.is_active)
        .await
        .into_result()?;
    Ok(success_many(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewDepartment>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::new_department(&body)?;
    let row = DepartmentService::create(&state.guard, &state.pool, &body)
        .await
        .into_result()?;
    Ok(success_one(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = DepartmentService::get(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<UpdateDepartment>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if body.is_empty() {
        return Err(AppError::BadRequest("no fields to update".into()));
    }
    let row = DepartmentService::update(&state.guard, &state.pool, id, &body)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}
