//! Patient CRUD handlers.

use crate::error::AppError;
use crate::handlers::{page_params, parse_id};
use crate::model::{NewPatient, UpdatePatient};
use crate::response::{success_one, success_one_ok, success_page, PageMeta};
use crate::service::{PatientFilter, PatientService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct PatientListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub blood_group: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<PatientListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = page_params(q.page, q.limit);
    let filter = PatientFilter {
        search: q.search,
        is_active: q.is_active,
        blood_group: q.blood_group,
    };
    let result = PatientService::list(&state.guard, &state.pool, &filter, limit, offset)
        .await
        .into_result()?;
    Ok(success_page(
        result.rows,
        PageMeta::new(result.total, page, limit),
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewPatient>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::new_patient(&body)?;
    let row = PatientService::create(&state.guard, &state.pool, &body)
        .await
        .into_result()?;
    Ok(success_one(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = PatientService::get(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

/// Patient with appointments, bills, and the creating user embedded.
pub async fn read_full(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = PatientService::get_full(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<UpdatePatient>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if body.is_empty() {
        return Err(AppError::BadRequest("no fields to update".into()));
    }
    let row = PatientService::update(&state.guard, &state.pool, id, &body)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

pub async fn archive(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = PatientService::archive(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}
