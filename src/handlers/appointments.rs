//! Appointment handlers, including the status transition endpoint.

use crate::error::AppError;
use crate::handlers::{page_params, parse_id};
use crate::model::{AppointmentStatus, NewAppointment, UpdateAppointment};
use crate::response::{success_many, success_one, success_one_ok, success_page, PageMeta};
use crate::service::{AppointmentFilter, AppointmentService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct AppointmentListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    /// Calendar day (UTC), `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct TransitionBody {
    pub status: AppointmentStatus,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<AppointmentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = page_params(q.page, q.limit);
    let filter = AppointmentFilter {
        patient_id: q.patient_id,
        doctor_id: q.doctor_id,
        department_id: q.department_id,
        status: q.status,
        on: q.date,
    };
    let result = AppointmentService::list(&state.guard, &state.pool, &filter, limit, offset)
        .await
        .into_result()?;
    Ok(success_page(
        result.rows,
        PageMeta::new(result.total, page, limit),
    ))
}

pub async fn today(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = AppointmentService::today(&state.guard, &state.pool)
        .await
        .into_result()?;
    Ok(success_many(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewAppointment>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::new_appointment(&body)?;
    let row = AppointmentService::create(&state.guard, &state.pool, &body)
        .await
        .into_result()?;
    Ok(success_one(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = AppointmentService::get(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

pub async fn read_full(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = AppointmentService::get_full(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<UpdateAppointment>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if body.is_empty() {
        return Err(AppError::BadRequest("no fields to update".into()));
    }
    if let Some(minutes) = body.duration_minutes {
        if !(5..=480).contains(&minutes) {
            return Err(AppError::Validation(
                "duration_minutes must be between 5 and 480".into(),
            ));
        }
    }
    let row = AppointmentService::update(&state.guard, &state.pool, id, &body)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

/// Move an appointment along its lifecycle. Illegal moves are rejected
/// before touching the database; a move raced by another writer comes back
/// as a conflict.
pub async fn transition(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<TransitionBody>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let current = AppointmentService::get(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or_else(|| AppError::NotFound(id_str.clone()))?;
    if !current.status.can_become(body.status) {
        return Err(AppError::Conflict(format!(
            "cannot move appointment from {:?} to {:?}",
            current.status, body.status
        )));
    }
    let row = AppointmentService::set_status(&state.guard, &state.pool, id, current.status, body.status)
        .await
        .into_result()?
        .ok_or(AppError::Conflict(
            "appointment status changed concurrently".into(),
        ))?;
    Ok(success_one_ok(row))
}
