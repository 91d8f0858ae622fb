//! Staff user handlers.

use crate::error::AppError;
use crate::handlers::{page_params, parse_id};
use crate::model::{NewUser, Role};
use crate::response::{success_many, success_one, success_one_ok, success_page, PageMeta};
use crate::service::{RequestValidator, UserFilter, UserService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct UserListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = page_params(q.page, q.limit);
    let filter = UserFilter {
        role: q.role,
        is_active: q.is_active,
    };
    let result = UserService::list(&state.guard, &state.pool, &filter, limit, offset)
        .await
        .into_result()?;
    Ok(success_page(
        result.rows,
        PageMeta::new(result.total, page, limit),
    ))
}

pub async fn doctors(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = UserService::doctors(&state.guard, &state.pool)
        .await
        .into_result()?;
    Ok(success_many(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = UserService::get(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::new_user(&body)?;
    let row = UserService::create(&state.guard, &state.pool, &body)
        .await
        .into_result()?;
    Ok(success_one(row))
}
