//! Billing handlers: bills and payment recording.

use crate::error::AppError;
use crate::handlers::{page_params, parse_id};
use crate::model::{BillStatus, NewBill, RecordPayment};
use crate::response::{success_one, success_one_ok, success_page, PageMeta};
use crate::service::{BillFilter, BillingService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct BillListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub patient_id: Option<Uuid>,
    pub status: Option<BillStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<BillListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = page_params(q.page, q.limit);
    let filter = BillFilter {
        patient_id: q.patient_id,
        status: q.status,
    };
    let result = BillingService::list(&state.guard, &state.pool, &filter, limit, offset)
        .await
        .into_result()?;
    Ok(success_page(
        result.rows,
        PageMeta::new(result.total, page, limit),
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewBill>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::new_bill(&body)?;
    let row = BillingService::create(&state.guard, &state.pool, &body)
        .await
        .into_result()?;
    Ok(success_one(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = BillingService::get(&state.guard, &state.pool, id)
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
    let row = BillingService::get_full(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}

/// Accumulate a payment against a bill. Once the paid amount covers the
/// total the bill is `PAID`; anything less is `PARTIALLY_PAID`.
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<RecordPayment>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::payment(&body)?;
    let id = parse_id(&id_str)?;
    let bill = BillingService::get(&state.guard, &state.pool, id)
        .await
        .into_result()?
        .ok_or_else(|| AppError::NotFound(id_str.clone()))?;

    match bill.status {
        BillStatus::Cancelled | BillStatus::Refunded => {
            return Err(AppError::Conflict(format!(
                "cannot record a payment on a {:?} bill",
                bill.status
            )));
        }
        BillStatus::Paid => {
            return Err(AppError::Conflict("bill is already paid in full".into()));
        }
        BillStatus::Pending | BillStatus::PartiallyPaid | BillStatus::Overdue => {}
    }

    let paid_amount = bill.paid_amount.unwrap_or(0) + body.amount;
    let status = if paid_amount >= bill.total_amount {
        BillStatus::Paid
    } else {
        BillStatus::PartiallyPaid
    };
    let row = BillingService::apply_payment(
        &state.guard,
        &state.pool,
        id,
        paid_amount,
        status,
        body.payment_method,
        body.payment_reference.as_deref(),
    )
    .await
    .into_result()?
    .ok_or(AppError::NotFound(id_str))?;
    Ok(success_one_ok(row))
}
