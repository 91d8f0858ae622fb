//! Dashboard aggregate shapes and the pagination carrier.

use serde::Serialize;
use std::collections::BTreeMap;

/// Headline figures for the dashboard. Revenue is paise.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_patients: i64,
    pub total_doctors: i64,
    pub today_appointments: i64,
    pub pending_bills: i64,
    pub monthly_revenue: i64,
}

/// One point of a monthly series, keyed `YYYY-MM`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct MonthPoint {
    pub month: String,
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct ChartBreakdowns {
    pub appointments_by_status: BTreeMap<String, i64>,
    pub appointments_by_type: BTreeMap<String, i64>,
    pub revenue_by_payment_method: BTreeMap<String, i64>,
    pub revenue_by_month: Vec<MonthPoint>,
    pub patients_by_month: Vec<MonthPoint>,
}

/// A page of rows plus the unpaginated total.
#[derive(Debug)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: i64,
}
