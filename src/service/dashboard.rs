//! Dashboard aggregation: headline counts and chart series.

use crate::model::{ChartBreakdowns, DashboardStats, MonthPoint};
use crate::remote::{Guard, Outcome, Reply};
use crate::store::qualified_table;
use sqlx::PgPool;
use std::collections::BTreeMap;

pub struct DashboardService;

impl DashboardService {
    pub async fn stats(guard: &Guard, pool: &PgPool) -> Outcome<DashboardStats> {
        guard
            .run(|| async move {
                let patients = qualified_table("patients");
                let users = qualified_table("users");
                let appointments = qualified_table("appointments");
                let bills = qualified_table("bills");

                let total_patients: i64 = sqlx::query_scalar(&format!(
                    "SELECT COUNT(*) FROM {} WHERE is_active",
                    patients
                ))
                .fetch_one(pool)
                .await?;

                let total_doctors: i64 = sqlx::query_scalar(&format!(
                    "SELECT COUNT(*) FROM {} WHERE role = 'DOCTOR' AND is_active",
                    users
                ))
                .fetch_one(pool)
                .await?;

                let today_appointments: i64 = sqlx::query_scalar(&format!(
                    "SELECT COUNT(*) FROM {} WHERE scheduled_at >= date_trunc('day', NOW()) \
                     AND scheduled_at < date_trunc('day', NOW()) + INTERVAL '1 day'",
                    appointments
                ))
                .fetch_one(pool)
                .await?;

                let pending_bills: i64 = sqlx::query_scalar(&format!(
                    "SELECT COUNT(*) FROM {} WHERE status IN ('PENDING', 'PARTIALLY_PAID', 'OVERDUE')",
                    bills
                ))
                .fetch_one(pool)
                .await?;

                let monthly_revenue: i64 = sqlx::query_scalar(&format!(
                    "SELECT COALESCE(SUM(paid_amount), 0)::BIGINT FROM {} \
                     WHERE payment_date >= date_trunc('month', NOW())",
                    bills
                ))
                .fetch_one(pool)
                .await?;

                Ok(Reply::ok(DashboardStats {
                    total_patients,
                    total_doctors,
                    today_appointments,
                    pending_bills,
                    monthly_revenue,
                }))
            })
            .await
    }

    /// Chart series for the trailing twelve months plus categorical
    /// breakdowns over all rows.
    pub async fn charts(guard: &Guard, pool: &PgPool) -> Outcome<ChartBreakdowns> {
        guard
            .run(|| async move {
                let patients = qualified_table("patients");
                let appointments = qualified_table("appointments");
                let bills = qualified_table("bills");

                let by_status: Vec<(String, i64)> = sqlx::query_as(&format!(
                    "SELECT status, COUNT(*) FROM {} GROUP BY status",
                    appointments
                ))
                .fetch_all(pool)
                .await?;

                let by_type: Vec<(String, i64)> = sqlx::query_as(&format!(
                    "SELECT appointment_type, COUNT(*) FROM {} GROUP BY appointment_type",
                    appointments
                ))
                .fetch_all(pool)
                .await?;

                let by_method: Vec<(String, i64)> = sqlx::query_as(&format!(
                    "SELECT payment_method, COALESCE(SUM(paid_amount), 0)::BIGINT FROM {} \
                     WHERE payment_method IS NOT NULL GROUP BY payment_method",
                    bills
                ))
                .fetch_all(pool)
                .await?;

                let revenue_by_month: Vec<(String, i64)> = sqlx::query_as(&format!(
                    "SELECT to_char(date_trunc('month', payment_date), 'YYYY-MM'), \
                     COALESCE(SUM(paid_amount), 0)::BIGINT FROM {} \
                     WHERE payment_date >= date_trunc('month', NOW()) - INTERVAL '11 months' \
                     GROUP BY 1 ORDER BY 1",
                    bills
                ))
                .fetch_all(pool)
                .await?;

                let patients_by_month: Vec<(String, i64)> = sqlx::query_as(&format!(
                    "SELECT to_char(date_trunc('month', created_at), 'YYYY-MM'), COUNT(*) FROM {} \
                     WHERE created_at >= date_trunc('month', NOW()) - INTERVAL '11 months' \
                     GROUP BY 1 ORDER BY 1",
                    patients
                ))
                .fetch_all(pool)
                .await?;

                Ok(Reply::ok(ChartBreakdowns {
                    appointments_by_status: to_map(by_status),
                    appointments_by_type: to_map(by_type),
                    revenue_by_payment_method: to_map(by_method),
                    revenue_by_month: to_series(revenue_by_month),
                    patients_by_month: to_series(patients_by_month),
                }))
            })
            .await
    }
}

fn to_map(rows: Vec<(String, i64)>) -> BTreeMap<String, i64> {
    rows.into_iter().collect()
}

fn to_series(rows: Vec<(String, i64)>) -> Vec<MonthPoint> {
    rows.into_iter()
        .map(|(month, value)| MonthPoint { month, value })
        .collect()
}
