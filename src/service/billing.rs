//! Billing services: bill creation with GST arithmetic and payment
//! recording. All money values are integer paise.

use crate::model::{
    Appointment, Bill, BillItem, BillStatus, BillWithRelations, NewBill, Page, Patient,
    PaymentMethod,
};
use crate::remote::{Guard, Outcome, RemoteError, Reply};
use crate::service::ids::record_number;
use crate::store::qualified_table;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Intra-state supplies split GST evenly between centre and state;
/// inter-state supplies attract the full rate as IGST.
const CGST_PERCENT: i64 = 9;
const SGST_PERCENT: i64 = 9;
const IGST_PERCENT: i64 = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BillTotals {
    pub subtotal: i64,
    pub discount: i64,
    pub cgst: i64,
    pub sgst: i64,
    pub igst: i64,
    pub total_tax: i64,
    pub total_amount: i64,
}

/// Derive every money column from the line items. Tax applies to the
/// discounted base, never below zero; integer division truncates.
pub fn compute_totals(
    items: &[BillItem],
    consultation_fee: i64,
    discount: i64,
    inter_state: bool,
) -> BillTotals {
    let items_total: i64 = items.iter().map(|i| i.quantity * i.unit_price).sum();
    let subtotal = items_total + consultation_fee;
    let base = (subtotal - discount).max(0);
    let (cgst, sgst, igst) = if inter_state {
        (0, 0, base * IGST_PERCENT / 100)
    } else {
        (base * CGST_PERCENT / 100, base * SGST_PERCENT / 100, 0)
    };
    let total_tax = cgst + sgst + igst;
    BillTotals {
        subtotal,
        discount,
        cgst,
        sgst,
        igst,
        total_tax,
        total_amount: base + total_tax,
    }
}

#[derive(Clone, Debug, Default)]
pub struct BillFilter {
    pub patient_id: Option<Uuid>,
    pub status: Option<BillStatus>,
}

fn push_filters(q: &mut QueryBuilder<'_, Postgres>, filter: &BillFilter) {
    if let Some(id) = filter.patient_id {
        q.push(" AND patient_id = ").push_bind(id);
    }
    if let Some(status) = filter.status {
        q.push(" AND status = ").push_bind(status);
    }
}

pub struct BillingService;

impl BillingService {
    pub async fn list(
        guard: &Guard,
        pool: &PgPool,
        filter: &BillFilter,
        limit: u32,
        offset: u32,
    ) -> Outcome<Page<Bill>> {
        guard
            .run(|| async move {
                let table = qualified_table("bills");
                let mut q = QueryBuilder::<Postgres>::new(format!(
                    "SELECT * FROM {} WHERE 1=1",
                    table
                ));
                push_filters(&mut q, filter);
                q.push(" ORDER BY created_at DESC LIMIT ")
                    .push_bind(limit as i64)
                    .push(" OFFSET ")
                    .push_bind(offset as i64);
                tracing::debug!(sql = %q.sql(), "query");
                let rows = q.build_query_as::<Bill>().fetch_all(pool).await?;

                let mut c = QueryBuilder::<Postgres>::new(format!(
                    "SELECT COUNT(*) FROM {} WHERE 1=1",
                    table
                ));
                push_filters(&mut c, filter);
                let total: i64 = c.build_query_scalar().fetch_one(pool).await?;
                Ok(Reply::ok(Page { rows, total }))
            })
            .await
    }

    pub async fn get(guard: &Guard, pool: &PgPool, id: Uuid) -> Outcome<Option<Bill>> {
        guard
            .run(|| async move {
                let sql = format!("SELECT * FROM {} WHERE id = $1", qualified_table("bills"));
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Bill>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Bill plus its patient and appointment.
    pub async fn get_full(
        guard: &Guard,
        pool: &PgPool,
        id: Uuid,
    ) -> Outcome<Option<BillWithRelations>> {
        guard
            .run(|| async move {
                let sql = format!("SELECT * FROM {} WHERE id = $1", qualified_table("bills"));
                let bill = sqlx::query_as::<_, Bill>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                let Some(bill) = bill else {
                    return Ok(Reply::ok(None));
                };

                let patient = sqlx::query_as::<_, Patient>(&format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("patients")
                ))
                .bind(bill.patient_id)
                .fetch_optional(pool)
                .await?;

                let appointment = sqlx::query_as::<_, Appointment>(&format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("appointments")
                ))
                .bind(bill.appointment_id)
                .fetch_optional(pool)
                .await?;

                Ok(Reply::ok(Some(BillWithRelations {
                    bill,
                    patient,
                    appointment,
                })))
            })
            .await
    }

    /// Insert one bill with all money columns derived server-side.
    pub async fn create(guard: &Guard, pool: &PgPool, b: &NewBill) -> Outcome<Bill> {
        let totals = compute_totals(
            &b.items,
            b.consultation_fee,
            b.discount.unwrap_or(0),
            b.inter_state,
        );
        guard
            .run(|| async move {
                let items = serde_json::to_value(&b.items)
                    .map_err(|e| RemoteError::service(format!("encode bill items: {}", e)))?;
                let sql = format!(
                    "INSERT INTO {} (id, bill_number, patient_id, appointment_id, items, \
                     consultation_fee, subtotal, discount, cgst, sgst, igst, total_tax, \
                     total_amount, notes, created_by) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
                     RETURNING *",
                    qualified_table("bills")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Bill>(&sql)
                    .bind(Uuid::new_v4())
                    .bind(record_number("BILL"))
                    .bind(b.patient_id)
                    .bind(b.appointment_id)
                    .bind(items)
                    .bind(b.consultation_fee)
                    .bind(totals.subtotal)
                    .bind(totals.discount)
                    .bind(totals.cgst)
                    .bind(totals.sgst)
                    .bind(totals.igst)
                    .bind(totals.total_tax)
                    .bind(totals.total_amount)
                    .bind(&b.notes)
                    .bind(b.created_by)
                    .fetch_one(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Write an accumulated payment. Callers decide the resulting status
    /// from the amounts before calling.
    pub async fn apply_payment(
        guard: &Guard,
        pool: &PgPool,
        id: Uuid,
        paid_amount: i64,
        status: BillStatus,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> Outcome<Option<Bill>> {
        guard
            .run(|| async move {
                let sql = format!(
                    "UPDATE {} SET paid_amount = $1, status = $2, payment_method = $3, \
                     payment_date = NOW(), payment_reference = $4, updated_at = NOW() \
                     WHERE id = $5 RETURNING *",
                    qualified_table("bills")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Bill>(&sql)
                    .bind(paid_amount)
                    .bind(status)
                    .bind(method)
                    .bind(reference)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<BillItem> {
        vec![
            BillItem {
                description: "X-ray".into(),
                quantity: 1,
                unit_price: 50_000,
            },
            BillItem {
                description: "Dressing kit".into(),
                quantity: 2,
                unit_price: 7_500,
            },
        ]
    }

    #[test]
    fn intra_state_splits_gst_evenly() {
        let t = compute_totals(&items(), 30_000, 0, false);
        assert_eq!(t.subtotal, 95_000);
        assert_eq!(t.cgst, 8_550);
        assert_eq!(t.sgst, 8_550);
        assert_eq!(t.igst, 0);
        assert_eq!(t.total_tax, 17_100);
        assert_eq!(t.total_amount, 112_100);
    }

    #[test]
    fn inter_state_charges_igst_only() {
        let t = compute_totals(&items(), 30_000, 0, true);
        assert_eq!(t.cgst, 0);
        assert_eq!(t.sgst, 0);
        assert_eq!(t.igst, 17_100);
        assert_eq!(t.total_amount, 112_100);
    }

    #[test]
    fn discount_reduces_the_tax_base() {
        let t = compute_totals(&items(), 30_000, 15_000, false);
        assert_eq!(t.subtotal, 95_000);
        // Tax on 80_000, not 95_000.
        assert_eq!(t.cgst, 7_200);
        assert_eq!(t.total_amount, 80_000 + 14_400);
    }

    #[test]
    fn discount_larger_than_subtotal_floors_at_zero() {
        let t = compute_totals(&[], 10_000, 50_000, false);
        assert_eq!(t.subtotal, 10_000);
        assert_eq!(t.total_tax, 0);
        assert_eq!(t.total_amount, 0);
    }

    #[test]
    fn empty_bill_is_all_zeroes() {
        let t = compute_totals(&[], 0, 0, false);
        assert_eq!(t.total_amount, 0);
        assert_eq!(t.total_tax, 0);
    }
}
