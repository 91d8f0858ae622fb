//! Patient record services.

use crate::model::{Appointment, Bill, NewPatient, Page, Patient, PatientWithRelations, UpdatePatient, User};
use crate::remote::{Guard, Outcome, Reply};
use crate::service::ids::record_number;
use crate::store::qualified_table;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct PatientFilter {
    /// Case-insensitive substring match on first or last name.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub blood_group: Option<String>,
}

fn push_filters(q: &mut QueryBuilder<'_, Postgres>, filter: &PatientFilter) {
    if let Some(active) = filter.is_active {
        q.push(" AND is_active = ").push_bind(active);
    }
    if let Some(search) = &filter.search {
        let needle = format!("%{}%", search);
        q.push(" AND (first_name ILIKE ")
            .push_bind(needle.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(needle)
            .push(")");
    }
    if let Some(group) = &filter.blood_group {
        q.push(" AND blood_group = ").push_bind(group.clone());
    }
}

pub struct PatientService;

impl PatientService {
    pub async fn list(
        guard: &Guard,
        pool: &PgPool,
        filter: &PatientFilter,
        limit: u32,
        offset: u32,
    ) -> Outcome<Page<Patient>> {
        guard
            .run(|| async move {
                let table = qualified_table("patients");
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
                let rows = q.build_query_as::<Patient>().fetch_all(pool).await?;

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

    pub async fn get(guard: &Guard, pool: &PgPool, id: Uuid) -> Outcome<Option<Patient>> {
        guard
            .run(|| async move {
                let sql = format!("SELECT * FROM {} WHERE id = $1", qualified_table("patients"));
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Patient>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Patient plus appointments, bills, and the creating user.
    pub async fn get_full(
        guard: &Guard,
        pool: &PgPool,
        id: Uuid,
    ) -> Outcome<Option<PatientWithRelations>> {
        guard
            .run(|| async move {
                let sql = format!("SELECT * FROM {} WHERE id = $1", qualified_table("patients"));
                let patient = sqlx::query_as::<_, Patient>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                let Some(patient) = patient else {
                    return Ok(Reply::ok(None));
                };

                let appointments = sqlx::query_as::<_, Appointment>(&format!(
                    "SELECT * FROM {} WHERE patient_id = $1 ORDER BY scheduled_at DESC",
                    qualified_table("appointments")
                ))
                .bind(id)
                .fetch_all(pool)
                .await?;

                let bills = sqlx::query_as::<_, Bill>(&format!(
                    "SELECT * FROM {} WHERE patient_id = $1 ORDER BY created_at DESC",
                    qualified_table("bills")
                ))
                .bind(id)
                .fetch_all(pool)
                .await?;

                let created_by_user = sqlx::query_as::<_, User>(&format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("users")
                ))
                .bind(patient.created_by)
                .fetch_optional(pool)
                .await?;

                Ok(Reply::ok(Some(PatientWithRelations {
                    patient,
                    created_by_user,
                    appointments,
                    bills,
                })))
            })
            .await
    }

    /// Insert one patient. The record number is generated here so the
    /// create is a single round trip.
    pub async fn create(guard: &Guard, pool: &PgPool, p: &NewPatient) -> Outcome<Patient> {
        guard
            .run(|| async move {
                let sql = format!(
                    "INSERT INTO {} (id, record_number, first_name, last_name, age, gender, phone, \
                     email, address, emergency_contact_name, emergency_contact_phone, \
                     medical_history, allergies, current_medications, blood_group, notes, created_by) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
                     RETURNING *",
                    qualified_table("patients")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Patient>(&sql)
                    .bind(Uuid::new_v4())
                    .bind(record_number("PAT"))
                    .bind(&p.first_name)
                    .bind(&p.last_name)
                    .bind(p.age)
                    .bind(p.gender)
                    .bind(&p.phone)
                    .bind(&p.email)
                    .bind(&p.address)
                    .bind(&p.emergency_contact_name)
                    .bind(&p.emergency_contact_phone)
                    .bind(&p.medical_history)
                    .bind(&p.allergies)
                    .bind(&p.current_medications)
                    .bind(&p.blood_group)
                    .bind(&p.notes)
                    .bind(p.created_by)
                    .fetch_one(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Partial update; only the fields present in `patch` change. Callers
    /// must reject an empty patch before getting here.
    pub async fn update(
        guard: &Guard,
        pool: &PgPool,
        id: Uuid,
        patch: &UpdatePatient,
    ) -> Outcome<Option<Patient>> {
        guard
            .run(|| async move {
                let mut q = QueryBuilder::<Postgres>::new(format!(
                    "UPDATE {} SET ",
                    qualified_table("patients")
                ));
                {
                    let mut set = q.separated(", ");
                    if let Some(v) = &patch.first_name {
                        set.push("first_name = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.last_name {
                        set.push("last_name = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = patch.age {
                        set.push("age = ").push_bind_unseparated(v);
                    }
                    if let Some(v) = &patch.phone {
                        set.push("phone = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.email {
                        set.push("email = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.address {
                        set.push("address = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.emergency_contact_name {
                        set.push("emergency_contact_name = ")
                            .push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.emergency_contact_phone {
                        set.push("emergency_contact_phone = ")
                            .push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.medical_history {
                        set.push("medical_history = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.allergies {
                        set.push("allergies = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.current_medications {
                        set.push("current_medications = ")
                            .push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.blood_group {
                        set.push("blood_group = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.notes {
                        set.push("notes = ").push_bind_unseparated(v.clone());
                    }
                    set.push("updated_at = NOW()");
                }
                q.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
                tracing::debug!(sql = %q.sql(), "query");
                let row = q.build_query_as::<Patient>().fetch_optional(pool).await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Soft delete: the row stays for appointment and billing history.
    pub async fn archive(guard: &Guard, pool: &PgPool, id: Uuid) -> Outcome<Option<Patient>> {
        guard
            .run(|| async move {
                let sql = format!(
                    "UPDATE {} SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
                    qualified_table("patients")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Patient>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }
}
