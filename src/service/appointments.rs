//! Appointment scheduling services.

use crate::model::{
    Appointment, AppointmentStatus, AppointmentWithRelations, Bill, Department, NewAppointment,
    Page, Patient, UpdateAppointment, User,
};
use crate::remote::{Guard, Outcome, Reply};
use crate::service::ids::record_number;
use crate::store::qualified_table;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const DEFAULT_DURATION_MINUTES: i32 = 30;
const DEFAULT_TYPE: &str = "CONSULTATION";

#[derive(Clone, Debug, Default)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    /// Restrict to one calendar day (UTC).
    pub on: Option<NaiveDate>,
}

fn push_filters(q: &mut QueryBuilder<'_, Postgres>, filter: &AppointmentFilter) {
    if let Some(id) = filter.patient_id {
        q.push(" AND patient_id = ").push_bind(id);
    }
    if let Some(id) = filter.doctor_id {
        q.push(" AND doctor_id = ").push_bind(id);
    }
    if let Some(id) = filter.department_id {
        q.push(" AND department_id = ").push_bind(id);
    }
    if let Some(status) = filter.status {
        q.push(" AND status = ").push_bind(status);
    }
    if let Some(day) = filter.on {
        let start: DateTime<Utc> = day.and_time(NaiveTime::MIN).and_utc();
        let end = start + chrono::Duration::days(1);
        q.push(" AND scheduled_at >= ")
            .push_bind(start)
            .push(" AND scheduled_at < ")
            .push_bind(end);
    }
}

pub struct AppointmentService;

impl AppointmentService {
    pub async fn list(
        guard: &Guard,
        pool: &PgPool,
        filter: &AppointmentFilter,
        limit: u32,
        offset: u32,
    ) -> Outcome<Page<Appointment>> {
        guard
            .run(|| async move {
                let table = qualified_table("appointments");
                let mut q = QueryBuilder::<Postgres>::new(format!(
                    "SELECT * FROM {} WHERE 1=1",
                    table
                ));
                push_filters(&mut q, filter);
                q.push(" ORDER BY scheduled_at DESC LIMIT ")
                    .push_bind(limit as i64)
                    .push(" OFFSET ")
                    .push_bind(offset as i64);
                tracing::debug!(sql = %q.sql(), "query");
                let rows = q.build_query_as::<Appointment>().fetch_all(pool).await?;

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

    /// Appointments scheduled for the current day, earliest first.
    pub async fn today(guard: &Guard, pool: &PgPool) -> Outcome<Vec<Appointment>> {
        guard
            .run(|| async move {
                let sql = format!(
                    "SELECT * FROM {} WHERE scheduled_at >= date_trunc('day', NOW()) \
                     AND scheduled_at < date_trunc('day', NOW()) + INTERVAL '1 day' \
                     ORDER BY scheduled_at",
                    qualified_table("appointments")
                );
                tracing::debug!(sql = %sql, "query");
                let rows = sqlx::query_as::<_, Appointment>(&sql).fetch_all(pool).await?;
                Ok(Reply::ok(rows))
            })
            .await
    }

    pub async fn get(guard: &Guard, pool: &PgPool, id: Uuid) -> Outcome<Option<Appointment>> {
        guard
            .run(|| async move {
                let sql = format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("appointments")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Appointment>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Appointment plus patient, doctor, department, and bills.
    pub async fn get_full(
        guard: &Guard,
        pool: &PgPool,
        id: Uuid,
    ) -> Outcome<Option<AppointmentWithRelations>> {
        guard
            .run(|| async move {
                let sql = format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("appointments")
                );
                let appointment = sqlx::query_as::<_, Appointment>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                let Some(appointment) = appointment else {
                    return Ok(Reply::ok(None));
                };

                let patient = sqlx::query_as::<_, Patient>(&format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("patients")
                ))
                .bind(appointment.patient_id)
                .fetch_optional(pool)
                .await?;

                let doctor = sqlx::query_as::<_, User>(&format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("users")
                ))
                .bind(appointment.doctor_id)
                .fetch_optional(pool)
                .await?;

                let department = sqlx::query_as::<_, Department>(&format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("departments")
                ))
                .bind(appointment.department_id)
                .fetch_optional(pool)
                .await?;

                let bills = sqlx::query_as::<_, Bill>(&format!(
                    "SELECT * FROM {} WHERE appointment_id = $1 ORDER BY created_at DESC",
                    qualified_table("bills")
                ))
                .bind(id)
                .fetch_all(pool)
                .await?;

                Ok(Reply::ok(Some(AppointmentWithRelations {
                    appointment,
                    patient,
                    doctor,
                    department,
                    bills,
                })))
            })
            .await
    }

    pub async fn create(guard: &Guard, pool: &PgPool, a: &NewAppointment) -> Outcome<Appointment> {
        guard
            .run(|| async move {
                let sql = format!(
                    "INSERT INTO {} (id, record_number, patient_id, doctor_id, department_id, \
                     scheduled_at, duration_minutes, reason, appointment_type, notes) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
                    qualified_table("appointments")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Appointment>(&sql)
                    .bind(Uuid::new_v4())
                    .bind(record_number("APT"))
                    .bind(a.patient_id)
                    .bind(a.doctor_id)
                    .bind(a.department_id)
                    .bind(a.scheduled_at)
                    .bind(a.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES))
                    .bind(&a.reason)
                    .bind(a.appointment_type.as_deref().unwrap_or(DEFAULT_TYPE))
                    .bind(&a.notes)
                    .fetch_one(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Partial update of clinical fields. Status moves go through
    /// [`AppointmentService::set_status`].
    pub async fn update(
        guard: &Guard,
        pool: &PgPool,
        id: Uuid,
        patch: &UpdateAppointment,
    ) -> Outcome<Option<Appointment>> {
        guard
            .run(|| async move {
                let mut q = QueryBuilder::<Postgres>::new(format!(
                    "UPDATE {} SET ",
                    qualified_table("appointments")
                ));
                {
                    let mut set = q.separated(", ");
                    if let Some(v) = patch.scheduled_at {
                        set.push("scheduled_at = ").push_bind_unseparated(v);
                    }
                    if let Some(v) = patch.duration_minutes {
                        set.push("duration_minutes = ").push_bind_unseparated(v);
                    }
                    if let Some(v) = &patch.reason {
                        set.push("reason = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.diagnosis {
                        set.push("diagnosis = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.prescription {
                        set.push("prescription = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = patch.follow_up_date {
                        set.push("follow_up_date = ").push_bind_unseparated(v);
                    }
                    if let Some(v) = &patch.notes {
                        set.push("notes = ").push_bind_unseparated(v.clone());
                    }
                    set.push("updated_at = NOW()");
                }
                q.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
                tracing::debug!(sql = %q.sql(), "query");
                let row = q.build_query_as::<Appointment>().fetch_optional(pool).await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Move `id` from `from` to `to`, stamping the actual start or end time
    /// where the move implies one. The previous status is part of the WHERE
    /// clause, so a concurrent move leaves this update matching zero rows.
    pub async fn set_status(
        guard: &Guard,
        pool: &PgPool,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Outcome<Option<Appointment>> {
        guard
            .run(|| async move {
                let table = qualified_table("appointments");
                let sql = match to {
                    AppointmentStatus::InProgress => format!(
                        "UPDATE {} SET status = $1, actual_start_time = NOW(), updated_at = NOW() \
                         WHERE id = $2 AND status = $3 RETURNING *",
                        table
                    ),
                    AppointmentStatus::Completed => format!(
                        "UPDATE {} SET status = $1, actual_end_time = NOW(), updated_at = NOW() \
                         WHERE id = $2 AND status = $3 RETURNING *",
                        table
                    ),
                    _ => format!(
                        "UPDATE {} SET status = $1, updated_at = NOW() \
                         WHERE id = $2 AND status = $3 RETURNING *",
                        table
                    ),
                };
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Appointment>(&sql)
                    .bind(to)
                    .bind(id)
                    .bind(from)
                    .fetch_optional(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }
}
