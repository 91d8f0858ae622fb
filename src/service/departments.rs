//! Department services.

use crate::model::{Department, NewDepartment, UpdateDepartment};
use crate::remote::{Guard, Outcome, Reply};
use crate::store::qualified_table;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct DepartmentService;

impl DepartmentService {
    /// Departments are few; the list is unpaginated.
    pub async fn list(
        guard: &Guard,
        pool: &PgPool,
        is_active: Option<bool>,
    ) -> Outcome<Vec<Department>> {
        guard
            .run(|| async move {
                let mut q = QueryBuilder::<Postgres>::new(format!(
                    "SELECT * FROM {} WHERE 1=1",
                    qualified_table("departments")
                ));
                if let Some(active) = is_active {
                    q.push(" AND is_active = ").push_bind(active);
                }
                q.push(" ORDER BY name");
                tracing::debug!(sql = %q.sql(), "query");
                let rows = q.build_query_as::<Department>().fetch_all(pool).await?;
                Ok(Reply::ok(rows))
            })
            .await
    }

    pub async fn get(guard: &Guard, pool: &PgPool, id: Uuid) -> Outcome<Option<Department>> {
        guard
            .run(|| async move {
                let sql = format!(
                    "SELECT * FROM {} WHERE id = $1",
                    qualified_table("departments")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Department>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    pub async fn create(guard: &Guard, pool: &PgPool, d: &NewDepartment) -> Outcome<Department> {
        guard
            .run(|| async move {
                let sql = format!(
                    "INSERT INTO {} (id, name, description, head_doctor_id) \
                     VALUES ($1, $2, $3, $4) RETURNING *",
                    qualified_table("departments")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, Department>(&sql)
                    .bind(Uuid::new_v4())
                    .bind(&d.name)
                    .bind(&d.description)
                    .bind(d.head_doctor_id)
                    .fetch_one(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    pub async fn update(
        guard: &Guard,
        pool: &PgPool,
        id: Uuid,
        patch: &UpdateDepartment,
    ) -> Outcome<Option<Department>> {
        guard
            .run(|| async move {
                let mut q = QueryBuilder::<Postgres>::new(format!(
                    "UPDATE {} SET ",
                    qualified_table("departments")
                ));
                {
                    let mut set = q.separated(", ");
                    if let Some(v) = &patch.name {
                        set.push("name = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = &patch.description {
                        set.push("description = ").push_bind_unseparated(v.clone());
                    }
                    if let Some(v) = patch.head_doctor_id {
                        set.push("head_doctor_id = ").push_bind_unseparated(v);
                    }
                    if let Some(v) = patch.is_active {
                        set.push("is_active = ").push_bind_unseparated(v);
                    }
                    set.push("updated_at = NOW()");
                }
                q.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
                tracing::debug!(sql = %q.sql(), "query");
                let row = q.build_query_as::<Department>().fetch_optional(pool).await?;
                Ok(Reply::ok(row))
            })
            .await
    }
}
