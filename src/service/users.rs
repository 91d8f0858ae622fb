//! Staff user services. Authentication lives outside this crate; rows here
//! are directory entries referenced by patients, appointments, and bills.

use crate::model::{NewUser, Page, Role, User};
use crate::remote::{Guard, Outcome, Reply};
use crate::store::qualified_table;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

fn push_filters(q: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(role) = filter.role {
        q.push(" AND role = ").push_bind(role);
    }
    if let Some(active) = filter.is_active {
        q.push(" AND is_active = ").push_bind(active);
    }
}

pub struct UserService;

impl UserService {
    pub async fn list(
        guard: &Guard,
        pool: &PgPool,
        filter: &UserFilter,
        limit: u32,
        offset: u32,
    ) -> Outcome<Page<User>> {
        guard
            .run(|| async move {
                let table = qualified_table("users");
                let mut q = QueryBuilder::<Postgres>::new(format!(
                    "SELECT * FROM {} WHERE 1=1",
                    table
                ));
                push_filters(&mut q, filter);
                q.push(" ORDER BY last_name, first_name LIMIT ")
                    .push_bind(limit as i64)
                    .push(" OFFSET ")
                    .push_bind(offset as i64);
                tracing::debug!(sql = %q.sql(), "query");
                let rows = q.build_query_as::<User>().fetch_all(pool).await?;

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

    pub async fn get(guard: &Guard, pool: &PgPool, id: Uuid) -> Outcome<Option<User>> {
        guard
            .run(|| async move {
                let sql = format!("SELECT * FROM {} WHERE id = $1", qualified_table("users"));
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, User>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }

    /// Active doctors, for scheduling pickers.
    pub async fn doctors(guard: &Guard, pool: &PgPool) -> Outcome<Vec<User>> {
        guard
            .run(|| async move {
                let sql = format!(
                    "SELECT * FROM {} WHERE role = $1 AND is_active ORDER BY last_name, first_name",
                    qualified_table("users")
                );
                tracing::debug!(sql = %sql, "query");
                let rows = sqlx::query_as::<_, User>(&sql)
                    .bind(Role::Doctor)
                    .fetch_all(pool)
                    .await?;
                Ok(Reply::ok(rows))
            })
            .await
    }

    /// Provision one staff user. A duplicate email surfaces as a normalized
    /// `23505` error.
    pub async fn create(guard: &Guard, pool: &PgPool, u: &NewUser) -> Outcome<User> {
        guard
            .run(|| async move {
                let sql = format!(
                    "INSERT INTO {} (id, email, first_name, last_name, role) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING *",
                    qualified_table("users")
                );
                tracing::debug!(sql = %sql, "query");
                let row = sqlx::query_as::<_, User>(&sql)
                    .bind(Uuid::new_v4())
                    .bind(&u.email)
                    .bind(&u.first_name)
                    .bind(&u.last_name)
                    .bind(u.role)
                    .fetch_one(pool)
                    .await?;
                Ok(Reply::ok(row))
            })
            .await
    }
}
