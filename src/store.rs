//! Hospital table DDL and database bootstrap. All tables live in a schema
//! named from `HOSPITAL_SCHEMA` env (default `hospital`).

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Schema name for hospital tables. From env `HOSPITAL_SCHEMA`, default
/// `hospital`. Must be a valid PostgreSQL identifier.
pub fn hospital_schema() -> String {
    std::env::var("HOSPITAL_SCHEMA").unwrap_or_else(|_| "hospital".into())
}

/// Returns the schema-qualified table name (e.g. "hospital.patients").
pub fn qualified_table(table: &str) -> String {
    format!("{}.{}", hospital_schema(), table)
}

/// Create the schema if missing, then all hospital tables and the indexes
/// the list queries rely on. Idempotent; safe to run at every startup.
pub async fn ensure_hospital_tables(pool: &PgPool) -> Result<(), AppError> {
    let schema = hospital_schema();
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;

    for ddl in table_ddl(&schema) {
        sqlx::query(&ddl).execute(pool).await?;
    }

    // Columns added after the first release; additive so existing
    // deployments migrate in place.
    for alter in [
        format!(
            "ALTER TABLE {}.patients ADD COLUMN IF NOT EXISTS blood_group TEXT",
            schema
        ),
        format!(
            "ALTER TABLE {}.appointments ADD COLUMN IF NOT EXISTS follow_up_date DATE",
            schema
        ),
        format!(
            "ALTER TABLE {}.bills ADD COLUMN IF NOT EXISTS payment_reference TEXT",
            schema
        ),
    ] {
        let _ = sqlx::query(&alter).execute(pool).await;
    }

    Ok(())
}

fn table_ddl(schema: &str) -> Vec<String> {
    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}.users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('ADMIN', 'DOCTOR', 'NURSE', 'STAFF')),
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            s = schema
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}.departments (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                head_doctor_id UUID REFERENCES {s}.users(id),
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            s = schema
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}.patients (
                id UUID PRIMARY KEY,
                record_number TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                age INTEGER NOT NULL CHECK (age >= 0 AND age <= 150),
                gender TEXT NOT NULL CHECK (gender IN ('M', 'F', 'OTHER')),
                phone TEXT NOT NULL,
                email TEXT,
                address TEXT NOT NULL,
                emergency_contact_name TEXT NOT NULL,
                emergency_contact_phone TEXT NOT NULL,
                medical_history TEXT,
                allergies TEXT,
                current_medications TEXT,
                blood_group TEXT,
                notes TEXT,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                created_by UUID NOT NULL REFERENCES {s}.users(id)
            )
            "#,
            s = schema
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}.appointments (
                id UUID PRIMARY KEY,
                record_number TEXT NOT NULL UNIQUE,
                patient_id UUID NOT NULL REFERENCES {s}.patients(id),
                doctor_id UUID NOT NULL REFERENCES {s}.users(id),
                department_id UUID NOT NULL REFERENCES {s}.departments(id),
                scheduled_at TIMESTAMPTZ NOT NULL,
                duration_minutes INTEGER NOT NULL DEFAULT 30,
                status TEXT NOT NULL DEFAULT 'SCHEDULED'
                    CHECK (status IN ('SCHEDULED', 'CONFIRMED', 'IN_PROGRESS', 'COMPLETED', 'CANCELLED', 'NO_SHOW')),
                reason TEXT NOT NULL,
                appointment_type TEXT NOT NULL DEFAULT 'CONSULTATION',
                actual_start_time TIMESTAMPTZ,
                actual_end_time TIMESTAMPTZ,
                diagnosis TEXT,
                prescription TEXT,
                follow_up_date DATE,
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            s = schema
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}.bills (
                id UUID PRIMARY KEY,
                bill_number TEXT NOT NULL UNIQUE,
                patient_id UUID NOT NULL REFERENCES {s}.patients(id),
                appointment_id UUID NOT NULL REFERENCES {s}.appointments(id),
                items JSONB NOT NULL,
                consultation_fee BIGINT NOT NULL,
                subtotal BIGINT NOT NULL,
                discount BIGINT NOT NULL DEFAULT 0,
                cgst BIGINT NOT NULL DEFAULT 0,
                sgst BIGINT NOT NULL DEFAULT 0,
                igst BIGINT NOT NULL DEFAULT 0,
                total_tax BIGINT NOT NULL,
                total_amount BIGINT NOT NULL,
                paid_amount BIGINT,
                status TEXT NOT NULL DEFAULT 'PENDING'
                    CHECK (status IN ('PENDING', 'PAID', 'PARTIALLY_PAID', 'OVERDUE', 'CANCELLED', 'REFUNDED')),
                payment_method TEXT
                    CHECK (payment_method IN ('CASH', 'CARD', 'UPI', 'BANK_TRANSFER', 'CHEQUE', 'INSURANCE')),
                payment_date TIMESTAMPTZ,
                payment_reference TEXT,
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                created_by UUID NOT NULL REFERENCES {s}.users(id)
            )
            "#,
            s = schema
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_patients_name ON {s}.patients (last_name, first_name)",
            s = schema
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_appointments_scheduled_at ON {s}.appointments (scheduled_at)",
            s = schema
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_appointments_patient ON {s}.appointments (patient_id)",
            s = schema
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON {s}.appointments (doctor_id)",
            s = schema
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_bills_patient ON {s}.bills (patient_id)",
            s = schema
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_bills_status ON {s}.bills (status)",
            s = schema
        ),
    ]
}

/// Ensure the database in `database_url` exists; create it if not. Connects
/// to the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_name_parses_from_url() {
        let (admin, name) =
            parse_db_name_from_url("postgres://user:pw@localhost:5432/hospital?sslmode=disable")
                .unwrap();
        assert_eq!(name, "hospital");
        assert_eq!(admin, "postgres://user:pw@localhost:5432/postgres");
    }

    #[test]
    fn ddl_covers_all_tables() {
        let ddl = table_ddl("hospital").join("\n");
        for table in ["users", "departments", "patients", "appointments", "bills"] {
            assert!(ddl.contains(&format!("hospital.{}", table)));
        }
    }
}
