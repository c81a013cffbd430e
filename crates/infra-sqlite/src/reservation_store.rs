// SQLite ReservationStore Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use waitlist_core::domain::{NewReservation, Reservation, ReservationId};
use waitlist_core::error::{AppError, Result};
use waitlist_core::port::ReservationStore;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            // SQLite error codes: https://www.sqlite.org/rescode.html
            match db_err.code().as_deref() {
                Some("275") | Some("1299") => {
                    // CHECK / NOT NULL constraint failed
                    AppError::Store(format!("Constraint violation: {}", message))
                }
                Some("5") => AppError::Store(format!("Database locked (SQLITE_BUSY): {}", message)),
                Some("13") => AppError::Store(format!("Database full: {}", message)),
                Some(code) => AppError::Store(format!("Database error [{}]: {}", code, message)),
                None => AppError::Store(format!("Database error: {}", message)),
            }
        }
        sqlx::Error::RowNotFound => AppError::Store("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Store(format!("Column not found: {}", col)),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            AppError::Store(format!("Store unavailable: {}", err))
        }
        _ => AppError::Store(err.to_string()),
    }
}

pub struct SqliteReservationStore {
    pool: SqlitePool,
}

impl SqliteReservationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every row including retired ones, ascending by id (audit/tests)
    pub async fn list_all(&self) -> Result<Vec<Reservation>> {
        let rows: Vec<ReservationRow> =
            sqlx::query_as("SELECT * FROM reservations ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ReservationRow::into_reservation).collect())
    }
}

#[async_trait]
impl ReservationStore for SqliteReservationStore {
    async fn insert_active(&self, new: &NewReservation) -> Result<Reservation> {
        let row: ReservationRow = sqlx::query_as(
            r#"
            INSERT INTO reservations (display_name, contact_address, active, created_at, updated_at)
            VALUES (?, ?, 1, ?, ?)
            RETURNING *
            "#,
        )
        .bind(new.display_name.as_str())
        .bind(new.contact_address.as_ref().map(|a| a.as_str()))
        .bind(new.created_at)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_reservation())
    }

    async fn set_inactive(&self, id: ReservationId, updated_at: i64) -> Result<bool> {
        // Conditional update: a repeated leave changes nothing, including
        // the departure timestamp
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET active = 0, updated_at = ?
            WHERE id = ? AND active = 1
            "#,
        )
        .bind(updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let retired = result.rows_affected() > 0;
        debug!(reservation_id = id, retired, "set_inactive applied");
        Ok(retired)
    }

    async fn list_active(&self, limit: Option<u32>) -> Result<Vec<Reservation>> {
        // LIMIT -1 means "no limit" in SQLite
        let limit = limit.map(i64::from).unwrap_or(-1);

        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
            SELECT * FROM reservations
            WHERE active = 1
            ORDER BY id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ReservationRow::into_reservation).collect())
    }

    async fn count_active(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE active = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    display_name: String,
    contact_address: Option<String>,
    active: i64, // SQLite boolean as integer
    created_at: i64,
    updated_at: i64,
}

impl ReservationRow {
    fn into_reservation(self) -> Reservation {
        Reservation {
            id: self.id,
            display_name: self.display_name,
            contact_address: self.contact_address,
            active: self.active != 0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
