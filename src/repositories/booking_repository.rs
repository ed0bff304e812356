use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{BookingStats, BookingStatus, TestDriveBooking};
use crate::utils::errors::{AppError, AppResult};

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar una reserva nueva en estado PENDING.
    ///
    /// El índice único parcial sobre (car_id, booking_date, start_time) es la
    /// guardia autoritativa contra el doble-booking: si dos requests pasan el
    /// pre-chequeo a la vez, la segunda inserción viola el índice y se
    /// devuelve `Conflict`.
    pub async fn create(
        &self,
        car_id: Uuid,
        user_id: Uuid,
        booking_date: NaiveDate,
        start_time: &str,
        end_time: &str,
        notes: Option<&str>,
    ) -> AppResult<TestDriveBooking> {
        let id = Uuid::new_v4();

        let booking = sqlx::query_as::<_, TestDriveBooking>(
            r#"
            INSERT INTO test_drive_bookings (
                id, car_id, user_id, booking_date, start_time, end_time, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(car_id)
        .bind(user_id)
        .bind(booking_date)
        .bind(start_time)
        .bind(end_time)
        .bind(notes)
        .bind(BookingStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "This time slot is already booked".to_string(),
                    );
                }
            }
            AppError::Database(e)
        })?;

        Ok(booking)
    }

    /// Comprobar si un slot ya está ocupado por una reserva activa
    pub async fn slot_taken(
        &self,
        car_id: Uuid,
        booking_date: NaiveDate,
        start_time: &str,
    ) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM test_drive_bookings
                WHERE car_id = $1
                  AND booking_date = $2
                  AND start_time = $3
                  AND status IN ($4, $5)
            )
            "#,
        )
        .bind(car_id)
        .bind(booking_date)
        .bind(start_time)
        .bind(BookingStatus::Pending)
        .bind(BookingStatus::Confirmed)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TestDriveBooking>> {
        let booking =
            sqlx::query_as::<_, TestDriveBooking>("SELECT * FROM test_drive_bookings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(booking)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> AppResult<TestDriveBooking> {
        let booking = sqlx::query_as::<_, TestDriveBooking>(
            r#"
            UPDATE test_drive_bookings
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        Ok(booking)
    }

    /// Reservas del usuario, la fecha más próxima primero
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TestDriveBooking>> {
        let bookings = sqlx::query_as::<_, TestDriveBooking>(
            r#"
            SELECT * FROM test_drive_bookings
            WHERE user_id = $1
            ORDER BY booking_date DESC, start_time ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Listado del panel de administración con filtros opcionales de estado
    /// y de texto sobre la marca/modelo del coche
    pub async fn list_admin(
        &self,
        search: Option<&str>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<TestDriveBooking>> {
        let search = search
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string());

        let bookings = sqlx::query_as::<_, TestDriveBooking>(
            r#"
            SELECT b.* FROM test_drive_bookings b
            JOIN cars c ON c.id = b.car_id
            WHERE ($1::text IS NULL OR c.make ILIKE '%' || $1 || '%' OR c.model ILIKE '%' || $1 || '%')
              AND ($2::booking_status IS NULL OR b.status = $2)
            ORDER BY b.booking_date DESC, b.start_time ASC
            "#,
        )
        .bind(search)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Conteos de reservas para el dashboard
    pub async fn stats(&self) -> AppResult<BookingStats> {
        let stats = sqlx::query_as::<_, BookingStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = $1) AS pending,
                COUNT(*) FILTER (WHERE status = $2) AS confirmed,
                COUNT(*) FILTER (WHERE status = $3) AS completed
            FROM test_drive_bookings
            "#,
        )
        .bind(BookingStatus::Pending)
        .bind(BookingStatus::Confirmed)
        .bind(BookingStatus::Completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
