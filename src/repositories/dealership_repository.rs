use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::settings_dto::WorkingHourInput;
use crate::models::dealership::{DayOfWeek, DealershipInfo, WorkingHour};
use crate::utils::errors::AppResult;

pub struct DealershipRepository {
    pool: PgPool,
}

impl DealershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Obtener la fila única del concesionario con su horario semanal,
    /// sembrando los valores por defecto la primera vez que se consulta.
    /// Todo ocurre dentro de una transacción.
    pub async fn get_or_seed(&self) -> AppResult<(DealershipInfo, Vec<WorkingHour>)> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, DealershipInfo>(
            "SELECT * FROM dealership_info ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let info = match existing {
            Some(info) => info,
            None => {
                log::info!("💾 Seeding dealership info with defaults");
                let info = sqlx::query_as::<_, DealershipInfo>(
                    "INSERT INTO dealership_info DEFAULT VALUES RETURNING *",
                )
                .fetch_one(&mut *tx)
                .await?;

                for day in DayOfWeek::ALL {
                    let (open_time, close_time, is_open) = default_hours(day);
                    sqlx::query(
                        r#"
                        INSERT INTO working_hours (id, dealership_id, day_of_week, open_time, close_time, is_open)
                        VALUES ($1, $2, $3, $4, $5, $6)
                        "#,
                    )
                    .bind(Uuid::new_v4())
                    .bind(info.id)
                    .bind(day)
                    .bind(open_time)
                    .bind(close_time)
                    .bind(is_open)
                    .execute(&mut *tx)
                    .await?;
                }

                info
            }
        };

        let hours = sqlx::query_as::<_, WorkingHour>(
            "SELECT * FROM working_hours WHERE dealership_id = $1 ORDER BY day_of_week",
        )
        .bind(info.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((info, hours))
    }

    /// Reemplazar el horario semanal completo: borra las filas existentes e
    /// inserta las nuevas dentro de la misma transacción.
    pub async fn save_working_hours(
        &self,
        entries: &[WorkingHourInput],
    ) -> AppResult<Vec<WorkingHour>> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, DealershipInfo>(
            "SELECT * FROM dealership_info ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let info = match existing {
            Some(info) => info,
            None => {
                sqlx::query_as::<_, DealershipInfo>(
                    "INSERT INTO dealership_info DEFAULT VALUES RETURNING *",
                )
                .fetch_one(&mut *tx)
                .await?
            }
        };

        sqlx::query("DELETE FROM working_hours WHERE dealership_id = $1")
            .bind(info.id)
            .execute(&mut *tx)
            .await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO working_hours (id, dealership_id, day_of_week, open_time, close_time, is_open)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(info.id)
            .bind(entry.day_of_week)
            .bind(&entry.open_time)
            .bind(&entry.close_time)
            .bind(entry.is_open)
            .execute(&mut *tx)
            .await?;
        }

        let hours = sqlx::query_as::<_, WorkingHour>(
            "SELECT * FROM working_hours WHERE dealership_id = $1 ORDER BY day_of_week",
        )
        .bind(info.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(hours)
    }
}

/// Horario por defecto de cada día: laborables 09:00-18:00, sábado
/// 10:00-16:00, domingo cerrado
fn default_hours(day: DayOfWeek) -> (&'static str, &'static str, bool) {
    match day {
        DayOfWeek::Saturday => ("10:00", "16:00", true),
        DayOfWeek::Sunday => ("10:00", "16:00", false),
        _ => ("09:00", "18:00", true),
    }
}
