use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::car_dto::CarData;
use crate::models::car::{Car, CarStats, CarStatus};
use crate::utils::errors::{AppError, AppResult};

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar un coche con id pregenerado (la carpeta del bucket se
    /// deriva del id antes de que exista la fila)
    pub async fn create(
        &self,
        id: Uuid,
        data: &CarData,
        image_urls: Vec<String>,
        folder_path: String,
    ) -> AppResult<Car> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (
                id, make, model, year, price, mileage, color, fuel_type,
                transmission, body_type, seats, description, status, featured,
                images, folder_path
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.make)
        .bind(&data.model)
        .bind(data.year)
        .bind(data.price)
        .bind(data.mileage)
        .bind(&data.color)
        .bind(data.fuel_type)
        .bind(&data.transmission)
        .bind(&data.body_type)
        .bind(data.seats)
        .bind(&data.description)
        .bind(data.status.unwrap_or(CarStatus::Available))
        .bind(data.featured.unwrap_or(false))
        .bind(&image_urls)
        .bind(folder_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    /// Búsqueda pública: make, model o color contienen el término
    /// (sin término devuelve todo el inventario, el más nuevo primero)
    pub async fn search(&self, term: Option<&str>) -> AppResult<Vec<Car>> {
        let term = normalize_search_term(term);

        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE $1::text IS NULL
               OR make ILIKE '%' || $1 || '%'
               OR model ILIKE '%' || $1 || '%'
               OR color ILIKE '%' || $1 || '%'
            ORDER BY created_at DESC
            "#,
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Coches destacados y disponibles para la portada
    pub async fn list_featured(&self, limit: i64) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE featured = TRUE AND status = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(CarStatus::Available)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    /// Actualización parcial de estado/destacado; los campos no enviados
    /// conservan su valor actual
    pub async fn update_status(
        &self,
        id: Uuid,
        status: Option<CarStatus>,
        featured: Option<bool>,
    ) -> AppResult<Car> {
        // Obtener coche actual
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET status = $2, featured = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.unwrap_or(current.status))
        .bind(featured.unwrap_or(current.featured))
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    /// Borrar la fila y devolver el coche previo para que el caller
    /// pueda limpiar sus imágenes del bucket
    pub async fn delete(&self, id: Uuid) -> AppResult<Car> {
        let car = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(car)
    }

    /// Conteos de inventario para el dashboard
    pub async fn stats(&self) -> AppResult<CarStats> {
        let stats = sqlx::query_as::<_, CarStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = $1) AS available,
                COUNT(*) FILTER (WHERE status = $2) AS sold
            FROM cars
            "#,
        )
        .bind(CarStatus::Available)
        .bind(CarStatus::Sold)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

/// Un término vacío o de sólo espacios equivale a no filtrar
fn normalize_search_term(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}
