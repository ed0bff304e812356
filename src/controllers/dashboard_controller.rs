use futures::future::try_join;
use sqlx::PgPool;

use crate::dto::dashboard_dto::DashboardResponse;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::car_repository::CarRepository;
use crate::utils::errors::AppError;

pub struct DashboardController {
    cars: CarRepository,
    bookings: BookingRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool),
        }
    }

    /// Agregados de inventario y reservas para el panel de administración
    pub async fn get_dashboard_data(&self) -> Result<DashboardResponse, AppError> {
        let (car_stats, booking_stats) = try_join(self.cars.stats(), self.bookings.stats()).await?;

        Ok(DashboardResponse::from((car_stats, booking_stats)))
    }
}
