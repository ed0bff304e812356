use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::{
    AdminBookingQuery, AdminTestDriveResponse, BookTestDriveRequest, TestDriveResponse,
    UpdateBookingStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{BookingStatus, TestDriveBooking};
use crate::models::car::{Car, CarStatus};
use crate::models::user::{User, UserResponse};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::car_repository::CarRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{field_error, not_found_error, AppError};
use crate::utils::validation::{
    validate_date, validate_length, validate_slot_order, validate_time_slot,
};

pub struct BookingController {
    bookings: BookingRepository,
    cars: CarRepository,
    users: UserRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            cars: CarRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn book_test_drive(
        &self,
        user: &AuthenticatedUser,
        request: BookTestDriveRequest,
    ) -> Result<ApiResponse<TestDriveResponse>, AppError> {
        // Validar fecha y slot
        let booking_date =
            validate_date(&request.booking_date).map_err(|e| field_error("booking_date", e))?;
        let start =
            validate_time_slot(&request.start_time).map_err(|e| field_error("start_time", e))?;
        let end = validate_time_slot(&request.end_time).map_err(|e| field_error("end_time", e))?;
        validate_slot_order(start, end).map_err(|e| field_error("end_time", e))?;

        // Las horas se guardan en formato canónico HH:MM para que el índice
        // de unicidad compare siempre el mismo literal
        let start_time = start.format("%H:%M").to_string();
        let end_time = end.format("%H:%M").to_string();

        // El coche debe existir y estar disponible
        let car = self
            .cars
            .find_by_id(request.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &request.car_id.to_string()))?;

        if car.status != CarStatus::Available {
            return Err(AppError::Precondition(
                "Car is not available for test drives".to_string(),
            ));
        }

        // Chequeo previo del slot; la carrera la cierra el índice único
        if self
            .bookings
            .slot_taken(car.id, booking_date, &start_time)
            .await?
        {
            return Err(AppError::Conflict(
                "This time slot is already booked".to_string(),
            ));
        }

        let booking = self
            .bookings
            .create(
                car.id,
                user.id,
                booking_date,
                &start_time,
                &end_time,
                request.notes.as_deref(),
            )
            .await?;

        log::info!(
            "📅 Test drive booked: car {} on {} at {} by user {}",
            car.id,
            booking_date,
            start_time,
            user.id
        );

        Ok(ApiResponse::success_with_message(
            TestDriveResponse::from((booking, car)),
            "Test drive booked successfully".to_string(),
        ))
    }

    pub async fn get_user_test_drives(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<Vec<TestDriveResponse>, AppError> {
        let bookings = self.bookings.list_for_user(user.id).await?;
        let cars = self.load_cars(&bookings).await?;

        let responses = bookings
            .into_iter()
            .filter_map(|booking| match cars.get(&booking.car_id) {
                Some(car) => Some(TestDriveResponse::from((booking, car.clone()))),
                None => {
                    log::warn!(
                        "⚠️ Booking {} references missing car {}",
                        booking.id,
                        booking.car_id
                    );
                    None
                }
            })
            .collect();

        Ok(responses)
    }

    /// Cancelación por el dueño de la reserva o por un administrador.
    /// Una reserva cancelada o completada ya no se puede cancelar.
    pub async fn cancel_test_drive(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
    ) -> Result<ApiResponse<TestDriveBooking>, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &booking_id.to_string()))?;

        if !may_cancel(&booking, user) {
            return Err(AppError::Authorization(
                "You can only cancel your own bookings".to_string(),
            ));
        }

        if !booking.status.can_cancel() {
            let reason = match booking.status {
                BookingStatus::Cancelled => "Booking is already cancelled",
                _ => "Cannot cancel a completed booking",
            };
            return Err(AppError::InvalidState(reason.to_string()));
        }

        let cancelled = self
            .bookings
            .update_status(booking_id, BookingStatus::Cancelled)
            .await?;

        log::info!("🛑 Booking {} cancelled by user {}", cancelled.id, user.id);

        Ok(ApiResponse::success_with_message(
            cancelled,
            "Booking cancelled successfully".to_string(),
        ))
    }

    pub async fn list_test_drives(
        &self,
        query: AdminBookingQuery,
    ) -> Result<Vec<AdminTestDriveResponse>, AppError> {
        if let Some(term) = &query.search {
            validate_length(term, 0, 100).map_err(|e| field_error("search", e))?;
        }

        let bookings = self
            .bookings
            .list_admin(query.search.as_deref(), query.status)
            .await?;
        let cars = self.load_cars(&bookings).await?;
        let users = self.load_users(&bookings).await?;

        let responses = bookings
            .into_iter()
            .filter_map(|booking| {
                let car = cars.get(&booking.car_id)?;
                let user = users.get(&booking.user_id)?;
                Some(AdminTestDriveResponse::from((
                    booking,
                    car.clone(),
                    UserResponse::from(user.clone()),
                )))
            })
            .collect();

        Ok(responses)
    }

    pub async fn update_test_drive_status(
        &self,
        booking_id: Uuid,
        request: UpdateBookingStatusRequest,
    ) -> Result<ApiResponse<TestDriveBooking>, AppError> {
        let booking = self
            .bookings
            .update_status(booking_id, request.status)
            .await?;

        log::info!("✅ Booking {} moved to {:?}", booking.id, booking.status);

        Ok(ApiResponse::success_with_message(
            booking,
            "Booking status updated".to_string(),
        ))
    }

    /// Cargar los coches referenciados por un lote de reservas
    async fn load_cars(
        &self,
        bookings: &[TestDriveBooking],
    ) -> Result<HashMap<Uuid, Car>, AppError> {
        let mut car_ids: Vec<Uuid> = bookings.iter().map(|b| b.car_id).collect();
        car_ids.sort_unstable();
        car_ids.dedup();

        if car_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cars = self.cars.find_by_ids(&car_ids).await?;
        Ok(cars.into_iter().map(|c| (c.id, c)).collect())
    }

    /// Cargar los usuarios referenciados por un lote de reservas
    async fn load_users(
        &self,
        bookings: &[TestDriveBooking],
    ) -> Result<HashMap<Uuid, User>, AppError> {
        let mut user_ids: Vec<Uuid> = bookings.iter().map(|b| b.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.users.find_by_ids(&user_ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}

/// Cancelar está permitido al dueño de la reserva y a los administradores
fn may_cancel(booking: &TestDriveBooking, user: &AuthenticatedUser) -> bool {
    booking.user_id == user.id || user.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn booking_owned_by(user_id: Uuid) -> TestDriveBooking {
        TestDriveBooking {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            user_id,
            booking_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            notes: None,
            status: BookingStatus::Pending,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn user_with_role(id: Uuid, role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            external_id: "user_ext_1".to_string(),
            email: "user@example.com".to_string(),
            name: None,
            role,
        }
    }

    #[test]
    fn test_owner_may_cancel_own_booking() {
        let owner_id = Uuid::new_v4();
        let booking = booking_owned_by(owner_id);
        let owner = user_with_role(owner_id, UserRole::User);

        assert!(may_cancel(&booking, &owner));
    }

    #[test]
    fn test_admin_may_cancel_any_booking() {
        let booking = booking_owned_by(Uuid::new_v4());
        let admin = user_with_role(Uuid::new_v4(), UserRole::Admin);

        assert!(may_cancel(&booking, &admin));
    }

    #[test]
    fn test_stranger_may_not_cancel_booking() {
        let booking = booking_owned_by(Uuid::new_v4());
        let stranger = user_with_role(Uuid::new_v4(), UserRole::User);

        assert!(!may_cancel(&booking, &stranger));
    }
}
