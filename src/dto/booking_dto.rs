//! DTOs de reservas de prueba de conducción

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::{BookingStatus, TestDriveBooking};
use crate::models::car::Car;
use crate::models::user::UserResponse;

/// Request para reservar una prueba de conducción
#[derive(Debug, Deserialize)]
pub struct BookTestDriveRequest {
    pub car_id: Uuid,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

/// Filtros del listado de reservas del panel de administración
#[derive(Debug, Deserialize)]
pub struct AdminBookingQuery {
    pub search: Option<String>,
    pub status: Option<BookingStatus>,
}

/// Request de cambio de estado desde el panel de administración
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// Reserva con su coche, para la página de reservas del usuario
#[derive(Debug, Serialize)]
pub struct TestDriveResponse {
    pub id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub car: Car,
}

impl From<(TestDriveBooking, Car)> for TestDriveResponse {
    fn from((booking, car): (TestDriveBooking, Car)) -> Self {
        Self {
            id: booking.id,
            booking_date: booking.booking_date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            notes: booking.notes,
            status: booking.status,
            created_at: booking.created_at,
            car,
        }
    }
}

/// Reserva con coche y usuario, para el panel de administración
#[derive(Debug, Serialize)]
pub struct AdminTestDriveResponse {
    pub id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub car: Car,
    pub user: UserResponse,
}

impl From<(TestDriveBooking, Car, UserResponse)> for AdminTestDriveResponse {
    fn from((booking, car, user): (TestDriveBooking, Car, UserResponse)) -> Self {
        Self {
            id: booking.id,
            booking_date: booking.booking_date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            notes: booking.notes,
            status: booking.status,
            created_at: booking.created_at,
            car,
            user,
        }
    }
}
