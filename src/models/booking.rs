//! Modelo de TestDriveBooking
//!
//! Este módulo contiene el struct TestDriveBooking y su máquina de estados.
//! Las transiciones válidas son:
//!   PENDING   -> CONFIRMED | CANCELLED
//!   CONFIRMED -> COMPLETED | CANCELLED | NO_SHOW
//! CANCELLED, COMPLETED y NO_SHOW son estados terminales. El panel de
//! administración puede forzar cualquier estado; la cancelación de usuario
//! respeta la máquina.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Una reserva cancelada o completada ya no puede cancelarse
    pub fn can_cancel(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Estados que bloquean un slot frente a nuevas reservas
    pub fn blocks_slot(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Reserva de prueba de conducción - mapea exactamente a la tabla test_drive_bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestDriveBooking {
    pub id: Uuid,
    pub car_id: Uuid,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conteos agregados de reservas para el dashboard
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
}

impl BookingStats {
    /// Porcentaje de reservas completadas sobre el total (0 si no hay reservas)
    pub fn conversion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let rate = self.completed as f64 / self.total as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::NoShow).unwrap(),
            "\"NO_SHOW\""
        );

        let parsed: BookingStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(parsed, BookingStatus::Pending);
    }

    #[test]
    fn test_cancel_rules() {
        assert!(BookingStatus::Pending.can_cancel());
        assert!(BookingStatus::Confirmed.can_cancel());
        assert!(BookingStatus::NoShow.can_cancel());
        assert!(!BookingStatus::Cancelled.can_cancel());
        assert!(!BookingStatus::Completed.can_cancel());
    }

    #[test]
    fn test_slot_blocking_states() {
        assert!(BookingStatus::Pending.blocks_slot());
        assert!(BookingStatus::Confirmed.blocks_slot());
        assert!(!BookingStatus::Cancelled.blocks_slot());
        assert!(!BookingStatus::Completed.blocks_slot());
        assert!(!BookingStatus::NoShow.blocks_slot());
    }

    #[test]
    fn test_conversion_rate() {
        let stats = BookingStats {
            total: 8,
            pending: 2,
            confirmed: 3,
            completed: 3,
        };
        assert_eq!(stats.conversion_rate(), 37.5);

        let empty = BookingStats {
            total: 0,
            pending: 0,
            confirmed: 0,
            completed: 0,
        };
        assert_eq!(empty.conversion_rate(), 0.0);
    }
}
