//! Modelo de DealershipInfo y WorkingHours
//!
//! Este módulo contiene la fila única con los datos del concesionario
//! y su horario semanal (una fila por día).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Día de la semana - mapea al ENUM day_of_week
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "day_of_week", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Los siete días en orden de calendario
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];
}

/// Datos del concesionario - mapea exactamente a la tabla dealership_info
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DealershipInfo {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Horario de un día - mapea exactamente a la tabla working_hours
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkingHour {
    pub id: Uuid,
    pub dealership_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub open_time: String,
    pub close_time: String,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_wire_format() {
        assert_eq!(
            serde_json::to_string(&DayOfWeek::Wednesday).unwrap(),
            "\"WEDNESDAY\""
        );
        let parsed: DayOfWeek = serde_json::from_str("\"SUNDAY\"").unwrap();
        assert_eq!(parsed, DayOfWeek::Sunday);
    }

    #[test]
    fn test_all_days_in_calendar_order() {
        assert_eq!(DayOfWeek::ALL.len(), 7);
        assert_eq!(DayOfWeek::ALL[0], DayOfWeek::Monday);
        assert_eq!(DayOfWeek::ALL[6], DayOfWeek::Sunday);
    }
}
