//! Modelo de Car
//!
//! Este módulo contiene el struct Car y sus enums cerrados.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del coche - mapea al ENUM car_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "car_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarStatus {
    Available,
    Unavailable,
    Sold,
}

/// Tipo de combustible - mapea al ENUM fuel_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fuel_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    PlugInHybrid,
}

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub mileage: i32,
    pub color: String,
    pub fuel_type: FuelType,
    pub transmission: String,
    pub body_type: String,
    pub seats: Option<i32>,
    pub description: String,
    pub status: CarStatus,
    pub featured: bool,
    pub images: Vec<String>,
    pub folder_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conteos agregados de inventario para el dashboard
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CarStats {
    pub total: i64,
    pub available: i64,
    pub sold: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&CarStatus::Available).unwrap(),
            "\"AVAILABLE\""
        );
        assert_eq!(serde_json::to_string(&CarStatus::Sold).unwrap(), "\"SOLD\"");

        let parsed: CarStatus = serde_json::from_str("\"UNAVAILABLE\"").unwrap();
        assert_eq!(parsed, CarStatus::Unavailable);
    }

    #[test]
    fn test_fuel_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&FuelType::PlugInHybrid).unwrap(),
            "\"PLUG_IN_HYBRID\""
        );

        let parsed: FuelType = serde_json::from_str("\"PETROL\"").unwrap();
        assert_eq!(parsed, FuelType::Petrol);

        assert!(serde_json::from_str::<FuelType>("\"GASOLINE\"").is_err());
    }
}
