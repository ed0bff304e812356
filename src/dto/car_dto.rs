//! DTOs de inventario
//!
//! Requests y responses de la API de coches, incluido el contrato
//! del borrador de atributos extraído por la IA.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::car::{CarStatus, FuelType};

/// Atributos del coche en el request de creación
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CarData {
    #[validate(length(min = 1, max = 60))]
    pub make: String,

    #[validate(length(min = 1, max = 80))]
    pub model: String,

    #[validate(range(min = 1886, max = 2100))]
    pub year: i32,

    pub price: Decimal,

    pub mileage: i32,

    #[validate(length(min = 1, max = 40))]
    pub color: String,

    pub fuel_type: FuelType,

    #[validate(length(min = 1, max = 40))]
    pub transmission: String,

    #[validate(length(min = 1, max = 40))]
    pub body_type: String,

    pub seats: Option<i32>,

    #[validate(length(min = 1, max = 2000))]
    pub description: String,

    pub status: Option<CarStatus>,

    pub featured: Option<bool>,
}

/// Request para crear un coche con sus imágenes en data-URL
#[derive(Debug, Deserialize)]
pub struct CreateCarRequest {
    pub car_data: CarData,
    pub images: Vec<String>,
}

/// Request para actualizar estado/destacado de un coche
#[derive(Debug, Deserialize)]
pub struct UpdateCarStatusRequest {
    pub status: Option<CarStatus>,
    pub featured: Option<bool>,
}

/// Query de búsqueda del inventario público
#[derive(Debug, Deserialize)]
pub struct CarSearchQuery {
    pub search: Option<String>,
}

/// Query del carrusel de destacados
#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<i64>,
}

/// Request del borrador asistido por IA
#[derive(Debug, Deserialize)]
pub struct ExtractCarRequest {
    pub image: String,
}

/// Borrador de atributos devuelto por el modelo multimodal.
/// Todos los campos son strings por contrato salvo `confidence`;
/// `seats` no forma parte del conjunto obligatorio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCarDetails {
    pub make: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub price: String,
    pub mileage: String,
    pub body_type: String,
    pub fuel_type: String,
    pub transmission: String,
    pub description: String,
    pub seats: Option<String>,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_details_wire_casing() {
        let details = ExtractedCarDetails {
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: "2021".to_string(),
            color: "Blue".to_string(),
            price: "18500".to_string(),
            mileage: "32000".to_string(),
            body_type: "Sedan".to_string(),
            fuel_type: "Petrol".to_string(),
            transmission: "Automatic".to_string(),
            description: "Compact sedan in good condition".to_string(),
            seats: Some("5".to_string()),
            confidence: 0.85,
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["bodyType"], "Sedan");
        assert_eq!(json["fuelType"], "Petrol");
        assert!(json.get("body_type").is_none());
    }

    #[test]
    fn test_car_data_rejects_out_of_range_year() {
        let json = serde_json::json!({
            "make": "Ford",
            "model": "Focus",
            "year": 1700,
            "price": "12000.00",
            "mileage": 1000,
            "color": "Red",
            "fuel_type": "PETROL",
            "transmission": "Manual",
            "body_type": "Hatchback",
            "description": "Test car"
        });

        let data: CarData = serde_json::from_value(json).unwrap();
        assert!(data.validate().is_err());
    }
}
