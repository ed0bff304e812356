//! DTOs de la API
//!
//! Este módulo contiene los tipos de request/response de la capa HTTP
//! y el envelope genérico de la API.

use serde::Serialize;

pub mod booking_dto;
pub mod car_dto;
pub mod dashboard_dto;
pub mod settings_dto;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
