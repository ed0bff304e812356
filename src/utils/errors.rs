//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP con el envelope uniforme.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Authentication required: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error con el envelope uniforme de la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl ErrorResponse {
    fn new(error: String, code: &str) -> Self {
        Self {
            success: false,
            error,
            details: None,
            code: code.to_string(),
        }
    }
}

/// Aplana los mensajes de un `ValidationErrors` a un texto legible
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => parts.push(message.to_string()),
                None => parts.push(format!("{}: {}", field, error.code)),
            }
        }
    }
    if parts.is_empty() {
        "The provided data is invalid".to_string()
    } else {
        parts.join("; ")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                log::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "An error occurred while accessing the database".to_string(),
                        "DB_ERROR",
                    ),
                )
            }

            AppError::Validation(e) => {
                log::warn!("Validation error: {}", e);
                let mut response = ErrorResponse::new(validation_message(&e), "VALIDATION_ERROR");
                response.details = Some(json!(e));
                (StatusCode::UNPROCESSABLE_ENTITY, response)
            }

            AppError::Authentication(msg) => {
                log::warn!("Authentication failure: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(msg, "AUTH_REQUIRED"),
                )
            }

            AppError::Authorization(msg) => {
                log::warn!("Forbidden access: {}", msg);
                (StatusCode::FORBIDDEN, ErrorResponse::new(msg, "FORBIDDEN"))
            }

            AppError::NotFound(msg) => {
                log::warn!("Resource not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorResponse::new(msg, "NOT_FOUND"))
            }

            AppError::Conflict(msg) => {
                log::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorResponse::new(msg, "CONFLICT"))
            }

            AppError::Precondition(msg) => {
                log::warn!("Precondition failed: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(msg, "PRECONDITION_FAILED"),
                )
            }

            AppError::InvalidState(msg) => {
                log::warn!("Invalid state transition: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(msg, "INVALID_STATE"),
                )
            }

            AppError::ExternalService(msg) => {
                log::error!("External service error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new(msg, "EXTERNAL_SERVICE_ERROR"),
                )
            }

            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "An unexpected error occurred".to_string(),
                        "INTERNAL_ERROR",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación con mensaje propio
pub fn validation_error(field: &'static str, message: &str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.to_string().into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para envolver un ValidationError suelto con su campo
pub fn field_error(field: &'static str, error: validator::ValidationError) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);
    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_error_status_and_code_mapping() {
        let cases = vec![
            (
                AppError::Authentication("no token".to_string()),
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
            ),
            (
                AppError::Authorization("admin only".to_string()),
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
            ),
            (
                AppError::NotFound("Car not found".to_string()),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                AppError::Conflict("slot already booked".to_string()),
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (
                AppError::Precondition("car not available".to_string()),
                StatusCode::CONFLICT,
                "PRECONDITION_FAILED",
            ),
            (
                AppError::InvalidState("already cancelled".to_string()),
                StatusCode::CONFLICT,
                "INVALID_STATE",
            ),
            (
                AppError::ExternalService("upstream down".to_string()),
                StatusCode::BAD_GATEWAY,
                "EXTERNAL_SERVICE_ERROR",
            ),
            (
                AppError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
            (
                AppError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
                "DB_ERROR",
            ),
        ];

        for (error, expected_status, expected_code) in cases {
            let (status, body) = response_parts(error).await;
            assert_eq!(status, expected_status);
            assert_eq!(body["success"], false);
            assert_eq!(body["code"], expected_code);
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_opaque_errors_hide_internal_detail() {
        let (_, body) = response_parts(AppError::Internal("secret detail".to_string())).await;
        assert_eq!(body["error"], "An unexpected error occurred");

        let (_, body) = response_parts(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(body["error"], "An error occurred while accessing the database");
    }

    #[tokio::test]
    async fn test_validation_error_carries_custom_message() {
        let error = validation_error("images", "No valid images were uploaded");
        let (status, body) = response_parts(error).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "No valid images were uploaded");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_not_found_helper_names_the_resource() {
        let error = not_found_error("Car", "abc-123");
        match error {
            AppError::NotFound(msg) => {
                assert!(msg.contains("Car"));
                assert!(msg.contains("abc-123"));
            }
            _ => panic!("expected NotFound"),
        }
    }
}
