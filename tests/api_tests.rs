use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "dealership-backend");
}

#[tokio::test]
async fn test_public_inventory_uses_success_envelope() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/api/cars")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"].is_array());
    assert!(body["message"].is_null());
}

#[tokio::test]
async fn test_booking_requires_token() {
    let app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(valid_booking_payload().to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_booking_with_token_succeeds() {
    let app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer test-token")
        .body(Body::from(valid_booking_payload().to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "PENDING");
}

#[tokio::test]
async fn test_malformed_date_is_validation_error() {
    let app = create_test_app();
    let payload = json!({
        "car_id": "550e8400-e29b-41d4-a716-446655440000",
        "booking_date": "15/01/2025",
        "start_time": "11:00",
        "end_time": "12:00",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer test-token")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_taken_slot_is_conflict() {
    let app = create_test_app();
    let payload = json!({
        "car_id": "550e8400-e29b-41d4-a716-446655440000",
        "booking_date": "2025-01-15",
        "start_time": "10:00",
        "end_time": "11:00",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer test-token")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "This time slot is already booked");
    assert_eq!(body["code"], "CONFLICT");
}

// Helper para ejecutar un request y decodificar el body
async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

fn valid_booking_payload() -> serde_json::Value {
    json!({
        "car_id": "550e8400-e29b-41d4-a716-446655440000",
        "booking_date": "2025-01-15",
        "start_time": "11:00",
        "end_time": "12:00",
    })
}

// Función helper para crear la app de test: replica los contratos wire de
// la API (envelope, códigos de error, capa de auth) sin base de datos
fn create_test_app() -> Router {
    let bookings = Router::new()
        .route("/", post(book_test_drive))
        .layer(middleware::from_fn(require_token));

    Router::new()
        .route("/health", get(health))
        .route("/api/cars", get(list_cars))
        .nest("/api/bookings", bookings)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "dealership-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_cars() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": null,
        "data": [],
    }))
}

async fn book_test_drive(Json(request): Json<serde_json::Value>) -> Response {
    let booking_date = request["booking_date"].as_str().unwrap_or_default();
    if chrono::NaiveDate::parse_from_str(booking_date, "%Y-%m-%d").is_err() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "success": false,
                "error": "booking_date: invalid value",
                "code": "VALIDATION_ERROR",
            })),
        )
            .into_response();
    }

    // El slot de las 10:00 figura como ocupado en esta app de test
    if request["start_time"] == "10:00" {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "error": "This time slot is already booked",
                "code": "CONFLICT",
            })),
        )
            .into_response();
    }

    Json(json!({
        "success": true,
        "message": "Test drive booked successfully",
        "data": { "status": "PENDING" },
    }))
    .into_response()
}

async fn require_token(request: Request<Body>, next: Next) -> Response {
    if request.headers().get(header::AUTHORIZATION).is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "Token de autorización requerido",
                "code": "AUTH_REQUIRED",
            })),
        )
            .into_response();
    }

    next.run(request).await
}
