use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{BookTestDriveRequest, TestDriveResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::booking::TestDriveBooking;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de reservas del usuario autenticado
pub fn create_booking_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(book_test_drive))
        .route("/me", get(my_test_drives))
        .route("/:id/cancel", post(cancel_test_drive))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn book_test_drive(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<BookTestDriveRequest>,
) -> Result<Json<ApiResponse<TestDriveResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.book_test_drive(&user, request).await?;
    Ok(Json(response))
}

async fn my_test_drives(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<TestDriveResponse>>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let bookings = controller.get_user_test_drives(&user).await?;
    Ok(Json(ApiResponse::success(bookings)))
}

async fn cancel_test_drive(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TestDriveBooking>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.cancel_test_drive(&user, id).await?;
    Ok(Json(response))
}
