use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::controllers::car_controller::CarController;
use crate::controllers::dashboard_controller::DashboardController;
use crate::controllers::settings_controller::SettingsController;
use crate::dto::booking_dto::{AdminBookingQuery, AdminTestDriveResponse, UpdateBookingStatusRequest};
use crate::dto::car_dto::{
    CreateCarRequest, ExtractCarRequest, ExtractedCarDetails, UpdateCarStatusRequest,
};
use crate::dto::dashboard_dto::DashboardResponse;
use crate::dto::settings_dto::{SaveWorkingHoursRequest, UpdateUserRoleRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::booking::TestDriveBooking;
use crate::models::car::Car;
use crate::models::dealership::WorkingHour;
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas del panel de administración. La capa de auth corre primero y
/// resuelve el usuario; la de admin corta a los que no tienen el rol.
pub fn create_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/cars", post(create_car))
        .route("/cars/extract", post(extract_car_details))
        .route("/cars/:id/status", patch(update_car_status))
        .route("/cars/:id", delete(delete_car))
        .route("/bookings", get(list_test_drives))
        .route("/bookings/:id/status", patch(update_test_drive_status))
        .route("/dashboard", get(get_dashboard))
        .route("/users", get(list_users))
        .route("/users/:id/role", patch(update_user_role))
        .route("/settings/working-hours", put(save_working_hours))
        .layer(middleware::from_fn(admin_only_middleware))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let controller = CarController::new(&state);
    let response = controller.create_car(request).await?;
    Ok(Json(response))
}

async fn extract_car_details(
    State(state): State<AppState>,
    Json(request): Json<ExtractCarRequest>,
) -> Result<Json<ApiResponse<ExtractedCarDetails>>, AppError> {
    let controller = CarController::new(&state);
    let details = controller.extract_car_details(request).await?;
    Ok(Json(ApiResponse::success(details)))
}

async fn update_car_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarStatusRequest>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let controller = CarController::new(&state);
    let response = controller.update_car_status(id, request).await?;
    Ok(Json(response))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CarController::new(&state);
    let response = controller.delete_car(id).await?;
    Ok(Json(response))
}

async fn list_test_drives(
    State(state): State<AppState>,
    Query(query): Query<AdminBookingQuery>,
) -> Result<Json<ApiResponse<Vec<AdminTestDriveResponse>>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let bookings = controller.list_test_drives(query).await?;
    Ok(Json(ApiResponse::success(bookings)))
}

async fn update_test_drive_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<TestDriveBooking>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.update_test_drive_status(id, request).await?;
    Ok(Json(response))
}

async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardResponse>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let dashboard = controller.get_dashboard_data().await?;
    Ok(Json(ApiResponse::success(dashboard)))
}

async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let users = controller.get_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let response = controller.update_user_role(id, request).await?;
    Ok(Json(response))
}

async fn save_working_hours(
    State(state): State<AppState>,
    Json(request): Json<SaveWorkingHoursRequest>,
) -> Result<Json<ApiResponse<Vec<WorkingHour>>>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let response = controller.save_working_hours(request).await?;
    Ok(Json(response))
}
