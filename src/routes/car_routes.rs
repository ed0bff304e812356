use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::car_controller::CarController;
use crate::dto::car_dto::{CarSearchQuery, FeaturedQuery};
use crate::dto::ApiResponse;
use crate::models::car::Car;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas del inventario (sin autenticación)
pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars))
        .route("/featured", get(list_featured_cars))
        .route("/:id", get(get_car))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<CarSearchQuery>,
) -> Result<Json<ApiResponse<Vec<Car>>>, AppError> {
    let controller = CarController::new(&state);
    let cars = controller.get_cars(query.search).await?;
    Ok(Json(ApiResponse::success(cars)))
}

async fn list_featured_cars(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<ApiResponse<Vec<Car>>>, AppError> {
    let controller = CarController::new(&state);
    let cars = controller.get_featured_cars(query.limit).await?;
    Ok(Json(ApiResponse::success(cars)))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let controller = CarController::new(&state);
    let car = controller.get_car(id).await?;
    Ok(Json(ApiResponse::success(car)))
}
