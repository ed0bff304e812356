use axum::{extract::State, middleware, routing::get, Json, Router};

use crate::controllers::settings_controller::SettingsController;
use crate::dto::settings_dto::DealershipInfoResponse;
use crate::dto::ApiResponse;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas de configuración visibles para cualquier usuario autenticado
pub fn create_settings_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dealership", get(get_dealership_info))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn get_dealership_info(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DealershipInfoResponse>>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let info = controller.get_dealership_info().await?;
    Ok(Json(ApiResponse::success(info)))
}
