//! Middleware de autenticación JWT
//!
//! Este módulo verifica el token de identidad emitido por el proveedor
//! externo, resuelve la fila local del usuario y la inyecta en la request.
//! El rol SIEMPRE sale de la base de datos, nunca de los claims.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::{errors::AppError, jwt},
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Middleware de autenticación JWT.
///
/// Verifica firma y expiración del token, hace upsert del usuario por su
/// id externo (la primera visita crea la fila con rol USER) e inyecta
/// `AuthenticatedUser` en las extensions de la request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| {
            AppError::Authentication("Token de autorización requerido".to_string())
        })?;

    let token = jwt::extract_token_from_header(auth_header)?;
    let jwt_config = jwt::JwtConfig::from(&state.config);
    let claims = jwt::verify_token(token, &jwt_config)?;

    let repository = UserRepository::new(state.pool.clone());
    let name = if claims.name.trim().is_empty() {
        None
    } else {
        Some(claims.name.as_str())
    };
    let user = repository
        .upsert_from_identity(&claims.sub, &claims.email, name)
        .await?;

    let authenticated_user = AuthenticatedUser {
        id: user.id,
        external_id: user.external_id,
        email: user.email,
        name: user.name,
        role: user.role,
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if user.role != UserRole::Admin {
        return Err(AppError::Authorization(
            "Se requieren permisos de administrador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
