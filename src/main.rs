mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{routing::get, response::Json, Router};
use std::net::SocketAddr;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use dotenvy::dotenv;
use serde_json::json;

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("🚗 Dealership Backend - Inventario y Pruebas de Conducción");
    info!("==========================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = db_connection.run_migrations().await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }

    let pool = db_connection.pool().clone();

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());

    let cors = if config.is_production() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/cars", routes::car_routes::create_car_router())
        .nest(
            "/api/bookings",
            routes::booking_routes::create_booking_router(app_state.clone()),
        )
        .nest(
            "/api/settings",
            routes::settings_routes::create_settings_router(app_state.clone()),
        )
        .nest(
            "/api/admin",
            routes::admin_routes::create_admin_router(app_state.clone()),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Endpoints públicos - Inventario:");
    info!("   GET  /api/cars - Buscar coches");
    info!("   GET  /api/cars/featured - Coches destacados");
    info!("   GET  /api/cars/:id - Detalle de un coche");
    info!("📅 Endpoints autenticados - Reservas:");
    info!("   POST /api/bookings - Reservar prueba de conducción");
    info!("   GET  /api/bookings/me - Mis reservas");
    info!("   POST /api/bookings/:id/cancel - Cancelar reserva");
    info!("⚙️ Endpoints autenticados - Configuración:");
    info!("   GET  /api/settings/dealership - Datos del concesionario");
    info!("🔐 Endpoints de administración:");
    info!("   POST /api/admin/cars - Crear coche");
    info!("   POST /api/admin/cars/extract - Extraer atributos con IA");
    info!("   PATCH /api/admin/cars/:id/status - Cambiar estado/destacado");
    info!("   DELETE /api/admin/cars/:id - Eliminar coche");
    info!("   GET  /api/admin/bookings - Listar reservas");
    info!("   PATCH /api/admin/bookings/:id/status - Cambiar estado de reserva");
    info!("   GET  /api/admin/dashboard - Métricas del panel");
    info!("   GET  /api/admin/users - Listar usuarios");
    info!("   PATCH /api/admin/users/:id/role - Cambiar rol de usuario");
    info!("   PUT  /api/admin/settings/working-hours - Guardar horario");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "dealership-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
