use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Incident, IncidentId},
    error::{ApiError, ErrorCode},
    protocol::{DeleteResponse, HealthResponse, IncidentPayload},
};
use storage::Storage;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{health_route, incident_route, incidents_route, ApiContext};
use app_state::AppState;
use config::{load_settings, prepare_database_url, Settings};

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = open_storage(&settings, &database_url).await?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    info!("incident endpoints available at http://{addr}{}", incidents_route());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Opens the database, retrying a bounded number of times so the server can
/// start alongside a volume that is still being mounted.
async fn open_storage(settings: &Settings, database_url: &str) -> anyhow::Result<Storage> {
    let attempts = settings.db_connect_attempts;
    let mut attempt = 1;
    loop {
        match Storage::new(database_url).await {
            Ok(storage) => {
                info!(%database_url, attempt, "database connected");
                return Ok(storage);
            }
            Err(error) if attempt < attempts => {
                warn!(
                    %database_url,
                    attempt,
                    attempts,
                    error = %format!("{error:#}"),
                    "database connection failed; retrying"
                );
                tokio::time::sleep(settings.db_connect_retry_delay()).await;
                attempt += 1;
            }
            Err(error) => {
                error!(
                    %database_url,
                    attempts,
                    error = %format!("{error:#}"),
                    "failed to open SQLite database; check the parent directory and its permissions"
                );
                return Err(error.context("all database connection attempts failed"));
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route(health_route(), get(healthz))
        .route(
            incidents_route(),
            get(http_list_incidents).post(http_create_incident),
        )
        .route(
            incident_route(),
            get(http_get_incident)
                .put(http_update_incident)
                .delete(http_delete_incident),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn http_error(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })
}

fn incident_id(path: Result<Path<i64>, PathRejection>) -> Result<IncidentId, HttpError> {
    path.map(|Path(id)| IncidentId(id)).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, "Invalid incident id")),
        )
    })
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, HttpError> {
    api::health(&state.api).await.map(Json).map_err(http_error)
}

async fn http_list_incidents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Incident>>, HttpError> {
    api::list_incidents(&state.api)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_get_incident(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Incident>, HttpError> {
    let incident_id = incident_id(path)?;
    api::get_incident(&state.api, incident_id)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_create_incident(
    State(state): State<Arc<AppState>>,
    body: Result<Json<IncidentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Incident>), HttpError> {
    let payload = json_body(body)?;
    let incident = api::create_incident(&state.api, payload)
        .await
        .map_err(http_error)?;
    Ok((StatusCode::CREATED, Json(incident)))
}

async fn http_update_incident(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<IncidentPayload>, JsonRejection>,
) -> Result<Json<Incident>, HttpError> {
    let incident_id = incident_id(path)?;
    let payload = json_body(body)?;
    api::update_incident(&state.api, incident_id, payload)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_delete_incident(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let incident_id = incident_id(path)?;
    api::delete_incident(&state.api, incident_id)
        .await
        .map(Json)
        .map_err(http_error)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
