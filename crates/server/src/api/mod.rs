//! Incident operations behind the HTTP routes.
//!
//! Each function takes the shared [`ApiContext`] and returns either the
//! response body or an [`ApiError`] whose code decides the HTTP status.

use chrono::Utc;
use shared::{
    domain::{Incident, IncidentId},
    error::{ApiError, ErrorCode},
    protocol::{DeleteResponse, HealthResponse, IncidentPayload},
};
use storage::Storage;
use tracing::{error, info};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub fn incidents_route() -> &'static str {
    "/api/incidents"
}

pub fn incident_route() -> &'static str {
    "/api/incidents/:incident_id"
}

pub fn health_route() -> &'static str {
    "/api/health"
}

pub async fn health(ctx: &ApiContext) -> Result<HealthResponse, ApiError> {
    ctx.storage.health_check().await.map_err(|e| {
        error!(error = %e, "health check failed");
        ApiError::new(ErrorCode::Unavailable, "database unavailable")
    })?;
    Ok(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

pub async fn list_incidents(ctx: &ApiContext) -> Result<Vec<Incident>, ApiError> {
    ctx.storage
        .list_incidents()
        .await
        .map_err(|e| internal("Failed to fetch incidents", e))
}

pub async fn get_incident(ctx: &ApiContext, incident_id: IncidentId) -> Result<Incident, ApiError> {
    ctx.storage
        .get_incident(incident_id)
        .await
        .map_err(|e| internal("Failed to fetch incident", e))?
        .ok_or_else(ApiError::not_found)
}

pub async fn create_incident(
    ctx: &ApiContext,
    payload: IncidentPayload,
) -> Result<Incident, ApiError> {
    let new_incident = payload.into_new_incident()?;
    let incident = ctx
        .storage
        .create_incident(new_incident)
        .await
        .map_err(|e| internal("Failed to create incident", e))?;
    info!(incident_id = %incident.id, severity = %incident.severity, "incident created");
    Ok(incident)
}

pub async fn update_incident(
    ctx: &ApiContext,
    incident_id: IncidentId,
    payload: IncidentPayload,
) -> Result<Incident, ApiError> {
    // An unknown id is reported as not found even when the body is incomplete.
    get_incident(ctx, incident_id).await?;
    let replacement = payload.into_new_incident()?;
    let incident = ctx
        .storage
        .update_incident(incident_id, replacement)
        .await
        .map_err(|e| internal("Failed to update incident", e))?
        .ok_or_else(ApiError::not_found)?;
    info!(%incident_id, status = %incident.status, "incident updated");
    Ok(incident)
}

pub async fn delete_incident(
    ctx: &ApiContext,
    incident_id: IncidentId,
) -> Result<DeleteResponse, ApiError> {
    let removed = ctx
        .storage
        .delete_incident(incident_id)
        .await
        .map_err(|e| internal("Failed to delete incident", e))?;
    if !removed {
        return Err(ApiError::not_found());
    }
    info!(%incident_id, "incident deleted");
    Ok(DeleteResponse::deleted())
}

fn internal(message: &str, err: anyhow::Error) -> ApiError {
    error!(error = %format!("{err:#}"), "{}", message);
    ApiError::new(ErrorCode::Internal, message)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
