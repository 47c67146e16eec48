use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Incident, IncidentId, NewIncident},
    error::ApiError,
    protocol::{DeleteResponse, HealthResponse, IncidentPayload},
};
use tracing::debug;
use url::Url;

use crate::error::StoreError;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3001/api";

/// The record store the dashboard reads from and writes to.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Incident>, StoreError>;
    async fn get(&self, id: IncidentId) -> Result<Incident, StoreError>;
    async fn create(&self, incident: NewIncident) -> Result<Incident, StoreError>;
    async fn update(&self, id: IncidentId, incident: NewIncident)
        -> Result<Incident, StoreError>;
    async fn delete(&self, id: IncidentId) -> Result<(), StoreError>;
}

/// [`IncidentStore`] backed by the incident REST service.
#[derive(Debug, Clone)]
pub struct HttpIncidentStore {
    http: Client,
    base_url: Url,
}

impl HttpIncidentStore {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:3001/api`.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, StoreError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|source| StoreError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|source| StoreError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }

    fn incident_endpoint(&self, id: IncidentId) -> Result<Url, StoreError> {
        self.endpoint(&format!("incidents/{id}"))
    }

    pub async fn health(&self) -> Result<HealthResponse, StoreError> {
        let response = self.http.get(self.endpoint("health")?).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl IncidentStore for HttpIncidentStore {
    async fn list_all(&self) -> Result<Vec<Incident>, StoreError> {
        let response = self.http.get(self.endpoint("incidents")?).send().await?;
        let incidents: Vec<Incident> = decode(response).await?;
        debug!(count = incidents.len(), "fetched incidents");
        Ok(incidents)
    }

    async fn get(&self, id: IncidentId) -> Result<Incident, StoreError> {
        let response = self.http.get(self.incident_endpoint(id)?).send().await?;
        decode(response).await
    }

    async fn create(&self, incident: NewIncident) -> Result<Incident, StoreError> {
        let response = self
            .http
            .post(self.endpoint("incidents")?)
            .json(&IncidentPayload::from(incident))
            .send()
            .await?;
        decode(response).await
    }

    async fn update(
        &self,
        id: IncidentId,
        incident: NewIncident,
    ) -> Result<Incident, StoreError> {
        let response = self
            .http
            .put(self.incident_endpoint(id)?)
            .json(&IncidentPayload::from(incident))
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, id: IncidentId) -> Result<(), StoreError> {
        let response = self.http.delete(self.incident_endpoint(id)?).send().await?;
        let deleted: DeleteResponse = decode(response).await?;
        debug!(incident_id = %id, message = %deleted.message, "incident deleted");
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiError>(&body) {
        Ok(error) => error.message,
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
