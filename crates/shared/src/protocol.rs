use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{IncidentKind, NewIncident, Severity, Status},
    error::ApiException,
};

/// Body of `POST /api/incidents` and `PUT /api/incidents/:id`.
///
/// Every field is optional on the wire so that a missing required field is
/// reported as a validation error rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentPayload {
    #[serde(
        default,
        rename = "timestamp",
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<IncidentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IncidentPayload {
    pub fn into_new_incident(self) -> Result<NewIncident, ApiException> {
        let source_ip = self
            .source_ip
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty());
        let (Some(occurred_at), Some(source_ip), Some(severity), Some(kind)) =
            (self.occurred_at, source_ip, self.severity, self.kind)
        else {
            return Err(ApiException::missing_fields());
        };

        Ok(NewIncident {
            occurred_at,
            source_ip,
            severity,
            kind,
            status: self.status.unwrap_or_default(),
            description: self
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        })
    }
}

impl From<NewIncident> for IncidentPayload {
    fn from(value: NewIncident) -> Self {
        Self {
            occurred_at: Some(value.occurred_at),
            source_ip: Some(value.source_ip),
            severity: Some(value.severity),
            kind: Some(value.kind),
            status: Some(value.status),
            description: value.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Incident deleted successfully".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
}
