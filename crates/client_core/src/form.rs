//! Field-level validation for the create/edit incident form.

use std::net::Ipv4Addr;

use chrono::NaiveDateTime;
use shared::domain::{Incident, IncidentKind, NewIncident, Severity, Status};

use crate::error::{FormErrors, FormField};

/// Format of the timestamp input, `YYYY-MM-DDTHH:MM`, interpreted as UTC.
pub const FORM_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Raw form input. Every field is text, as typed or selected by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentForm {
    pub timestamp: String,
    pub source_ip: String,
    pub severity: String,
    pub kind: String,
    pub status: String,
    pub description: String,
}

impl Default for IncidentForm {
    fn default() -> Self {
        Self {
            timestamp: String::new(),
            source_ip: String::new(),
            severity: Severity::Medium.as_str().to_string(),
            kind: IncidentKind::Malware.as_str().to_string(),
            status: Status::Open.as_str().to_string(),
            description: String::new(),
        }
    }
}

impl IncidentForm {
    /// Edit mode: the form pre-filled from an existing incident.
    pub fn from_incident(incident: &Incident) -> Self {
        Self {
            timestamp: incident
                .occurred_at
                .format(FORM_TIMESTAMP_FORMAT)
                .to_string(),
            source_ip: incident.source_ip.clone(),
            severity: incident.severity.as_str().to_string(),
            kind: incident.kind.as_str().to_string(),
            status: incident.status.as_str().to_string(),
            description: incident.description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<NewIncident, FormErrors> {
        let mut errors = FormErrors::default();

        let occurred_at = match self.timestamp.trim() {
            "" => {
                errors.insert(FormField::Timestamp, "Timestamp is required");
                None
            }
            raw => match NaiveDateTime::parse_from_str(raw, FORM_TIMESTAMP_FORMAT)
                .map(|naive| naive.and_utc())
                .ok()
                .or_else(|| shared::timestamp::parse(raw))
            {
                Some(value) => Some(value),
                None => {
                    errors.insert(
                        FormField::Timestamp,
                        "Invalid timestamp (expected YYYY-MM-DDTHH:MM)",
                    );
                    None
                }
            },
        };

        let source_ip = match self.source_ip.trim() {
            "" => {
                errors.insert(FormField::SourceIp, "Source IP is required");
                None
            }
            raw => match raw.parse::<Ipv4Addr>() {
                Ok(ip) => Some(ip.to_string()),
                Err(_) => {
                    errors.insert(
                        FormField::SourceIp,
                        "Invalid IP address format (e.g., 192.168.1.1)",
                    );
                    None
                }
            },
        };

        let severity = required_choice::<Severity>(
            &self.severity,
            FormField::Severity,
            "Severity is required",
            &mut errors,
        );
        let kind = required_choice::<IncidentKind>(
            &self.kind,
            FormField::Kind,
            "Type is required",
            &mut errors,
        );
        let status = if self.status.trim().is_empty() {
            Some(Status::default())
        } else {
            parse_choice::<Status>(&self.status, FormField::Status, &mut errors)
        };

        let description = Some(self.description.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        match (occurred_at, source_ip, severity, kind, status) {
            (Some(occurred_at), Some(source_ip), Some(severity), Some(kind), Some(status))
                if errors.is_empty() =>
            {
                Ok(NewIncident {
                    occurred_at,
                    source_ip,
                    severity,
                    kind,
                    status,
                    description,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_choice<T>(
    raw: &str,
    field: FormField,
    missing: &str,
    errors: &mut FormErrors,
) -> Option<T>
where
    T: std::str::FromStr<Err = shared::error::ApiException>,
{
    if raw.trim().is_empty() {
        errors.insert(field, missing);
        return None;
    }
    parse_choice(raw, field, errors)
}

fn parse_choice<T>(raw: &str, field: FormField, errors: &mut FormErrors) -> Option<T>
where
    T: std::str::FromStr<Err = shared::error::ApiException>,
{
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            errors.insert(field, err.message);
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
