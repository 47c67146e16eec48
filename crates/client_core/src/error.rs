use std::{collections::BTreeMap, fmt};

use thiserror::Error;

/// Failures talking to the incident service.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to incident service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("incident service returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Api { status: 404, .. })
    }

    /// Text suitable for showing to a user next to the list.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Api { message, .. } => message.clone(),
            StoreError::Transport(_) => {
                "Could not reach the incident service. Please try again.".to_string()
            }
            StoreError::InvalidUrl { url, .. } => format!("Invalid server url: {url}"),
        }
    }
}

/// Form fields that validation can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Timestamp,
    SourceIp,
    Severity,
    Kind,
    Status,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Timestamp => "timestamp",
            FormField::SourceIp => "source_ip",
            FormField::Severity => "severity",
            FormField::Kind => "type",
            FormField::Status => "status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field validation messages for an incident form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.fields))]
pub struct FormErrors {
    fields: BTreeMap<FormField, String>,
}

impl FormErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

fn summarize(fields: &BTreeMap<FormField, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors surfaced by [`crate::Dashboard`] operations.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid incident: {0}")]
    Invalid(#[from] FormErrors),
}
