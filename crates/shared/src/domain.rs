use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiException, ErrorCode};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(IncidentId);

/// Declares a closed set of snake_case string values with `as_str`,
/// `Display` and `FromStr`, matching the serde representation.
macro_rules! string_enum {
    ($name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ApiException;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ApiException::new(
                        ErrorCode::Validation,
                        format!("unknown {} '{other}'", $label),
                    )),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

string_enum!(Severity, "severity" {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

impl Severity {
    /// Ordinal used for ordering, `low = 1` through `critical = 4`.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    Investigating,
    Resolved,
    Closed,
}

string_enum!(Status, "status" {
    Open => "open",
    Investigating => "investigating",
    Resolved => "resolved",
    Closed => "closed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    Malware,
    BruteForce,
    Phishing,
    UnauthorizedAccess,
    DataExfiltration,
}

string_enum!(IncidentKind, "incident type" {
    Malware => "malware",
    BruteForce => "brute_force",
    Phishing => "phishing",
    UnauthorizedAccess => "unauthorized_access",
    DataExfiltration => "data_exfiltration",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    #[serde(rename = "timestamp", with = "crate::timestamp")]
    pub occurred_at: DateTime<Utc>,
    pub source_ip: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub status: Status,
    #[serde(default)]
    pub description: Option<String>,
}

/// Validated field set for inserting or replacing an incident row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
    pub occurred_at: DateTime<Utc>,
    pub source_ip: String,
    pub severity: Severity,
    pub kind: IncidentKind,
    pub status: Status,
    pub description: Option<String>,
}

impl NewIncident {
    pub fn into_incident(self, id: IncidentId) -> Incident {
        Incident {
            id,
            occurred_at: self.occurred_at,
            source_ip: self.source_ip,
            severity: self.severity,
            kind: self.kind,
            status: self.status,
            description: self.description,
        }
    }
}
