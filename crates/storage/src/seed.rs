use chrono::{TimeZone, Utc};
use shared::domain::{IncidentKind, NewIncident, Severity, Status};

type SampleRow = (
    (i32, u32, u32, u32, u32),
    &'static str,
    Severity,
    IncidentKind,
    Status,
    &'static str,
);

const SAMPLES: &[SampleRow] = &[
    (
        (2026, 2, 11, 8, 0),
        "192.168.1.100",
        Severity::Critical,
        IncidentKind::Malware,
        Status::Open,
        "Ransomware payload quarantined on finance workstation",
    ),
    (
        (2026, 2, 11, 9, 0),
        "10.0.0.50",
        Severity::High,
        IncidentKind::BruteForce,
        Status::Investigating,
        "Repeated SSH login failures against bastion host",
    ),
    (
        (2026, 2, 11, 10, 0),
        "172.16.0.25",
        Severity::Medium,
        IncidentKind::Phishing,
        Status::Resolved,
        "Credential harvesting email reported by staff",
    ),
    (
        (2026, 2, 11, 11, 0),
        "192.168.2.200",
        Severity::Low,
        IncidentKind::UnauthorizedAccess,
        Status::Closed,
        "Badge reader denied after-hours entry",
    ),
    (
        (2026, 2, 12, 7, 15),
        "10.10.10.10",
        Severity::High,
        IncidentKind::DataExfiltration,
        Status::Open,
        "Large outbound transfer to unknown storage bucket",
    ),
    (
        (2026, 2, 12, 9, 40),
        "192.168.1.45",
        Severity::Medium,
        IncidentKind::Malware,
        Status::Investigating,
        "Browser extension flagged by endpoint agent",
    ),
    (
        (2026, 2, 12, 13, 5),
        "172.16.4.9",
        Severity::Low,
        IncidentKind::Phishing,
        Status::Closed,
        "Spoofed vendor invoice blocked at gateway",
    ),
    (
        (2026, 2, 13, 2, 30),
        "10.0.3.77",
        Severity::Critical,
        IncidentKind::UnauthorizedAccess,
        Status::Open,
        "Service account used from unexpected country",
    ),
    (
        (2026, 2, 13, 16, 20),
        "192.168.7.12",
        Severity::Medium,
        IncidentKind::BruteForce,
        Status::Resolved,
        "Password spraying against VPN portal",
    ),
    (
        (2026, 2, 14, 8, 55),
        "10.20.0.3",
        Severity::High,
        IncidentKind::Malware,
        Status::Investigating,
        "Macro-enabled document spawned PowerShell",
    ),
    (
        (2026, 2, 14, 12, 0),
        "172.16.9.200",
        Severity::Low,
        IncidentKind::DataExfiltration,
        Status::Closed,
        "USB mass storage mounted on kiosk",
    ),
    (
        (2026, 2, 15, 6, 45),
        "192.168.3.33",
        Severity::Medium,
        IncidentKind::UnauthorizedAccess,
        Status::Open,
        "Shared admin credentials found in wiki page",
    ),
];

/// Sample incidents used to populate a fresh database.
pub fn sample_incidents() -> Vec<NewIncident> {
    SAMPLES
        .iter()
        .filter_map(
            |&((year, month, day, hour, minute), source_ip, severity, kind, status, description)| {
                let occurred_at = Utc
                    .with_ymd_and_hms(year, month, day, hour, minute, 0)
                    .single()?;
                Some(NewIncident {
                    occurred_at,
                    source_ip: source_ip.to_string(),
                    severity,
                    kind,
                    status,
                    description: Some(description.to_string()),
                })
            },
        )
        .collect()
}
