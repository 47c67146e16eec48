use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::domain::{Incident, IncidentId, IncidentKind, NewIncident, Severity, Status};

mod seed;

pub use seed::sample_incidents;

const INCIDENT_COLUMNS: &str =
    "id, occurred_at, source_ip, severity, kind, status, description";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own empty database.
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            5
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Every incident, newest first. Callers that need another order sort
    /// the result themselves.
    pub async fn list_incidents(&self) -> Result<Vec<Incident>> {
        let rows = sqlx::query(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents ORDER BY occurred_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list incidents")?;
        rows.iter().map(incident_from_row).collect()
    }

    pub async fn get_incident(&self, incident_id: IncidentId) -> Result<Option<Incident>> {
        let row = sqlx::query(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?"
        ))
        .bind(incident_id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load incident {incident_id}"))?;
        row.as_ref().map(incident_from_row).transpose()
    }

    pub async fn create_incident(&self, incident: NewIncident) -> Result<Incident> {
        let rec = sqlx::query(
            "INSERT INTO incidents (occurred_at, source_ip, severity, kind, status, description)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(incident.occurred_at)
        .bind(&incident.source_ip)
        .bind(incident.severity.as_str())
        .bind(incident.kind.as_str())
        .bind(incident.status.as_str())
        .bind(incident.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .context("failed to insert incident")?;
        let incident_id = IncidentId(rec.get::<i64, _>(0));
        debug!(%incident_id, "incident created");
        Ok(incident.into_incident(incident_id))
    }

    /// Replaces every mutable column of an existing incident. Returns `None`
    /// when no row has the given id.
    pub async fn update_incident(
        &self,
        incident_id: IncidentId,
        incident: NewIncident,
    ) -> Result<Option<Incident>> {
        let result = sqlx::query(
            "UPDATE incidents
             SET occurred_at = ?, source_ip = ?, severity = ?, kind = ?,
                 status = ?, description = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(incident.occurred_at)
        .bind(&incident.source_ip)
        .bind(incident.severity.as_str())
        .bind(incident.kind.as_str())
        .bind(incident.status.as_str())
        .bind(incident.description.as_deref())
        .bind(incident_id.0)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update incident {incident_id}"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        debug!(%incident_id, "incident updated");
        Ok(Some(incident.into_incident(incident_id)))
    }

    pub async fn delete_incident(&self, incident_id: IncidentId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = ?")
            .bind(incident_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete incident {incident_id}"))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_incidents(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents")
            .fetch_one(&self.pool)
            .await
            .context("failed to count incidents")?;
        Ok(count)
    }

    /// Inserts the bundled sample incidents and returns how many were added.
    pub async fn seed_sample_incidents(&self) -> Result<usize> {
        let samples = sample_incidents();
        let mut tx = self.pool.begin().await?;
        for incident in &samples {
            sqlx::query(
                "INSERT INTO incidents (occurred_at, source_ip, severity, kind, status, description)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(incident.occurred_at)
            .bind(&incident.source_ip)
            .bind(incident.severity.as_str())
            .bind(incident.kind.as_str())
            .bind(incident.status.as_str())
            .bind(incident.description.as_deref())
            .execute(&mut *tx)
            .await
            .context("failed to insert sample incident")?;
        }
        tx.commit().await?;
        Ok(samples.len())
    }
}

fn incident_from_row(row: &SqliteRow) -> Result<Incident> {
    let incident_id = IncidentId(row.try_get::<i64, _>(0)?);
    let parse_column = |index: usize, column: &str| -> Result<String> {
        row.try_get::<String, _>(index)
            .with_context(|| format!("incident {incident_id}: unreadable {column} column"))
    };

    Ok(Incident {
        id: incident_id,
        occurred_at: row.try_get::<DateTime<Utc>, _>(1)?,
        source_ip: parse_column(2, "source_ip")?,
        severity: Severity::from_str(&parse_column(3, "severity")?)
            .map_err(|e| anyhow!("incident {incident_id}: {}", e.message))?,
        kind: IncidentKind::from_str(&parse_column(4, "kind")?)
            .map_err(|e| anyhow!("incident {incident_id}: {}", e.message))?,
        status: Status::from_str(&parse_column(5, "status")?)
            .map_err(|e| anyhow!("incident {incident_id}: {}", e.message))?,
        description: row.try_get::<Option<String>, _>(6)?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
