use super::*;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use shared::domain::{IncidentKind, NewIncident, Severity, Status};

use crate::{error::FormField, list_view::NavigationState};

#[derive(Clone, Default)]
struct MemoryStore {
    rows: Arc<Mutex<Vec<Incident>>>,
    next_id: Arc<Mutex<i64>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    fn seeded(count: i64) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap();
            // Newest first, the way the service returns them.
            for id in (1..=count).rev() {
                rows.push(new_incident(id as u32).into_incident(IncidentId(id)));
            }
        }
        *store.next_id.lock().unwrap() = count;
        store
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "Service unavailable".into(),
            });
        }
        Ok(())
    }

    fn not_found() -> StoreError {
        StoreError::Api {
            status: 404,
            message: "Incident not found".into(),
        }
    }
}

#[async_trait]
impl IncidentStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Incident>, StoreError> {
        self.check_online()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get(&self, id: IncidentId) -> Result<Incident, StoreError> {
        self.check_online()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|incident| incident.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create(&self, incident: NewIncident) -> Result<Incident, StoreError> {
        self.check_online()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = incident.into_incident(IncidentId(*next_id));
        self.rows.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: IncidentId,
        incident: NewIncident,
    ) -> Result<Incident, StoreError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(Self::not_found)?;
        *slot = incident.into_incident(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: IncidentId) -> Result<(), StoreError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

fn new_incident(seed: u32) -> NewIncident {
    let severities = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];
    NewIncident {
        occurred_at: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
            + Duration::hours(i64::from(seed)),
        source_ip: format!("10.0.0.{seed}"),
        severity: severities[seed as usize % 4],
        kind: IncidentKind::Malware,
        status: Status::Open,
        description: None,
    }
}

fn form(timestamp: &str, severity: &str) -> IncidentForm {
    IncidentForm {
        timestamp: timestamp.into(),
        source_ip: "192.168.1.100".into(),
        severity: severity.into(),
        kind: "phishing".into(),
        status: String::new(),
        description: "Test incident".into(),
    }
}

fn page_ids<S: IncidentStore>(dashboard: &Dashboard<S>) -> Vec<i64> {
    dashboard
        .page()
        .items
        .iter()
        .map(|incident| incident.id.0)
        .collect()
}

#[tokio::test]
async fn refresh_orders_by_id_before_sorting() {
    let mut dashboard = Dashboard::new(MemoryStore::seeded(4));
    assert_eq!(dashboard.refresh().await.expect("refresh"), 4);
    assert_eq!(page_ids(&dashboard), vec![1, 2, 3, 4]);
    assert_eq!(dashboard.last_error(), None);
}

#[tokio::test]
async fn sort_state_survives_mutations() {
    let mut dashboard = Dashboard::new(MemoryStore::seeded(3));
    dashboard.refresh().await.expect("refresh");
    dashboard.click_column(SortColumn::OccurredAt);
    dashboard.click_column(SortColumn::OccurredAt);
    assert_eq!(page_ids(&dashboard), vec![3, 2, 1]);

    let created = dashboard
        .create(&form("2026-03-01T09:00", "low"))
        .await
        .expect("create");
    assert_eq!(created.id, IncidentId(4));
    assert_eq!(created.status, Status::Open);
    assert_eq!(page_ids(&dashboard), vec![4, 3, 2, 1]);
    assert_eq!(
        dashboard.indicator(SortColumn::OccurredAt).priority,
        Some(1)
    );
}

#[tokio::test]
async fn deleting_from_second_page_clamps_to_first() {
    let mut dashboard = Dashboard::new(MemoryStore::seeded(12));
    dashboard.refresh().await.expect("refresh");
    dashboard.navigate(PageNavigation::Next);
    assert_eq!(page_ids(&dashboard), vec![11, 12]);

    dashboard.delete(IncidentId(11)).await.expect("delete");
    assert_eq!(dashboard.page().window.current_page, 2);
    dashboard.delete(IncidentId(12)).await.expect("delete");

    let page = dashboard.page();
    assert_eq!(page.window.current_page, 1);
    assert_eq!(page.window.total_pages, 1);
    assert_eq!(page.items.len(), 10);
    assert_eq!(dashboard.view().pagination().current_page(), 1);
}

#[tokio::test]
async fn deleting_everything_shows_zero_items() {
    let mut dashboard = Dashboard::new(MemoryStore::seeded(1));
    dashboard.refresh().await.expect("refresh");
    dashboard.delete(IncidentId(1)).await.expect("delete");

    let page = dashboard.page();
    assert_eq!(page.window.summary(), "0 items");
    assert_eq!(page.window.page_label(), "1 / 1");
    assert_eq!(page.window.navigation, NavigationState::default());
}

#[tokio::test]
async fn update_is_visible_after_refresh() {
    let mut dashboard = Dashboard::new(MemoryStore::seeded(2));
    dashboard.refresh().await.expect("refresh");

    let existing = dashboard.get(IncidentId(2)).await.expect("get");
    let mut edit = IncidentForm::from_incident(&existing);
    edit.status = "resolved".into();
    dashboard.update(IncidentId(2), &edit).await.expect("update");

    let row = dashboard
        .page()
        .items
        .into_iter()
        .find(|incident| incident.id == IncidentId(2))
        .cloned()
        .expect("row");
    assert_eq!(row.status, Status::Resolved);
    assert_eq!(row.occurred_at, existing.occurred_at);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_store() {
    let store = MemoryStore::seeded(1);
    let mut dashboard = Dashboard::new(store.clone());
    dashboard.refresh().await.expect("refresh");

    let mut bad = form("2026-03-01T09:00", "high");
    bad.source_ip = "999.1.1.1".into();
    let err = dashboard.create(&bad).await.expect_err("invalid");
    match err {
        DashboardError::Invalid(errors) => {
            assert!(errors.get(FormField::SourceIp).is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_refresh_keeps_last_collection() {
    let store = MemoryStore::seeded(5);
    let mut dashboard = Dashboard::new(store.clone());
    dashboard.refresh().await.expect("refresh");

    store.go_offline();
    let err = dashboard.refresh().await.expect_err("offline");
    assert!(matches!(err, StoreError::Api { status: 503, .. }));
    assert_eq!(dashboard.last_error(), Some("Service unavailable"));
    assert_eq!(page_ids(&dashboard), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn missing_incident_is_reported() {
    let mut dashboard = Dashboard::new(MemoryStore::seeded(2));
    dashboard.refresh().await.expect("refresh");

    let err = dashboard.delete(IncidentId(9)).await.expect_err("missing");
    assert!(matches!(err, DashboardError::Store(ref store) if store.is_not_found()));
    assert_eq!(dashboard.last_error(), Some("Incident not found"));
    assert_eq!(dashboard.view().len(), 2);
}

#[tokio::test]
async fn page_size_and_jump_work_together() {
    let mut dashboard = Dashboard::new(MemoryStore::seeded(30));
    dashboard.refresh().await.expect("refresh");
    dashboard.set_page_size(PageSize::Five);
    dashboard.go_to_page(4);
    assert_eq!(page_ids(&dashboard), vec![16, 17, 18, 19, 20]);
    assert_eq!(dashboard.page().window.summary(), "16–20 of 30");

    dashboard.set_page_size(PageSize::TwentyFive);
    assert_eq!(dashboard.page().window.page_label(), "1 / 2");
}
