use shared::domain::{Incident, IncidentId};
use tracing::{info, warn};

use crate::{
    error::{DashboardError, StoreError},
    form::IncidentForm,
    list_view::{
        ColumnIndicator, ListView, ListViewEvent, PageNavigation, PageSize, PageSnapshot,
        SortColumn,
    },
    store::IncidentStore,
};

/// One dashboard session: the record store plus the list view over the
/// last collection it returned.
pub struct Dashboard<S: IncidentStore> {
    store: S,
    view: ListView<Incident>,
    last_error: Option<String>,
}

impl<S: IncidentStore> Dashboard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            view: ListView::new(),
            last_error: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &ListView<Incident> {
        &self.view
    }

    /// Message from the most recent failed operation, cleared by the next
    /// successful refresh.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Re-fetches the full collection. On failure the previous collection
    /// stays in place.
    pub async fn refresh(&mut self) -> Result<usize, StoreError> {
        match self.store.list_all().await {
            Ok(mut incidents) => {
                incidents.sort_by_key(|incident| incident.id);
                let count = incidents.len();
                self.view.handle(ListViewEvent::CollectionReplaced(incidents));
                self.last_error = None;
                info!(count, "incident list refreshed");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "refresh failed; keeping last collection");
                self.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    pub async fn get(&mut self, id: IncidentId) -> Result<Incident, StoreError> {
        self.store.get(id).await.map_err(|err| self.failed(err))
    }

    pub async fn create(&mut self, form: &IncidentForm) -> Result<Incident, DashboardError> {
        let incident = form.validate()?;
        let created = self
            .store
            .create(incident)
            .await
            .map_err(|err| self.failed(err))?;
        info!(incident_id = %created.id, "incident created");
        self.refresh_after_mutation().await;
        Ok(created)
    }

    pub async fn update(
        &mut self,
        id: IncidentId,
        form: &IncidentForm,
    ) -> Result<Incident, DashboardError> {
        let incident = form.validate()?;
        let updated = self
            .store
            .update(id, incident)
            .await
            .map_err(|err| self.failed(err))?;
        info!(incident_id = %id, "incident updated");
        self.refresh_after_mutation().await;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: IncidentId) -> Result<(), DashboardError> {
        self.store
            .delete(id)
            .await
            .map_err(|err| self.failed(err))?;
        info!(incident_id = %id, "incident deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }

    // The mutation already succeeded; a failed refresh is recorded in
    // `last_error` and the stale collection stays visible.
    async fn refresh_after_mutation(&mut self) {
        let _ = self.refresh().await;
    }

    fn failed(&mut self, err: StoreError) -> StoreError {
        warn!(error = %err, "incident request failed");
        self.last_error = Some(err.user_message());
        err
    }

    pub fn click_column(&mut self, column: SortColumn) {
        self.view.handle(ListViewEvent::ColumnClicked(column));
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.view.handle(ListViewEvent::PageSizeChanged(page_size));
    }

    pub fn navigate(&mut self, navigation: PageNavigation) {
        self.view.handle(ListViewEvent::Navigate(navigation));
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.view.go_to_page(page);
    }

    pub fn indicator(&self, column: SortColumn) -> ColumnIndicator {
        self.view.indicator(column)
    }

    pub fn page(&self) -> PageSnapshot<'_, Incident> {
        self.view.page()
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
