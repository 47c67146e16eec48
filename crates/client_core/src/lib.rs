//! Client side of the incident dashboard: the HTTP record store, form
//! validation, and the sortable, paginated list view.

pub mod dashboard;
pub mod error;
pub mod form;
pub mod list_view;
pub mod store;

pub use dashboard::Dashboard;
pub use error::{DashboardError, FormErrors, FormField, StoreError};
pub use form::IncidentForm;
pub use list_view::{ListRecord, ListView, ListViewEvent};
pub use store::{HttpIncidentStore, IncidentStore, DEFAULT_SERVER_URL};
