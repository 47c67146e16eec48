//! Client-side list view: multi-key sorting and pagination over the full
//! incident collection held in memory.
//!
//! The server always returns every record; ordering and paging happen here.
//! [`ListView`] composes the [`SortController`] and [`PaginationController`]
//! and is driven entirely by [`ListViewEvent`]s.

use std::hash::Hash;

use chrono::{DateTime, Utc};
use shared::domain::{Incident, IncidentId, Severity};

pub mod pagination;
pub mod sort;
mod view;

pub use pagination::{
    NavigationState, PageNavigation, PageSize, PageWindow, PaginationController, PaginationState,
};
pub use sort::{
    ColumnIndicator, SortColumn, SortController, SortDirection, SortKey, SortKeyStack,
    SortTransition, DEFAULT_MAX_SORT_KEYS,
};
pub use view::{ListView, ListViewEvent, PageSnapshot};

/// What the list view needs from a record: a stable identity for
/// de-duplication and the two sortable attributes.
pub trait ListRecord {
    type Id: Eq + Hash + Clone;

    fn record_id(&self) -> Self::Id;
    fn occurred_at(&self) -> DateTime<Utc>;
    fn severity(&self) -> Severity;
}

impl ListRecord for Incident {
    type Id = IncidentId;

    fn record_id(&self) -> IncidentId {
        self.id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn severity(&self) -> Severity {
        self.severity
    }
}
