use std::collections::HashSet;

use tracing::debug;

use super::{
    pagination::{
        derive_page, NavigationState, PageNavigation, PageSize, PageWindow, PaginationController,
        PaginationState,
    },
    sort::{ColumnIndicator, SortColumn, SortController, SortKeyStack},
    ListRecord,
};

/// Inputs the list view reacts to.
#[derive(Debug, Clone)]
pub enum ListViewEvent<R> {
    /// A fresh fetch replaced the whole collection.
    CollectionReplaced(Vec<R>),
    ColumnClicked(SortColumn),
    PageSizeChanged(PageSize),
    Navigate(PageNavigation),
}

/// The records visible on the current page and the pager state around them.
#[derive(Debug)]
pub struct PageSnapshot<'a, R> {
    pub items: Vec<&'a R>,
    pub window: PageWindow,
}

/// Sort and pagination state over one in-memory collection.
///
/// The sorted order is cached as indices into `records` and rebuilt only
/// when the collection or the sort stack changes.
#[derive(Debug, Clone)]
pub struct ListView<R: ListRecord> {
    records: Vec<R>,
    order: Vec<usize>,
    sort: SortController,
    pagination: PaginationController,
}

impl<R: ListRecord> Default for ListView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ListRecord> ListView<R> {
    pub fn new() -> Self {
        Self::with_sort(SortController::new())
    }

    pub fn with_max_sort_keys(max_keys: usize) -> Self {
        Self::with_sort(SortController::with_max_keys(max_keys))
    }

    fn with_sort(sort: SortController) -> Self {
        Self {
            records: Vec::new(),
            order: Vec::new(),
            sort,
            pagination: PaginationController::new(),
        }
    }

    pub fn handle(&mut self, event: ListViewEvent<R>) {
        match event {
            ListViewEvent::CollectionReplaced(records) => self.replace_collection(records),
            ListViewEvent::ColumnClicked(column) => {
                let transition = self.sort.on_column_clicked(column);
                debug!(%column, ?transition, keys = ?self.sort.stack().keys(), "sort changed");
                self.resort();
            }
            ListViewEvent::PageSizeChanged(size) => {
                self.pagination.set_page_size(size);
                debug!(page_size = size.get(), "page size changed");
            }
            ListViewEvent::Navigate(navigation) => {
                if !self.pagination.navigate(navigation, self.len()) {
                    debug!(?navigation, "navigation control disabled; ignored");
                }
            }
        }
    }

    fn replace_collection(&mut self, records: Vec<R>) {
        let mut seen = HashSet::with_capacity(records.len());
        let incoming = records.len();
        self.records = records
            .into_iter()
            .filter(|record| seen.insert(record.record_id()))
            .collect();
        if self.records.len() != incoming {
            debug!(
                dropped = incoming - self.records.len(),
                "duplicate records dropped from collection"
            );
        }
        self.resort();
        if self.pagination.reconcile(self.len()) {
            debug!(
                current_page = self.pagination.state().current_page(),
                "current page clamped after collection change"
            );
        }
    }

    fn resort(&mut self) {
        let mut order: Vec<usize> = (0..self.records.len()).collect();
        let cmp = self.sort.comparator();
        order.sort_by(|&a, &b| cmp(&self.records[a], &self.records[b]));
        self.order = order;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in arrival order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Every record in the current sort order.
    pub fn sorted(&self) -> impl Iterator<Item = &R> + '_ {
        self.order.iter().map(|&index| &self.records[index])
    }

    pub fn page(&self) -> PageSnapshot<'_, R> {
        let (visible, window) = derive_page(&self.order, self.pagination.state());
        let items = visible
            .iter()
            .map(|&index| &self.records[index])
            .collect();
        PageSnapshot { items, window }
    }

    pub fn sort_keys(&self) -> &SortKeyStack {
        self.sort.stack()
    }

    pub fn indicator(&self, column: SortColumn) -> ColumnIndicator {
        self.sort.indicator(column)
    }

    pub fn pagination(&self) -> &PaginationState {
        self.pagination.state()
    }

    pub fn navigation(&self) -> NavigationState {
        self.pagination.navigation(self.len())
    }

    /// Jumps straight to `page`, clamped to the pages that exist.
    pub fn go_to_page(&mut self, page: usize) {
        self.pagination.go_to_page(page, self.len());
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
