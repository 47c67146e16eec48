//! Page-size and current-page state, and derivation of the visible window.

use std::fmt;

/// Page sizes offered by the page-size selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or_else(|| format!("unsupported page size {value} (expected 5, 10, 25 or 50)"))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNavigation {
    First,
    Previous,
    Next,
    Last,
}

/// Which of the four navigation controls are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
}

impl NavigationState {
    pub fn allows(&self, navigation: PageNavigation) -> bool {
        match navigation {
            PageNavigation::First => self.first,
            PageNavigation::Previous => self.previous,
            PageNavigation::Next => self.next,
            PageNavigation::Last => self.last,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page_size: PageSize,
    current_page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            current_page: 1,
        }
    }
}

impl PaginationState {
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }
}

/// Number of pages needed for `total_items`; zero for an empty collection.
pub fn page_count(total_items: usize, page_size: PageSize) -> usize {
    total_items.div_ceil(page_size.get())
}

/// The visible slice of a sorted collection plus what the pager displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based index of the first visible record.
    pub start: usize,
    /// Exclusive end index of the visible records.
    pub end: usize,
    pub total_items: usize,
    /// Page number shown to the user, never above `total_pages`.
    pub current_page: usize,
    /// Page count shown to the user; one for an empty collection.
    pub total_pages: usize,
    pub navigation: NavigationState,
}

impl PageWindow {
    pub fn slice<'a, T>(&self, sorted: &'a [T]) -> &'a [T] {
        let end = self.end.min(sorted.len());
        let start = self.start.min(end);
        &sorted[start..end]
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// `"11–12 of 12"`, or `"0 items"` when there is nothing to show.
    pub fn summary(&self) -> String {
        if self.total_items == 0 {
            return "0 items".to_string();
        }
        format!("{}–{} of {}", self.start + 1, self.end, self.total_items)
    }

    pub fn page_label(&self) -> String {
        format!("{} / {}", self.current_page, self.total_pages)
    }
}

pub fn derive_window(total_items: usize, state: &PaginationState) -> PageWindow {
    let size = state.page_size.get();
    let pages = page_count(total_items, state.page_size);
    let display_pages = pages.max(1);
    let current = state.current_page.max(1);

    let start = ((current - 1) * size).min(total_items);
    let end = (start + size).min(total_items);

    PageWindow {
        start,
        end,
        total_items,
        current_page: current.min(display_pages),
        total_pages: display_pages,
        navigation: navigation_state(current, pages),
    }
}

/// Visible records of an already sorted collection and the window describing
/// them.
pub fn derive_page<'a, T>(sorted: &'a [T], state: &PaginationState) -> (&'a [T], PageWindow) {
    let window = derive_window(sorted.len(), state);
    (window.slice(sorted), window)
}

fn navigation_state(current_page: usize, total_pages: usize) -> NavigationState {
    let has_pages = total_pages > 0;
    let can_go_back = has_pages && current_page > 1;
    let can_go_forward = has_pages && current_page < total_pages;
    NavigationState {
        first: can_go_back,
        previous: can_go_back,
        next: can_go_forward,
        last: can_go_forward,
    }
}

/// Owns the pagination state for one list session.
#[derive(Debug, Clone, Default)]
pub struct PaginationController {
    state: PaginationState,
}

impl PaginationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Changing the page size always returns to the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.state.page_size = page_size;
        self.state.current_page = 1;
    }

    /// Clamps the current page after the collection size changed. An empty
    /// collection leaves the page untouched; the window then disables all
    /// navigation. Returns whether the page moved.
    pub fn reconcile(&mut self, total_items: usize) -> bool {
        let pages = page_count(total_items, self.state.page_size);
        if total_items > 0 && self.state.current_page > pages {
            self.state.current_page = pages;
            return true;
        }
        false
    }

    pub fn navigation(&self, total_items: usize) -> NavigationState {
        navigation_state(
            self.state.current_page,
            page_count(total_items, self.state.page_size),
        )
    }

    /// Applies a navigation control. Disabled controls are ignored and
    /// return `false`.
    pub fn navigate(&mut self, navigation: PageNavigation, total_items: usize) -> bool {
        if !self.navigation(total_items).allows(navigation) {
            return false;
        }
        let pages = page_count(total_items, self.state.page_size);
        let current = self.state.current_page;
        self.state.current_page = match navigation {
            PageNavigation::First => 1,
            PageNavigation::Previous => current.saturating_sub(1).max(1),
            PageNavigation::Next => (current + 1).min(pages),
            PageNavigation::Last => pages,
        };
        true
    }

    /// Jumps to `page`, clamped into the valid range for `total_items`.
    pub fn go_to_page(&mut self, page: usize, total_items: usize) {
        let pages = page_count(total_items, self.state.page_size).max(1);
        self.state.current_page = page.clamp(1, pages);
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
