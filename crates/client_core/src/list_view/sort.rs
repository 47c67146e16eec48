//! Multi-key sort state for the incident list.
//!
//! The active keys form a small stack. Position 0 is the primary key and
//! each later position only breaks ties left by the keys before it. The
//! stack only changes through [`SortKeyStack::clicked`], which resolves a
//! column click to exactly one of three rules:
//!
//! 1. the clicked column is primary: ascending flips to descending, and a
//!    descending primary is dropped;
//! 2. the clicked column sits lower in the stack: it moves to the front,
//!    reset to ascending, and the other keys keep their relative order;
//! 3. the clicked column is not active: it is pushed to the front as
//!    ascending and the tail is evicted once the stack exceeds its capacity.

use std::{cmp::Ordering, fmt, str::FromStr};

use super::ListRecord;

/// Number of simultaneous sort keys the incident list supports.
pub const DEFAULT_MAX_SORT_KEYS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    OccurredAt,
    Severity,
}

impl SortColumn {
    pub const ALL: [SortColumn; 2] = [SortColumn::OccurredAt, SortColumn::Severity];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::OccurredAt => "Timestamp",
            SortColumn::Severity => "Severity",
        }
    }

    /// Ascending order of two records on this column alone.
    pub fn compare<R: ListRecord>(self, a: &R, b: &R) -> Ordering {
        match self {
            SortColumn::OccurredAt => a.occurred_at().cmp(&b.occurred_at()),
            SortColumn::Severity => a.severity().rank().cmp(&b.severity().rank()),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "timestamp" | "occurred_at" | "time" => Ok(SortColumn::OccurredAt),
            "severity" => Ok(SortColumn::Severity),
            other => Err(format!(
                "unknown sort column '{other}' (expected 'timestamp' or 'severity')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// The rule a column click resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTransition {
    /// Primary key flipped from ascending to descending.
    Flipped,
    /// Descending primary key dropped from the stack.
    Removed,
    /// Lower-priority key moved to the front as ascending.
    Promoted { from: usize },
    /// Inactive column pushed to the front; `evicted` is the key that fell
    /// off the tail, if any.
    Pushed { evicted: Option<SortKey> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeyStack {
    keys: Vec<SortKey>,
    max_keys: usize,
}

impl Default for SortKeyStack {
    fn default() -> Self {
        Self::with_max_keys(DEFAULT_MAX_SORT_KEYS)
    }
}

impl SortKeyStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty stack holding at most `max_keys` keys (at least one).
    pub fn with_max_keys(max_keys: usize) -> Self {
        Self {
            keys: Vec::new(),
            max_keys: max_keys.max(1),
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn primary(&self) -> Option<SortKey> {
        self.keys.first().copied()
    }

    pub fn position(&self, column: SortColumn) -> Option<usize> {
        self.keys.iter().position(|key| key.column == column)
    }

    /// The stack that results from clicking `column`, plus the rule applied.
    pub fn clicked(&self, column: SortColumn) -> (SortKeyStack, SortTransition) {
        let (keys, transition) = match self.position(column) {
            Some(0) => toggle_primary(&self.keys),
            Some(from) => (promote(&self.keys, from), SortTransition::Promoted { from }),
            None => {
                let (keys, evicted) = push_front(&self.keys, column, self.max_keys);
                (keys, SortTransition::Pushed { evicted })
            }
        };
        (
            SortKeyStack {
                keys,
                max_keys: self.max_keys,
            },
            transition,
        )
    }

    /// Compares two records key by key; the first unequal key decides.
    /// An empty stack treats every pair as equal.
    pub fn compare<R: ListRecord>(&self, a: &R, b: &R) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.direction.apply(key.column.compare(a, b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

fn toggle_primary(keys: &[SortKey]) -> (Vec<SortKey>, SortTransition) {
    let mut next = keys.to_vec();
    match next[0].direction {
        SortDirection::Ascending => {
            next[0].direction = SortDirection::Descending;
            (next, SortTransition::Flipped)
        }
        SortDirection::Descending => {
            next.remove(0);
            (next, SortTransition::Removed)
        }
    }
}

fn promote(keys: &[SortKey], from: usize) -> Vec<SortKey> {
    let mut next = keys.to_vec();
    let promoted = next.remove(from);
    next.insert(0, SortKey::ascending(promoted.column));
    next
}

fn push_front(
    keys: &[SortKey],
    column: SortColumn,
    max_keys: usize,
) -> (Vec<SortKey>, Option<SortKey>) {
    let mut next = Vec::with_capacity(keys.len() + 1);
    next.push(SortKey::ascending(column));
    next.extend_from_slice(keys);
    let evicted = if next.len() > max_keys {
        next.pop()
    } else {
        None
    };
    (next, evicted)
}

/// Sort indicator for one column header: 1-based priority and direction when
/// the column is active, both `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnIndicator {
    pub priority: Option<usize>,
    pub direction: Option<SortDirection>,
}

impl ColumnIndicator {
    pub fn is_active(&self) -> bool {
        self.priority.is_some()
    }
}

/// Owns the sort stack for one list session.
#[derive(Debug, Clone, Default)]
pub struct SortController {
    stack: SortKeyStack,
}

impl SortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_keys(max_keys: usize) -> Self {
        Self {
            stack: SortKeyStack::with_max_keys(max_keys),
        }
    }

    pub fn stack(&self) -> &SortKeyStack {
        &self.stack
    }

    pub fn on_column_clicked(&mut self, column: SortColumn) -> SortTransition {
        let (next, transition) = self.stack.clicked(column);
        self.stack = next;
        transition
    }

    pub fn comparator<R: ListRecord>(&self) -> impl Fn(&R, &R) -> Ordering + '_ {
        move |a, b| self.stack.compare(a, b)
    }

    /// Sorts in place. `sort_by` is stable, so records the keys consider
    /// equal keep their incoming order.
    pub fn sort<R: ListRecord>(&self, records: &mut [R]) {
        records.sort_by(self.comparator());
    }

    pub fn indicator(&self, column: SortColumn) -> ColumnIndicator {
        match self.stack.position(column) {
            Some(position) => ColumnIndicator {
                priority: Some(position + 1),
                direction: Some(self.stack.keys()[position].direction),
            },
            None => ColumnIndicator::default(),
        }
    }
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
