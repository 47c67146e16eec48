//! Plain-text rendering of the incident list and single incidents.

use std::fmt::Write as _;

use client_core::list_view::{
    ColumnIndicator, ListView, NavigationState, PageWindow, SortColumn, SortDirection,
};
use shared::{domain::Incident, protocol::HealthResponse};

const DESCRIPTION_WIDTH: usize = 40;

/// `▲1` for the ascending primary key, `▼2` for a descending secondary, and
/// blank for an unsorted column.
pub fn indicator_label(indicator: ColumnIndicator) -> String {
    match (indicator.priority, indicator.direction) {
        (Some(priority), Some(SortDirection::Ascending)) => format!("▲{priority}"),
        (Some(priority), Some(SortDirection::Descending)) => format!("▼{priority}"),
        _ => String::new(),
    }
}

fn header(view: &ListView<Incident>, column: SortColumn) -> String {
    let indicator = indicator_label(view.indicator(column));
    if indicator.is_empty() {
        column.label().to_string()
    } else {
        format!("{} {indicator}", column.label())
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

fn timestamp(incident: &Incident) -> String {
    incident.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn navigation_line(navigation: NavigationState) -> String {
    let flag = |enabled: bool| if enabled { "on" } else { "off" };
    format!(
        "first={} previous={} next={} last={}",
        flag(navigation.first),
        flag(navigation.previous),
        flag(navigation.next),
        flag(navigation.last),
    )
}

pub fn footer(window: &PageWindow, page_size: usize) -> String {
    format!(
        "{}  |  page {}  |  {} per page\n{}",
        window.summary(),
        window.page_label(),
        page_size,
        navigation_line(window.navigation),
    )
}

/// The current page as a table followed by the pager footer.
pub fn render_list(view: &ListView<Incident>) -> String {
    let page = view.page();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>5}  {:<22}  {:<15}  {:<12}  {:<19}  {:<13}  {}",
        "ID",
        header(view, SortColumn::OccurredAt),
        "Source IP",
        header(view, SortColumn::Severity),
        "Type",
        "Status",
        "Description",
    );
    if page.items.is_empty() {
        let _ = writeln!(out, "{:>5}  No incidents found.", "");
    }
    for incident in &page.items {
        let _ = writeln!(
            out,
            "{:>5}  {:<22}  {:<15}  {:<12}  {:<19}  {:<13}  {}",
            incident.id.0,
            timestamp(incident),
            incident.source_ip,
            incident.severity.as_str(),
            incident.kind.as_str(),
            incident.status.as_str(),
            truncate(
                incident.description.as_deref().unwrap_or("-"),
                DESCRIPTION_WIDTH
            ),
        );
    }
    out.push('\n');
    out.push_str(&footer(&page.window, view.pagination().page_size().get()));
    out.push('\n');
    out
}

pub fn render_incident(incident: &Incident) -> String {
    format!(
        "Incident #{}\n  timestamp:   {}\n  source ip:   {}\n  severity:    {}\n  \
         type:        {}\n  status:      {}\n  description: {}\n",
        incident.id,
        shared::timestamp::format(&incident.occurred_at),
        incident.source_ip,
        incident.severity,
        incident.kind,
        incident.status,
        incident.description.as_deref().unwrap_or("-"),
    )
}

pub fn render_health(health: &HealthResponse) -> String {
    format!(
        "status: {}\nchecked at: {}\n",
        health.status,
        shared::timestamp::format(&health.timestamp)
    )
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
