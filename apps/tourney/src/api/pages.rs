//! # HTML Pages
//!
//! Askama templates rendered by the page handlers. Templates live in
//! `apps/tourney/templates/` and are compiled into the binary.

use askama::Template;
use tourney_core::EventSummary;

/// One row of the event table on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub name: String,
    pub date: String,
    pub style: &'static str,
    pub team_count: u64,
    pub game_count: u64,
}

impl From<&EventSummary> for EventRow {
    fn from(summary: &EventSummary) -> Self {
        Self {
            name: summary.event.name.clone(),
            date: summary.event.date.clone(),
            style: summary.event.style.label(),
            team_count: summary.team_count,
            game_count: summary.game_count,
        }
    }
}

/// The index page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub events: Vec<EventRow>,
}

impl IndexTemplate {
    /// Build the index page from the store's event summaries.
    pub fn new(summaries: &[EventSummary]) -> Self {
        Self {
            title: "Home Page".to_string(),
            events: summaries.iter().map(EventRow::from).collect(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_core::{Event, EventId, EventStyle};

    fn summary(name: &str) -> EventSummary {
        let mut event = Event::new(name, EventStyle::DoubleElimination, "2024-09-14");
        event.id = Some(EventId(1));
        EventSummary {
            event,
            team_count: 8,
            game_count: 14,
        }
    }

    #[test]
    fn renders_event_rows() {
        let html = IndexTemplate::new(&[summary("Harvest Toss")])
            .render()
            .expect("render");

        assert!(html.contains("<title>Home Page</title>"));
        assert!(html.contains("Harvest Toss"));
        assert!(html.contains("double elimination"));
        assert!(html.contains("2024-09-14"));
    }

    #[test]
    fn escapes_event_names() {
        let html = IndexTemplate::new(&[summary("<b>Bags & Boards</b>")])
            .render()
            .expect("render");

        assert!(!html.contains("<b>Bags"));
        assert!(html.contains("&lt;b&gt;Bags &amp; Boards&lt;/b&gt;"));
    }

    #[test]
    fn empty_index_has_placeholder() {
        let html = IndexTemplate::new(&[]).render().expect("render");
        assert!(html.contains("No events yet"));
    }
}
