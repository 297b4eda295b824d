//! # Property-Based Tests
//!
//! Ordering and cascade invariants of the store, checked with proptest.

use proptest::collection::vec;
use proptest::prelude::*;
use tourney_core::{Event, EventStyle, SqliteStore, Team};

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Events always come back newest date first, ties broken by name.
    #[test]
    fn events_listed_by_date_desc_then_name(
        entries in vec(("[a-z]{1,8}", "2024-0[1-9]-[12][0-9]"), 0..20)
    ) {
        let store = SqliteStore::open_in_memory().expect("open");
        for (name, date) in &entries {
            let mut event = Event::new(name.clone(), EventStyle::SingleElimination, date.clone());
            store.save_event(&mut event).expect("save");
        }

        let listed = store.list_events().expect("list");
        prop_assert_eq!(listed.len(), entries.len());

        let mut expected: Vec<(String, String)> = entries.clone();
        expected.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let actual: Vec<(String, String)> = listed
            .into_iter()
            .map(|e| (e.name, e.date))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Deleting an event never leaves teams behind, whatever else was stored.
    #[test]
    fn deleting_event_removes_only_its_teams(
        kept_teams in 0usize..6,
        dropped_teams in 0usize..6,
    ) {
        let store = SqliteStore::open_in_memory().expect("open");
        let mut kept = Event::new("Kept", EventStyle::SingleElimination, "2024-01-01");
        let mut dropped = Event::new("Dropped", EventStyle::DoubleElimination, "2024-01-02");
        let kept_id = store.save_event(&mut kept).expect("save");
        let dropped_id = store.save_event(&mut dropped).expect("save");

        for i in 0..kept_teams {
            let mut team = Team::new(kept_id, format!("k{i}a"), format!("k{i}b"));
            store.save_team(&mut team).expect("team");
        }
        for i in 0..dropped_teams {
            let mut team = Team::new(dropped_id, format!("d{i}a"), format!("d{i}b"));
            store.save_team(&mut team).expect("team");
        }

        store.delete_event(dropped_id).expect("delete");

        prop_assert_eq!(store.event_teams(kept_id).expect("kept").len(), kept_teams);
        prop_assert!(store.event_teams(dropped_id).expect("dropped").is_empty());
    }
}
