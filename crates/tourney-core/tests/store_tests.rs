//! # Store Behaviour Tests
//!
//! CRUD round trips and referential cleanup for events, teams and games.

use tourney_core::{
    Event, EventId, EventStyle, Game, GameId, GameState, SqliteStore, Team, TeamId,
    TourneyError,
};

fn store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("open in-memory store")
}

fn saved_event(store: &SqliteStore, name: &str, date: &str) -> EventId {
    let mut event = Event::new(name, EventStyle::SingleElimination, date);
    store.save_event(&mut event).expect("save event")
}

fn saved_team(store: &SqliteStore, event_id: EventId, one: &str, two: &str) -> TeamId {
    let mut team = Team::new(event_id, one, two);
    store.save_team(&mut team).expect("save team")
}

// =============================================================================
// EVENTS
// =============================================================================

mod events {
    use super::*;

    #[test]
    fn insert_assigns_id() {
        let store = store();
        let mut event = Event::new("Summer Open", EventStyle::DoubleElimination, "2024-07-04");
        assert!(event.id.is_none());

        let id = store.save_event(&mut event).expect("save");
        assert_eq!(event.id, Some(id));

        let loaded = store.get_event(id).expect("get");
        assert_eq!(loaded, event);
    }

    #[test]
    fn update_keeps_id() {
        let store = store();
        let mut event = Event::new("Summer Open", EventStyle::SingleElimination, "2024-07-04");
        let id = store.save_event(&mut event).expect("save");

        event.name = "Summer Open (rain date)".to_string();
        event.date = "2024-07-05".to_string();
        event.style = EventStyle::DoubleElimination;
        assert_eq!(store.save_event(&mut event).expect("update"), id);

        let events = store.list_events().expect("list");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Summer Open (rain date)");
        assert_eq!(events[0].style, EventStyle::DoubleElimination);
    }

    #[test]
    fn update_of_missing_event_fails() {
        let store = store();
        let mut event = Event::new("Ghost", EventStyle::SingleElimination, "2024-01-01");
        event.id = Some(EventId(42));

        assert!(matches!(
            store.save_event(&mut event),
            Err(TourneyError::EventNotFound(EventId(42)))
        ));
    }

    #[test]
    fn invalid_event_not_written() {
        let store = store();
        let mut event = Event::new("", EventStyle::SingleElimination, "2024-01-01");

        assert!(matches!(
            store.save_event(&mut event),
            Err(TourneyError::InvalidEvent(_))
        ));
        assert!(event.id.is_none());
        assert!(store.list_events().expect("list").is_empty());
    }

    #[test]
    fn listed_newest_first_then_by_name() {
        let store = store();
        saved_event(&store, "Bravo", "2024-05-01");
        saved_event(&store, "Alpha", "2024-05-01");
        saved_event(&store, "Older", "2023-11-12");
        saved_event(&store, "Newest", "2024-08-30");

        let names: Vec<String> = store
            .list_events()
            .expect("list")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Newest", "Alpha", "Bravo", "Older"]);
    }

    #[test]
    fn get_missing_event() {
        let store = store();
        assert!(matches!(
            store.get_event(EventId(1)),
            Err(TourneyError::EventNotFound(_))
        ));
    }

    #[test]
    fn delete_missing_event() {
        let store = store();
        assert!(matches!(
            store.delete_event(EventId(5)),
            Err(TourneyError::EventNotFound(EventId(5)))
        ));
    }

    #[test]
    fn summaries_count_teams_and_games() {
        let store = store();
        let busy = saved_event(&store, "Busy", "2024-02-01");
        let quiet = saved_event(&store, "Quiet", "2024-01-01");
        saved_team(&store, busy, "Ann", "Bo");
        saved_team(&store, busy, "Cy", "Di");
        let mut game = Game::new(busy);
        store.save_game(&mut game).expect("game");

        let summaries = store.list_event_summaries().expect("summaries");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].event.id, Some(busy));
        assert_eq!(summaries[0].team_count, 2);
        assert_eq!(summaries[0].game_count, 1);
        assert_eq!(summaries[1].event.id, Some(quiet));
        assert_eq!(summaries[1].team_count, 0);
        assert_eq!(summaries[1].game_count, 0);
    }
}

// =============================================================================
// TEAMS
// =============================================================================

mod teams {
    use super::*;

    #[test]
    fn listed_in_insertion_order() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let first = saved_team(&store, event_id, "Ann", "Bo");
        let second = saved_team(&store, event_id, "Cy", "Di");

        let teams = store.event_teams(event_id).expect("teams");
        let ids: Vec<_> = teams.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(teams[1].player_one, "Cy");
    }

    #[test]
    fn teams_scoped_to_event() {
        let store = store();
        let a = saved_event(&store, "A", "2024-01-01");
        let b = saved_event(&store, "B", "2024-01-02");
        saved_team(&store, a, "Ann", "Bo");

        assert_eq!(store.event_teams(a).expect("a").len(), 1);
        assert!(store.event_teams(b).expect("b").is_empty());
    }

    #[test]
    fn update_changes_players_only() {
        let store = store();
        let a = saved_event(&store, "A", "2024-01-01");
        let b = saved_event(&store, "B", "2024-01-02");
        let id = saved_team(&store, a, "Ann", "Bo");

        let mut team = Team::new(b, "Eve", "Fay");
        team.id = Some(id);
        store.save_team(&mut team).expect("update");

        let teams = store.event_teams(a).expect("teams");
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].player_one, "Eve");
        assert_eq!(teams[0].player_two, "Fay");
        assert!(store.event_teams(b).expect("b").is_empty());
    }

    #[test]
    fn insert_into_missing_event_fails() {
        let store = store();
        let mut team = Team::new(EventId(77), "Ann", "Bo");

        assert!(matches!(
            store.save_team(&mut team),
            Err(TourneyError::EventNotFound(EventId(77)))
        ));
    }

    #[test]
    fn update_of_missing_team_fails() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let mut team = Team::new(event_id, "Ann", "Bo");
        team.id = Some(TeamId(9));

        assert!(matches!(
            store.save_team(&mut team),
            Err(TourneyError::TeamNotFound(TeamId(9)))
        ));
    }

    #[test]
    fn delete_team() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let id = saved_team(&store, event_id, "Ann", "Bo");

        store.delete_team(id).expect("delete");
        assert!(store.event_teams(event_id).expect("teams").is_empty());
        assert!(matches!(
            store.delete_team(id),
            Err(TourneyError::TeamNotFound(_))
        ));
    }
}

// =============================================================================
// GAMES AND BRACKET LINKS
// =============================================================================

mod games {
    use super::*;

    #[test]
    fn new_game_is_pending() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let mut game = Game::new(event_id);
        store.save_game(&mut game).expect("save");

        let games = store.event_games(event_id).expect("games");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].state, GameState::Pending);
        assert_eq!(games[0].links(), [None, None, None]);
    }

    #[test]
    fn bracket_links_round_trip() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let one = saved_team(&store, event_id, "Ann", "Bo");
        let two = saved_team(&store, event_id, "Cy", "Di");

        let mut final_game = Game::new(event_id);
        let final_id = store.save_game(&mut final_game).expect("final");
        let mut consolation = Game::new(event_id);
        let consolation_id = store.save_game(&mut consolation).expect("consolation");

        let mut semi = Game::new(event_id);
        semi.team_one = Some(one);
        semi.team_two = Some(two);
        semi.state = GameState::Complete;
        semi.winner = Some(two);
        semi.win_game = Some(final_id);
        semi.lose_game = Some(consolation_id);
        let semi_id = store.save_game(&mut semi).expect("semi");

        final_game.prev_game = Some(semi_id);
        store.save_game(&mut final_game).expect("link final");

        let games = store.event_games(event_id).expect("games");
        assert_eq!(games.len(), 3);
        assert_eq!(games[0].prev_game, Some(semi_id));
        assert_eq!(games[2], semi);
    }

    #[test]
    fn invalid_link_target_rejected() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let mut game = Game::new(event_id);
        game.win_game = Some(GameId(999));

        assert!(matches!(
            store.save_game(&mut game),
            Err(TourneyError::InvalidGame(_))
        ));
    }

    #[test]
    fn team_from_other_event_rejected() {
        let store = store();
        let home = saved_event(&store, "Home", "2024-01-01");
        let away = saved_event(&store, "Away", "2024-02-01");
        let stranger = saved_team(&store, away, "Ed", "Flo");

        let mut game = Game::new(home);
        game.team_one = Some(stranger);
        assert!(matches!(
            store.save_game(&mut game),
            Err(TourneyError::InvalidGame(_))
        ));
        assert!(game.id.is_none());
        assert!(store.event_games(home).expect("games").is_empty());
    }

    #[test]
    fn link_to_other_event_game_rejected() {
        let store = store();
        let home = saved_event(&store, "Home", "2024-01-01");
        let away = saved_event(&store, "Away", "2024-02-01");
        let mut away_game = Game::new(away);
        let away_game_id = store.save_game(&mut away_game).expect("away game");

        let mut game = Game::new(home);
        store.save_game(&mut game).expect("home game");
        game.win_game = Some(away_game_id);
        assert!(matches!(
            store.save_game(&mut game),
            Err(TourneyError::InvalidGame(_))
        ));

        let stored = store.event_games(home).expect("games");
        assert_eq!(stored[0].win_game, None);
    }

    #[test]
    fn deleting_team_clears_slots_and_winner() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let one = saved_team(&store, event_id, "Ann", "Bo");
        let two = saved_team(&store, event_id, "Cy", "Di");

        let mut game = Game::new(event_id);
        game.team_one = Some(one);
        game.team_two = Some(two);
        game.state = GameState::Complete;
        game.winner = Some(one);
        store.save_game(&mut game).expect("save");

        store.delete_team(one).expect("delete team");

        let games = store.event_games(event_id).expect("games");
        assert_eq!(games[0].team_one, None);
        assert_eq!(games[0].winner, None);
        assert_eq!(games[0].team_two, Some(two));
    }

    #[test]
    fn deleting_game_clears_links() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let mut target = Game::new(event_id);
        let target_id = store.save_game(&mut target).expect("target");
        let mut feeder = Game::new(event_id);
        feeder.win_game = Some(target_id);
        let feeder_id = store.save_game(&mut feeder).expect("feeder");

        store.delete_game(target_id).expect("delete");

        let games = store.event_games(event_id).expect("games");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, Some(feeder_id));
        assert_eq!(games[0].win_game, None);
    }

    #[test]
    fn deleting_event_cascades_to_games() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let team = saved_team(&store, event_id, "Ann", "Bo");
        let mut game = Game::new(event_id);
        game.team_one = Some(team);
        store.save_game(&mut game).expect("save");

        store.delete_event(event_id).expect("delete");

        assert!(store.event_games(event_id).expect("games").is_empty());
        assert!(store.event_teams(event_id).expect("teams").is_empty());
    }

    #[test]
    fn update_of_missing_game_fails() {
        let store = store();
        let event_id = saved_event(&store, "Open", "2024-01-01");
        let mut game = Game::new(event_id);
        game.id = Some(GameId(3));

        assert!(matches!(
            store.save_game(&mut game),
            Err(TourneyError::GameNotFound(GameId(3)))
        ));
        assert!(matches!(
            store.delete_game(GameId(3)),
            Err(TourneyError::GameNotFound(_))
        ));
    }
}
