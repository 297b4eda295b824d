//! # Terminal UI State
//!
//! `App` owns the store and everything the screen shows. Key presses are
//! turned into store calls here; rendering lives in `ui`.
//!
//! ## Views
//!
//! - **Events page**: list of events beside an info pane for the selection
//! - **Details page**: teams of the opened event beside its games
//! - **Modal**: a create/edit form or a delete confirmation, floating over
//!   either page and taking every key until it closes
//!
//! Store failures never end the session: they are logged and shown in the
//! command row, and a form whose save failed stays open.

use super::form::{Form, FormAction};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::{ListState, TableState};
use tourney_core::{
    Event, EventId, EventStyle, Game, SqliteStore, Team, TeamId, TourneyError,
};

/// Commands shown on the events page, sorted by key.
pub(crate) const EVENT_COMMANDS: &[(char, &str)] =
    &[('c', "create new"), ('e', "edit"), ('x', "delete")];

/// Commands shown on the details page, sorted by key.
pub(crate) const TEAM_COMMANDS: &[(char, &str)] = &[
    ('c', "add new"),
    ('e', "edit"),
    ('g', "generate games"),
    ('x', "delete"),
];

const EVENT_FORM_SIZE: (u16, u16) = (40, 15);
const TEAM_FORM_SIZE: (u16, u16) = (40, 10);

const EVENT_NAME: usize = 0;
const EVENT_DATE: usize = 1;
const EVENT_STYLE: usize = 2;
const TEAM_PLAYER_ONE: usize = 0;
const TEAM_PLAYER_TWO: usize = 1;

/// Which page is showing under any modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Events,
    Details,
}

/// Row a confirmation dialog will delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeleteTarget {
    Event(EventId),
    Team(TeamId),
}

/// Dialog floating over the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Modal {
    /// Create (`editing == None`) or edit an event.
    EventForm {
        form: Form,
        editing: Option<EventId>,
    },
    /// Create (`editing == None`) or edit a team of the open event.
    TeamForm {
        form: Form,
        editing: Option<TeamId>,
    },
    Confirm {
        prompt: String,
        target: DeleteTarget,
    },
}

/// Terminal UI state.
pub(crate) struct App {
    store: SqliteStore,
    pub(crate) page: Page,
    pub(crate) modal: Option<Modal>,
    pub(crate) events: Vec<Event>,
    pub(crate) event_state: ListState,
    /// Event whose teams and games are loaded.
    pub(crate) open_event: Option<EventId>,
    pub(crate) teams: Vec<Team>,
    pub(crate) team_state: TableState,
    pub(crate) games: Vec<Game>,
    /// Last message for the command row.
    pub(crate) status: Option<String>,
    running: bool,
}

impl App {
    /// Load the event list and start on the events page.
    pub(crate) fn new(store: SqliteStore) -> Result<Self, TourneyError> {
        let mut app = Self {
            store,
            page: Page::Events,
            modal: None,
            events: Vec::new(),
            event_state: ListState::default(),
            open_event: None,
            teams: Vec::new(),
            team_state: TableState::default(),
            games: Vec::new(),
            status: None,
            running: true,
        };
        app.reload_events()?;
        Ok(app)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn selected_event(&self) -> Option<&Event> {
        self.event_state.selected().and_then(|i| self.events.get(i))
    }

    pub(crate) fn selected_team(&self) -> Option<&Team> {
        self.team_state.selected().and_then(|i| self.teams.get(i))
    }

    /// The event whose details page is open.
    pub(crate) fn current_event(&self) -> Option<&Event> {
        self.open_event
            .and_then(|id| self.events.iter().find(|e| e.id == Some(id)))
    }

    /// Commands for the page currently showing.
    pub(crate) fn commands(&self) -> &'static [(char, &'static str)] {
        match self.page {
            Page::Events => EVENT_COMMANDS,
            Page::Details => TEAM_COMMANDS,
        }
    }

    // =========================================================================
    // KEY DISPATCH
    // =========================================================================

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        if let Some(modal) = self.modal.take() {
            self.handle_modal_key(modal, key);
            return;
        }

        // Page commands are plain keys; chords are left to the terminal.
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }

        match self.page {
            Page::Events => self.handle_events_key(key),
            Page::Details => self.handle_details_key(key),
        }
    }

    fn handle_events_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Up | KeyCode::Char('k') => {
                let next = step(self.event_state.selected(), self.events.len(), false);
                self.event_state.select(next);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let next = step(self.event_state.selected(), self.events.len(), true);
                self.event_state.select(next);
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_event().and_then(|e| e.id) {
                    self.open_details(id);
                }
            }
            KeyCode::Char('c') => {
                self.modal = Some(Modal::EventForm {
                    form: event_form("New Event", &Event::default()),
                    editing: None,
                });
            }
            KeyCode::Char('e') => {
                if let Some(event) = self.selected_event() {
                    self.modal = Some(Modal::EventForm {
                        form: event_form("Edit Event", event),
                        editing: event.id,
                    });
                }
            }
            KeyCode::Char('x') => {
                if let Some(event) = self.selected_event()
                    && let Some(id) = event.id
                {
                    self.modal = Some(Modal::Confirm {
                        prompt: format!("Delete event \"{}\" and all of its teams?", event.name),
                        target: DeleteTarget::Event(id),
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_details_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.page = Page::Events;
                self.open_event = None;
                self.teams.clear();
                self.games.clear();
                self.team_state.select(None);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let next = step(self.team_state.selected(), self.teams.len(), false);
                self.team_state.select(next);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let next = step(self.team_state.selected(), self.teams.len(), true);
                self.team_state.select(next);
            }
            KeyCode::Char('c') => {
                self.modal = Some(Modal::TeamForm {
                    form: team_form("New Team", "", ""),
                    editing: None,
                });
            }
            KeyCode::Char('e') => {
                if let Some(team) = self.selected_team() {
                    self.modal = Some(Modal::TeamForm {
                        form: team_form("Edit Team", &team.player_one, &team.player_two),
                        editing: team.id,
                    });
                }
            }
            KeyCode::Char('x') => {
                if let Some(team) = self.selected_team()
                    && let Some(id) = team.id
                {
                    self.modal = Some(Modal::Confirm {
                        prompt: format!("Delete team {}?", id),
                        target: DeleteTarget::Team(id),
                    });
                }
            }
            KeyCode::Char('g') => {
                self.status = Some("game generation is not implemented yet".to_string());
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, modal: Modal, key: KeyEvent) {
        match modal {
            Modal::EventForm { mut form, editing } => match form.handle_key(key) {
                FormAction::Pending => self.modal = Some(Modal::EventForm { form, editing }),
                FormAction::Cancel => {}
                FormAction::Submit => {
                    let event = Event {
                        id: editing,
                        name: form.text(EVENT_NAME),
                        style: EventStyle::ALL
                            .get(form.choice(EVENT_STYLE))
                            .copied()
                            .unwrap_or_default(),
                        date: form.text(EVENT_DATE),
                    };
                    if let Err(e) = self.save_event(event) {
                        self.report(&e);
                        self.modal = Some(Modal::EventForm { form, editing });
                    }
                }
            },
            Modal::TeamForm { mut form, editing } => match form.handle_key(key) {
                FormAction::Pending => self.modal = Some(Modal::TeamForm { form, editing }),
                FormAction::Cancel => {}
                FormAction::Submit => {
                    let result = match self.open_event {
                        Some(event_id) => {
                            let team = Team {
                                id: editing,
                                event_id,
                                player_one: form.text(TEAM_PLAYER_ONE),
                                player_two: form.text(TEAM_PLAYER_TWO),
                            };
                            self.save_team(team)
                        }
                        None => Err(TourneyError::InvalidTeam("no event is open".to_string())),
                    };
                    if let Err(e) = result {
                        self.report(&e);
                        self.modal = Some(Modal::TeamForm { form, editing });
                    }
                }
            },
            Modal::Confirm { prompt, target } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    if let Err(e) = self.delete(target) {
                        self.report(&e);
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => {}
                _ => self.modal = Some(Modal::Confirm { prompt, target }),
            },
        }
    }

    // =========================================================================
    // STORE OPERATIONS
    // =========================================================================

    /// Write the event. An `Err` means nothing was stored; once the row is
    /// written a failed list refresh is only reported.
    fn save_event(&mut self, mut event: Event) -> Result<(), TourneyError> {
        let id = self.store.save_event(&mut event)?;
        tracing::info!("Saved event {} ({})", id, event.name);
        self.status = Some(format!("saved event \"{}\"", event.name));

        match self.reload_events() {
            Ok(()) => self
                .event_state
                .select(self.events.iter().position(|e| e.id == Some(id))),
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    /// Write the team, with the same contract as `save_event`.
    fn save_team(&mut self, mut team: Team) -> Result<(), TourneyError> {
        let id = self.store.save_team(&mut team)?;
        tracing::info!("Saved team {} in event {}", id, team.event_id);
        self.status = Some(format!("saved team {}", id));

        match self.load_details(team.event_id) {
            Ok(()) => self
                .team_state
                .select(self.teams.iter().position(|t| t.id == Some(id))),
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    fn delete(&mut self, target: DeleteTarget) -> Result<(), TourneyError> {
        match target {
            DeleteTarget::Event(id) => {
                self.store.delete_event(id)?;
                tracing::info!("Deleted event {}", id);
                self.reload_events()?;
                self.status = Some(format!("deleted event {}", id));
            }
            DeleteTarget::Team(id) => {
                self.store.delete_team(id)?;
                tracing::info!("Deleted team {}", id);
                if let Some(event_id) = self.open_event {
                    self.load_details(event_id)?;
                }
                self.status = Some(format!("deleted team {}", id));
            }
        }
        Ok(())
    }

    fn open_details(&mut self, event_id: EventId) {
        match self.load_details(event_id) {
            Ok(()) => {
                self.open_event = Some(event_id);
                self.page = Page::Details;
            }
            Err(e) => self.report(&e),
        }
    }

    fn load_details(&mut self, event_id: EventId) -> Result<(), TourneyError> {
        self.teams = self.store.event_teams(event_id)?;
        self.games = self.store.event_games(event_id)?;
        self.team_state
            .select(clamp(self.team_state.selected(), self.teams.len()));
        Ok(())
    }

    fn reload_events(&mut self) -> Result<(), TourneyError> {
        self.events = self.store.list_events()?;
        self.event_state
            .select(clamp(self.event_state.selected(), self.events.len()));
        Ok(())
    }

    fn report(&mut self, err: &TourneyError) {
        tracing::error!("{}", err);
        self.status = Some(err.to_string());
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn event_form(title: &'static str, event: &Event) -> Form {
    let (width, height) = EVENT_FORM_SIZE;
    Form::new(title, width, height)
        .with_text("Name", event.name.as_str())
        .with_text("Date", event.date.as_str())
        .with_choice(
            "Style",
            EventStyle::ALL.iter().map(|s| s.label()).collect(),
            event.style.index(),
        )
}

fn team_form(title: &'static str, player_one: &str, player_two: &str) -> Form {
    let (width, height) = TEAM_FORM_SIZE;
    Form::new(title, width, height)
        .with_text("Player One", player_one)
        .with_text("Player Two", player_two)
}

/// Move a selection one row, stopping at either end.
fn step(selected: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        None => 0,
        Some(i) if forward => (i + 1).min(len - 1),
        Some(i) => i.saturating_sub(1),
    })
}

/// Keep a selection inside a list of `len` rows, selecting the first row of
/// a non-empty list.
fn clamp(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(selected.unwrap_or(0).min(len - 1))
    }
}

// =============================================================================
// TESTS
// =============================================================================
