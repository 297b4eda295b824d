//! # Terminal UI
//!
//! Interactive event and team manager. Runs on the calling thread until the
//! user quits; the terminal is restored on every exit path.

mod app;
mod form;
mod ui;

use app::App;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event as TermEvent};
use tourney_core::{SqliteStore, TourneyError};

/// Take over the terminal and run until the user quits.
pub fn run(store: SqliteStore) -> Result<(), TourneyError> {
    let mut app = App::new(store)?;
    let mut terminal = ratatui::try_init()
        .map_err(|e| TourneyError::Io(format!("Cannot start terminal UI: {}", e)))?;
    tracing::info!("Terminal UI started");

    let result = event_loop(&mut terminal, &mut app);

    ratatui::restore();
    tracing::info!("Terminal UI stopped");
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<(), TourneyError> {
    while app.is_running() {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .map_err(|e| TourneyError::Io(format!("Cannot draw: {}", e)))?;

        // Resizes only need the redraw at the top of the loop.
        if let TermEvent::Key(key) =
            event::read().map_err(|e| TourneyError::Io(format!("Cannot read input: {}", e)))?
        {
            app.handle_key(key);
        }
    }
    Ok(())
}
