//! # Terminal UI Rendering
//!
//! Draws the current page, the command row and any modal. Nothing here
//! changes application state except the list/table scroll positions that
//! ratatui keeps inside `ListState`/`TableState`.

use super::app::{App, Modal, Page};
use super::form::{FieldValue, Form, FormFocus};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};
use tourney_core::{Team, TeamId};

const CONFIRM_SIZE: (u16, u16) = (44, 6);

/// Draw one frame.
pub(crate) fn draw(frame: &mut Frame, app: &mut App) {
    let [main, command_row] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

    match app.page {
        Page::Events => draw_events(frame, main, app),
        Page::Details => draw_details(frame, main, app),
    }
    draw_command_row(frame, command_row, app);

    match &app.modal {
        Some(Modal::EventForm { form, .. }) | Some(Modal::TeamForm { form, .. }) => {
            draw_form(frame, main, form);
        }
        Some(Modal::Confirm { prompt, .. }) => draw_confirm(frame, main, prompt),
        None => {}
    }
}

// =============================================================================
// PAGES
// =============================================================================

fn draw_events(frame: &mut Frame, area: Rect, app: &mut App) {
    let [list_area, info_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(2)]).areas(area);

    let items: Vec<ListItem> = app
        .events
        .iter()
        .map(|event| ListItem::new(event.name.as_str()))
        .collect();
    let list = List::new(items)
        .block(Block::bordered().title("events"))
        .highlight_style(Style::new().reversed())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut app.event_state);

    let info: Vec<Line> = match app.selected_event() {
        Some(event) => vec![
            Line::from(event.name.as_str()),
            Line::from(event.date.as_str()),
            Line::from(event.style.label()),
        ],
        None => vec![Line::from("no events - press c to create one".dark_gray())],
    };
    frame.render_widget(
        Paragraph::new(info).block(Block::bordered().title("event info")),
        info_area,
    );
}

fn draw_details(frame: &mut Frame, area: Rect, app: &mut App) {
    let [teams_area, games_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    let teams_title = match app.current_event() {
        Some(event) => format!("teams - {}", event.name),
        None => "teams".to_string(),
    };
    let rows: Vec<Row> = app
        .teams
        .iter()
        .map(|team| {
            Row::new(vec![
                Cell::from(team.id.map(|id| id.to_string()).unwrap_or_default()),
                Cell::from(team.player_one.as_str()),
                Cell::from(team.player_two.as_str()),
            ])
        })
        .collect();
    let teams = Table::new(
        rows,
        [Constraint::Fill(1), Constraint::Fill(3), Constraint::Fill(3)],
    )
    .header(header(&["team id", "player one", "player two"]))
    .block(Block::bordered().title(teams_title))
    .row_highlight_style(Style::new().reversed());
    frame.render_stateful_widget(teams, teams_area, &mut app.team_state);

    let rows: Vec<Row> = app
        .games
        .iter()
        .map(|game| {
            Row::new(vec![
                Cell::from(game.id.map(|id| id.to_string()).unwrap_or_default()),
                Cell::from(team_label(&app.teams, game.team_one)),
                Cell::from(team_label(&app.teams, game.team_two)),
                Cell::from(game.state.label()),
                Cell::from(team_label(&app.teams, game.winner)),
            ])
        })
        .collect();
    let games = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(11),
            Constraint::Fill(2),
        ],
    )
    .header(header(&["game", "team one", "team two", "state", "winner"]))
    .block(Block::bordered().title("games"));
    frame.render_widget(games, games_area);
}

fn header(labels: &[&'static str]) -> Row<'static> {
    Row::new(labels.iter().map(|label| Cell::from(*label)))
        .style(Style::new().yellow().bold())
}

/// "one / two" for a known team, `#id` for one not loaded, `-` for none.
fn team_label(teams: &[Team], id: Option<TeamId>) -> String {
    let Some(id) = id else {
        return "-".to_string();
    };
    teams
        .iter()
        .find(|team| team.id == Some(id))
        .map(|team| format!("{} / {}", team.player_one, team.player_two))
        .unwrap_or_else(|| format!("#{}", id))
}

// =============================================================================
// COMMAND ROW
// =============================================================================

fn draw_command_row(frame: &mut Frame, area: Rect, app: &App) {
    let [commands_area, status_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    let mut spans = Vec::new();
    for (key, label) in app.commands() {
        spans.push(Span::styled(format!("{})", key), Style::new().yellow()));
        spans.push(Span::styled(format!(" {}   ", label), Style::new().white()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), commands_area);

    if let Some(status) = &app.status {
        frame.render_widget(
            Paragraph::new(Line::from(status.as_str()).right_aligned()),
            status_area,
        );
    }
}

// =============================================================================
// MODALS
// =============================================================================

/// Rect of the given size centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(middle);
    center
}

fn draw_form(frame: &mut Frame, area: Rect, form: &Form) {
    let rect = centered(area, form.width, form.height);
    let focus = form.focus();

    let mut lines = vec![Line::default()];
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = focus == FormFocus::Field(idx);
        let value = match &field.value {
            FieldValue::Text(text) if focused => format!("{}_", text),
            FieldValue::Text(text) => text.clone(),
            FieldValue::Choice { options, selected } => {
                format!("< {} >", options.get(*selected).copied().unwrap_or(""))
            }
        };
        let value_style = if focused {
            Style::new().reversed()
        } else {
            Style::new()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<11}", field.label), Style::new().yellow()),
            Span::styled(value, value_style),
        ]));
        lines.push(Line::default());
    }
    lines.push(
        Line::from(vec![
            button("Save", focus == FormFocus::Save),
            Span::raw("   "),
            button("Cancel", focus == FormFocus::Cancel),
        ])
        .centered(),
    );

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(form.title)),
        rect,
    );
}

fn button(label: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::new().reversed()
    } else {
        Style::new()
    };
    Span::styled(format!("[ {} ]", label), style)
}

fn draw_confirm(frame: &mut Frame, area: Rect, prompt: &str) {
    let (width, height) = CONFIRM_SIZE;
    let rect = centered(area, width, height);

    let lines = vec![
        Line::from(prompt.to_string()),
        Line::default(),
        Line::from(vec![
            Span::styled("y)", Style::new().yellow()),
            Span::raw(" yes   "),
            Span::styled("n)", Style::new().yellow()),
            Span::raw(" no"),
        ])
        .centered(),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title("Confirm")),
        rect,
    );
}

// =============================================================================
// TESTS
// =============================================================================
