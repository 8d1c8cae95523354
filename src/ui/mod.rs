pub mod layout;
mod loading;
mod menu;
pub mod picture;
mod quiz;
mod summary;

use crate::app::App;
use crate::game::GameState;
use crate::models::TOTAL_ROUNDS;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub use layout::{calculate_quiz_chunks, calculate_screen_chunks};
pub use loading::{draw_error, draw_loading};
pub use menu::draw_menu;
pub use quiz::draw_quiz;
pub use summary::draw_summary;

pub fn draw(f: &mut Frame, app: &App) {
    match app.game.state() {
        GameState::Menu => draw_menu(f, app),
        GameState::Loading { .. } => draw_loading(f, app),
        GameState::Playing { .. } => draw_quiz(f, app),
        GameState::GameOver => draw_summary(f, app),
        GameState::Error { message, .. } => draw_error(f, app, message),
    }
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// One help line from (key, action) pairs.
pub(crate) fn help_line(keys: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in keys.iter().enumerate() {
        spans.push(Span::styled(key.to_string(), key_style()));
        let sep = if i + 1 < keys.len() { "  " } else { "" };
        spans.push(Span::from(format!(" {}{}", action, sep)));
    }
    Line::from(spans)
}

pub(crate) fn draw_help(f: &mut Frame, area: Rect, keys: &[(&str, &str)]) {
    let help = Paragraph::new(help_line(keys))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

/// Title bar: app name on the left, where the player is on the right.
pub(crate) fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let title = Paragraph::new("Fruit Master").style(
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(title, halves[0]);

    let position = match app.game.state() {
        GameState::Menu => "HOME".to_string(),
        GameState::GameOver => "RESULTS".to_string(),
        _ => format!(
            "ROUND {}/{}",
            app.game.session().current_round,
            TOTAL_ROUNDS
        ),
    };
    let position = Paragraph::new(position)
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Right);
    f.render_widget(position, halves[1]);
}
