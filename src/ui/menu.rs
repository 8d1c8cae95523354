use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::ai::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::app::App;
use crate::config::API_KEY_VAR;
use crate::models::{Difficulty, TOTAL_ROUNDS};

use super::layout::calculate_screen_chunks;
use super::{draw_header, draw_help};

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Beginner => Color::Green,
        Difficulty::Advanced => Color::Magenta,
    }
}

pub fn draw_menu(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(4),
        ])
        .split(layout.content_area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Learn English fruit names!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} picture questions are waiting for you.",
            TOTAL_ROUNDS
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default());
    f.render_widget(intro, chunks[0]);

    let items: Vec<ListItem> = Difficulty::ALL
        .iter()
        .enumerate()
        .map(|(i, difficulty)| {
            let selected = i == app.menu_index;
            let marker = if selected { "> " } else { "  " };
            let name_style = if selected {
                Style::default()
                    .fg(difficulty_color(*difficulty))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::from(marker),
                    Span::styled(format!("[{}] {}", i + 1, difficulty.label()), name_style),
                ]),
                Line::from(Span::styled(
                    format!("      {}", difficulty.sample()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Choose a level"),
    );
    f.render_widget(list, chunks[1]);

    let ai_status_content = if app.ai_enabled {
        vec![
            Line::from("AI: Enabled"),
            Line::from(format!(
                "Models: {} / {}",
                DEFAULT_TEXT_MODEL, DEFAULT_IMAGE_MODEL
            )),
        ]
    } else {
        vec![
            Line::from("AI: Disabled"),
            Line::from(format!("Set {}", API_KEY_VAR)),
        ]
    };

    let ai_status = Paragraph::new(ai_status_content)
        .style(
            Style::default()
                .fg(if app.ai_enabled {
                    Color::Green
                } else {
                    Color::Yellow
                })
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("AI Status"));
    f.render_widget(ai_status, chunks[2]);

    draw_help(
        f,
        layout.footer_area,
        &[
            ("↑/↓", "Navigate"),
            ("1/2", "Quick start"),
            ("Enter", "Start"),
            ("q/Esc", "Quit"),
        ],
    );
}
