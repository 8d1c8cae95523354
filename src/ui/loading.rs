use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

use super::layout::{calculate_screen_chunks, centered_rect};
use super::{draw_header, draw_help};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

pub fn draw_loading(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, app);

    let area = centered_rect(layout.content_area, 44, 5);
    let text = vec![
        Line::from(Span::styled(
            format!("{} Finding a fruit...", spinner_frame(app.tick)),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Preparing your next word and picture",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default());
    f.render_widget(body, area);

    draw_help(f, layout.footer_area, &[("h/Esc", "Home"), ("Ctrl+C", "Exit App")]);
}

pub fn draw_error(f: &mut Frame, app: &App, message: &str) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Length(3), Constraint::Length(5)])
        .split(layout.content_area);

    let title = Paragraph::new("Oops! Something went wrong.")
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    draw_help(
        f,
        layout.footer_area,
        &[("r/Enter", "Try again"), ("h/Esc", "Back to menu"), ("Ctrl+C", "Exit App")],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_frame(0), spinner_frame(8));
        assert_ne!(spinner_frame(0), spinner_frame(1));
    }
}
