use crate::app::App;
use crate::models::Verdict;
use crate::utils::capitalize;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::layout::calculate_screen_chunks;
use super::{draw_header, draw_help};

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Perfect => Color::Yellow,
        Verdict::Excellent => Color::Magenta,
        Verdict::Good => Color::Blue,
        Verdict::KeepPracticing => Color::Gray,
    }
}

pub fn draw_summary(f: &mut Frame, app: &App) {
    let Some(summary) = app.game.summary() else {
        return;
    };
    let session = app.game.session();
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(5), Constraint::Min(3)])
        .split(layout.content_area);

    let color = verdict_color(summary.verdict);
    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            summary.verdict.title(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(summary.verdict.message()),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let stats = Paragraph::new(vec![
        Line::from(vec![
            Span::from("Correct answers: "),
            Span::styled(
                format!("{} / {}", summary.correct_answers, summary.total_rounds),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::from("Total score: "),
            Span::styled(
                summary.score.to_string(),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::from("Accuracy: "),
            Span::styled(
                format!("{}%", summary.percentage),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(stats, chunks[1]);

    let mut rounds = Text::default();
    for (i, record) in session.history.iter().enumerate() {
        let (mark, style) = if record.correct {
            ("[✓]", Style::default().fg(Color::Green))
        } else {
            ("[✗]", Style::default().fg(Color::Red))
        };
        rounds.push_line(Line::from(vec![
            Span::styled(mark, style),
            Span::from(format!(" {:>2}. {}", i + 1, capitalize(&record.word))),
        ]));
    }
    let rounds = Paragraph::new(rounds)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Words"));
    f.render_widget(rounds, chunks[2]);

    draw_help(
        f,
        layout.footer_area,
        &[("r/Enter", "Play again"), ("h/Esc", "Home"), ("q", "Quit")],
    );
}
