use crate::app::{App, Preview};
use crate::game::GameState;
use crate::models::QuizItem;
use crate::ui::layout::calculate_quiz_chunks;
use crate::ui::picture::Picture;
use crate::utils::{capitalize, truncate_string};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{draw_header, draw_help};

fn option_style(index: usize, item: &QuizItem, cursor: usize, selected: Option<usize>) -> Style {
    match selected {
        None if index == cursor => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        None => Style::default(),
        Some(_) if index == item.correct_option_index => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        Some(choice) if choice == index => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::CROSSED_OUT),
        Some(_) => Style::default().fg(Color::DarkGray),
    }
}

fn draw_option(
    f: &mut Frame,
    area: Rect,
    index: usize,
    item: &QuizItem,
    cursor: usize,
    selected: Option<usize>,
) {
    let style = option_style(index, item, cursor, selected);
    let mark = match selected {
        Some(_) if index == item.correct_option_index => " ✓",
        Some(choice) if choice == index => " ✗",
        _ => "",
    };
    let width = area.width.saturating_sub(8) as usize;
    let label = format!(
        "{}. {}{}",
        index + 1,
        truncate_string(&capitalize(&item.options[index]), width),
        mark
    );
    let option = Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    f.render_widget(option, area);
}

fn reveal_text(item: &QuizItem, selected: Option<usize>, score: u32) -> Text<'static> {
    let mut text = Text::default();
    let Some(choice) = selected else {
        text.push_line(Line::from(Span::styled(
            "Which fruit is this?",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        text.push_line(Line::from(""));
        text.push_line(Line::from("Pick one of the four names below."));
        text.push_line(Line::from(""));
        text.push_line(Line::from(format!("Score: {}", score)));
        return text;
    };

    let (verdict, color) = if item.is_correct(choice) {
        ("Correct!", Color::Green)
    } else {
        ("Not quite.", Color::Red)
    };
    text.push_line(Line::from(Span::styled(
        verdict,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        "Correct answer:",
        Style::default().fg(Color::DarkGray),
    )));
    text.push_line(Line::from(Span::styled(
        capitalize(&item.word),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        format!("\"{}\"", item.definition),
        Style::default().add_modifier(Modifier::ITALIC),
    )));
    text.push_line(Line::from(""));
    text.push_line(Line::from(format!("Score: {}", score)));
    text
}

pub fn draw_quiz(f: &mut Frame, app: &App) {
    let GameState::Playing {
        item,
        cursor,
        selected,
    } = app.game.state()
    else {
        return;
    };
    let session = app.game.session();
    let layout = calculate_quiz_chunks(f.area());

    draw_header(f, layout.header_area, app);

    let picture_block = Block::default().borders(Borders::ALL).title("Picture");
    let picture_inner = picture_block.inner(layout.picture_area);
    f.render_widget(picture_block, layout.picture_area);
    match &app.preview {
        Some(Preview::Ready(image)) => f.render_widget(Picture::new(image), picture_inner),
        _ => {
            let placeholder = Paragraph::new("(picture unavailable)")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(placeholder, picture_inner);
        }
    }

    let title = if selected.is_some() { "Answer" } else { "Question" };
    let reveal = Paragraph::new(reveal_text(item, *selected, session.score))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(reveal, layout.reveal_area);

    for (index, area) in layout.option_areas.iter().enumerate().take(item.options.len()) {
        draw_option(f, *area, index, item, *cursor, *selected);
    }

    if selected.is_some() {
        let next = if session.is_final_round() {
            "See results"
        } else {
            "Next question"
        };
        draw_help(
            f,
            layout.help_area,
            &[("Enter", next), ("h/Esc", "Home"), ("Ctrl+C", "Exit App")],
        );
    } else {
        draw_help(
            f,
            layout.help_area,
            &[
                ("←/→/↑/↓", "Move"),
                ("1-4", "Pick"),
                ("Enter", "Choose"),
                ("h/Esc", "Home"),
            ],
        );
    }
}
