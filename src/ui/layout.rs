use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuizLayout {
    pub header_area: Rect,
    pub picture_area: Rect,
    pub reveal_area: Rect,
    /// Option cells in grid order: top-left, top-right, bottom-left, bottom-right.
    pub option_areas: [Rect; 4],
    pub help_area: Rect,
}

pub struct ScreenLayout {
    pub header_area: Rect,
    pub content_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_screen_chunks(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    ScreenLayout {
        header_area: chunks[0],
        content_area: chunks[1],
        footer_area: chunks[2],
    }
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(chunks[2]);
    let split_row = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row)
    };
    let top = split_row(rows[0]);
    let bottom = split_row(rows[1]);

    QuizLayout {
        header_area: chunks[0],
        picture_area: body[0],
        reveal_area: body[1],
        option_areas: [top[0], top[1], bottom[0], bottom[1]],
        help_area: chunks[3],
    }
}

/// A `width` x `height` rectangle centred in `area`, clipped to it.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_quiz_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.help_area.height, 3);
        assert!(layout.picture_area.height >= 8);
        assert_eq!(layout.picture_area.height, layout.reveal_area.height);
        for cell in layout.option_areas {
            assert_eq!(cell.height, 3);
        }
        assert_eq!(layout.option_areas[0].y, layout.option_areas[1].y);
        assert!(layout.option_areas[2].y > layout.option_areas[0].y);
        assert!(layout.option_areas[1].x > layout.option_areas[0].x);
    }

    #[test]
    fn test_screen_layout() {
        let area = Rect::new(0, 0, 80, 30);
        let layout = calculate_screen_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.footer_area.height, 3);
        // margin 1 on each side: 28 rows left, minus header and footer
        assert_eq!(layout.content_area.height, 22);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(10, 10, 20, 10);
        assert_eq!(centered_rect(area, 10, 4), Rect::new(15, 13, 10, 4));
        assert_eq!(centered_rect(area, 50, 50), area);
    }
}
