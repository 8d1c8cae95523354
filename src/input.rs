use crate::app::App;
use crate::game::{CursorMove, GameState};
use crate::models::{Difficulty, FetchRequest};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press onto the game. Returns a fetch the caller must dispatch.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<FetchRequest> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    match app.game.state() {
        GameState::Menu => match key.code {
            KeyCode::Up => {
                app.menu_index = app.menu_index.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if app.menu_index < Difficulty::ALL.len() - 1 {
                    app.menu_index += 1;
                }
                None
            }
            KeyCode::Char(c @ ('1' | '2')) => {
                app.menu_index = c as usize - '1' as usize;
                let difficulty = app.selected_difficulty();
                app.game.start(difficulty)
            }
            KeyCode::Enter => {
                let difficulty = app.selected_difficulty();
                app.game.start(difficulty)
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                app.should_quit = true;
                None
            }
            _ => None,
        },
        GameState::Loading { .. } => match key.code {
            KeyCode::Char('h') | KeyCode::Esc => {
                app.go_home();
                None
            }
            _ => None,
        },
        GameState::Playing {
            cursor, selected, ..
        } => {
            let (cursor, revealed) = (*cursor, selected.is_some());
            match key.code {
                KeyCode::Left => {
                    app.game.move_cursor(CursorMove::Left);
                    None
                }
                KeyCode::Right => {
                    app.game.move_cursor(CursorMove::Right);
                    None
                }
                KeyCode::Up => {
                    app.game.move_cursor(CursorMove::Up);
                    None
                }
                KeyCode::Down => {
                    app.game.move_cursor(CursorMove::Down);
                    None
                }
                KeyCode::Char(c @ '1'..='4') => {
                    app.game.select(c as usize - '1' as usize);
                    None
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if revealed {
                        app.preview = None;
                        app.game.confirm()
                    } else {
                        app.game.select(cursor);
                        None
                    }
                }
                KeyCode::Char('h') | KeyCode::Esc => {
                    app.go_home();
                    None
                }
                _ => None,
            }
        }
        GameState::GameOver => match key.code {
            KeyCode::Char('r') | KeyCode::Enter => {
                let difficulty = app.game.difficulty();
                app.game.start(difficulty)
            }
            KeyCode::Char('h') | KeyCode::Esc => {
                app.go_home();
                None
            }
            KeyCode::Char('q') => {
                app.should_quit = true;
                None
            }
            _ => None,
        },
        GameState::Error { .. } => match key.code {
            KeyCode::Char('r') | KeyCode::Enter => app.game.retry(),
            KeyCode::Char('h') | KeyCode::Esc => {
                app.go_home();
                None
            }
            _ => None,
        },
    }
}
