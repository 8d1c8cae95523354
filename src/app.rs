use crate::game::{Game, GameState};
use crate::models::{Difficulty, FetchResponse};
use crate::utils::decode_thumbnail;
use image::RgbImage;
use tracing::warn;

/// Longest side of the decoded preview, in pixels.
pub const PREVIEW_MAX_SIDE: u32 = 96;

/// Terminal rendition of the current round's picture.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Ready(RgbImage),
    Unavailable,
}

/// Everything the event loop owns: the game plus the bits of screen state
/// that are not part of the game rules.
#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub menu_index: usize,
    pub ai_enabled: bool,
    pub tick: u64,
    pub preview: Option<Preview>,
    pub should_quit: bool,
}

impl App {
    pub fn new(ai_enabled: bool) -> Self {
        Self {
            game: Game::new(),
            menu_index: 0,
            ai_enabled,
            tick: 0,
            preview: None,
            should_quit: false,
        }
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        Difficulty::ALL[self.menu_index.min(Difficulty::ALL.len() - 1)]
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Apply a worker reply and, when it starts a round, decode its picture once.
    pub fn apply_response(&mut self, response: FetchResponse) -> bool {
        if !self.game.apply_fetch(response) {
            return false;
        }
        self.preview = match self.game.state() {
            GameState::Playing { item, .. } => Some(match item.image_base64.as_deref() {
                Some(payload) => match decode_thumbnail(payload, PREVIEW_MAX_SIDE) {
                    Ok(img) => Preview::Ready(img),
                    Err(e) => {
                        warn!(word = %item.word, error = %e, "could not decode quiz image");
                        Preview::Unavailable
                    }
                },
                None => Preview::Unavailable,
            }),
            _ => None,
        };
        true
    }

    pub fn go_home(&mut self) {
        self.game.go_home();
        self.preview = None;
    }
}
