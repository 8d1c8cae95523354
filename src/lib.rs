pub mod ai;
pub mod ai_worker;
pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod logger;
pub mod models;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use ai::{GenerativeService, OpenRouterClient, fetch_quiz_item};
pub use app::App;
pub use config::AppConfig;
pub use error::GenerationError;
pub use game::{Game, GameState};
pub use input::handle_key;
pub use models::{Difficulty, GameSession, QuizItem, RoundRecord};
