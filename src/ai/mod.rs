pub mod client;
pub mod generator;

// Public API exports
pub use client::{
    DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, GenerativeService, ImageGeneration, ModelConfig,
    OpenRouterClient,
};
pub use generator::{fetch_quiz_item, VocabData};
