use crate::ai::client::{GenerativeService, ImageGeneration};
use crate::error::GenerationError;
use crate::models::{Difficulty, OPTION_COUNT, QuizItem};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str =
    "You are an English vocabulary tutor building picture quizzes about fruit. Respond only with JSON.";

fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    // A '}' before the first '{' leaves nothing to extract; serde reports it.
    if let Some(start) = cleaned.find('{')
        && let Some(end) = cleaned.rfind('}')
        && let Some(object) = cleaned.get(start..=end)
    {
        cleaned = object.to_string();
    }

    cleaned.trim().to_string()
}

/// JSON schema the text stage must satisfy.
pub fn quiz_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "word": { "type": "string" },
            "definition": { "type": "string" },
            "options": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": OPTION_COUNT,
                "maxItems": OPTION_COUNT
            },
            "correctOptionIndex": { "type": "integer", "minimum": 0, "maximum": OPTION_COUNT - 1 }
        },
        "required": ["word", "definition", "options", "correctOptionIndex"],
        "additionalProperties": false
    })
}

fn difficulty_prompt(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => {
            "Focus on common, everyday fruits (e.g., Apple, Banana, Orange, Mango, Grape, Strawberry, Watermelon, Pineapple, Peach, Pear, Cherry, Lemon, Coconut)."
        }
        Difficulty::Advanced => {
            "Focus on slightly more specific or tropical fruits (e.g., Durian, Dragonfruit, Mangosteen, Passion fruit, Lychee, Pomegranate, Persimmon, Guava, Jackfruit, Fig, Kiwi, Avocado, Papaya)."
        }
    }
}

pub fn build_vocab_prompt(difficulty: Difficulty, excluded_words: &[String]) -> String {
    let exclusion_list = excluded_words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ");

    let exclusion_prompt = if excluded_words.is_empty() {
        String::new()
    } else {
        format!(
            "IMPORTANT: The following fruits have ALREADY been used: [{}]. You MUST pick a DIFFERENT fruit. Do NOT use any fruit from this list.",
            exclusion_list
        )
    };

    let schema = serde_json::to_string_pretty(&quiz_schema()).unwrap_or_default();

    format!(
        r#"Generate a single English vocabulary quiz item specifically about a FRUIT.

Task:
1. Select a target fruit.
2. {difficulty}
3. {exclusion}
4. Provide a very simple, clear English definition (suitable for beginners).
5. Provide {count} options (English fruit names). One is the target fruit, three are distractors.
6. Mark the correct index.

Strict Constraints:
- Target word MUST be a botanical fruit.
- No vegetables (no tomato, no cucumber, no pumpkin).
- Target word MUST NOT be in the excluded list: [{excluded}].

Respond ONLY with a JSON object matching this schema (no markdown, no extra text):
{schema}
"#,
        difficulty = difficulty_prompt(difficulty),
        exclusion = exclusion_prompt,
        count = OPTION_COUNT,
        excluded = exclusion_list,
        schema = schema,
    )
}

pub fn build_image_prompt(word: &str) -> String {
    format!(
        "A cute, colorful, vector-art style icon of a {} (fruit). White background. Minimalist design. High contrast. No text, no labels. Just the fruit.",
        word
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VocabDraft {
    word: String,
    definition: String,
    options: Vec<String>,
    correct_option_index: i64,
}

/// Text-stage output: a quiz item that is still waiting for its image.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabData {
    pub word: String,
    pub definition: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}

pub fn parse_vocab_response(response: &str) -> Result<VocabData, GenerationError> {
    let cleaned = clean_json_response(response);
    let draft: VocabDraft = serde_json::from_str(&cleaned)
        .map_err(|e| GenerationError::Schema(format!("{}\nRaw: {}", e, response)))?;

    let options: Vec<String> = draft.options.iter().map(|o| o.trim().to_string()).collect();
    if options.len() != OPTION_COUNT {
        return Err(GenerationError::Schema(format!(
            "expected {} options, got {}",
            OPTION_COUNT,
            options.len()
        )));
    }
    if options.iter().any(|o| o.is_empty()) {
        return Err(GenerationError::schema("blank option"));
    }
    for (i, option) in options.iter().enumerate() {
        if options[..i].iter().any(|o| o.eq_ignore_ascii_case(option)) {
            return Err(GenerationError::Schema(format!(
                "duplicate option '{}'",
                option
            )));
        }
    }

    let word = draft.word.trim();
    if word.is_empty() {
        return Err(GenerationError::schema("blank word"));
    }
    if draft.definition.trim().is_empty() {
        return Err(GenerationError::schema("blank definition"));
    }
    if !(0..OPTION_COUNT as i64).contains(&draft.correct_option_index) {
        return Err(GenerationError::Schema(format!(
            "correctOptionIndex {} out of range",
            draft.correct_option_index
        )));
    }

    // The option text is canonical; the index follows the word.
    let index = options
        .iter()
        .position(|o| o.eq_ignore_ascii_case(word))
        .ok_or_else(|| {
            GenerationError::Schema(format!("word '{}' is not among the options", word))
        })?;
    if index as i64 != draft.correct_option_index {
        warn!(
            word,
            claimed = draft.correct_option_index,
            actual = index,
            "correctOptionIndex disagreed with options, using the word's position"
        );
    }

    Ok(VocabData {
        word: options[index].clone(),
        definition: draft.definition.trim().to_string(),
        options,
        correct_option_index: index,
    })
}

/// Base64 payload of a `data:<mime>;base64,<payload>` URL.
fn inline_payload(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") || payload.is_empty() {
        return None;
    }
    Some(payload)
}

/// First inline image across all candidates, in response order.
pub fn extract_first_image(response: &ImageGeneration) -> Option<String> {
    response
        .choices
        .iter()
        .flat_map(|choice| choice.message.image_urls())
        .filter_map(inline_payload)
        .find(|payload| STANDARD.decode(payload).is_ok())
        .map(str::to_string)
}

pub async fn generate_vocab_data<S: GenerativeService + ?Sized>(
    service: &S,
    difficulty: Difficulty,
    excluded_words: &[String],
) -> Result<VocabData, GenerationError> {
    let prompt = build_vocab_prompt(difficulty, excluded_words);
    let raw = service
        .generate_text(SYSTEM_PROMPT, &prompt, &quiz_schema())
        .await?;
    debug!(raw = %raw, "text stage response");
    parse_vocab_response(&raw)
}

pub async fn generate_vocab_image<S: GenerativeService + ?Sized>(
    service: &S,
    word: &str,
) -> Result<String, GenerationError> {
    let response = service.generate_image(&build_image_prompt(word)).await?;
    extract_first_image(&response).ok_or(GenerationError::ImageMissing)
}

/// Produce one complete quiz item: text stage, then image stage for the chosen word.
pub async fn fetch_quiz_item<S: GenerativeService + ?Sized>(
    service: &S,
    difficulty: Difficulty,
    excluded_words: &[String],
) -> Result<QuizItem, GenerationError> {
    info!(?difficulty, excluded = excluded_words.len(), "generating quiz item");

    let vocab = generate_vocab_data(service, difficulty, excluded_words).await?;
    if excluded_words
        .iter()
        .any(|w| w.trim().eq_ignore_ascii_case(&vocab.word))
    {
        warn!(word = %vocab.word, "service repeated an excluded word");
    }

    let image = generate_vocab_image(service, &vocab.word).await?;
    info!(word = %vocab.word, image_len = image.len(), "quiz item ready");

    Ok(QuizItem {
        word: vocab.word,
        options: vocab.options,
        correct_option_index: vocab.correct_option_index,
        definition: vocab.definition,
        image_base64: Some(image),
    })
}

/// In-memory service for tests: scripted text replies and image replies,
/// with every prompt recorded.
#[cfg(test)]
pub struct MockService {
    texts: std::sync::Mutex<std::collections::VecDeque<Result<String, GenerationError>>>,
    images: std::sync::Mutex<std::collections::VecDeque<Result<ImageGeneration, GenerationError>>>,
    pub prompts: std::sync::Mutex<Vec<String>>,
    pub schemas: std::sync::Mutex<Vec<serde_json::Value>>,
}

#[cfg(test)]
impl MockService {
    pub fn new() -> Self {
        Self {
            texts: Default::default(),
            images: Default::default(),
            prompts: Default::default(),
            schemas: Default::default(),
        }
    }

    pub fn with_text(self, reply: Result<String, GenerationError>) -> Self {
        self.texts.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_image(self, reply: Result<ImageGeneration, GenerationError>) -> Self {
        self.images.lock().unwrap().push_back(reply);
        self
    }

    pub fn image_reply(url: &str) -> ImageGeneration {
        serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "images": [{ "type": "image_url", "image_url": { "url": url } }] } }]
        }))
        .unwrap()
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl GenerativeService for MockService {
    async fn generate_text(
        &self,
        _system: &str,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.schemas.lock().unwrap().push(schema.clone());
        self.texts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::transport("no scripted text reply")))
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageGeneration, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.images
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::transport("no scripted image reply")))
    }
}
