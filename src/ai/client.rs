use crate::config::AppConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use openrouter_api::{
    api::request::ResponseFormatConfig,
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    models::structured::{JsonSchemaConfig, JsonSchemaDefinition},
    types::chat::{ChatCompletionRequest, Message},
};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TEXT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.9;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

const CHAT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const QUIZ_SCHEMA_NAME: &str = "quiz_item";

#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn text() -> Self {
        Self {
            model: DEFAULT_TEXT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }

    pub fn image() -> Self {
        Self {
            model: DEFAULT_IMAGE_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// The two generative capabilities the quiz needs.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Run a text completion constrained to `schema` and return the raw text
    /// of the first choice.
    async fn generate_text(
        &self,
        system: &str,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GenerationError>;

    /// Run an image-producing completion and return the decoded response body.
    async fn generate_image(&self, prompt: &str) -> Result<ImageGeneration, GenerationError>;
}

/// Absent and `null` both read as the empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response body of an image-modality chat completion. Only the fields that
/// can carry image data are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageGeneration {
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<ImageChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageChoice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: ImageMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageMessage {
    #[serde(default)]
    pub content: Option<MessageBody>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ContentPart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub image_url: Option<ImageUrl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ImageMessage {
    /// Image URLs in response order: attachments first, then content parts.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        let parts: &[ContentPart] = match &self.content {
            Some(MessageBody::Parts(parts)) => parts,
            _ => &[],
        };
        self.images
            .iter()
            .chain(parts.iter())
            .filter_map(|p| p.image_url.as_ref().map(|u| u.url.as_str()))
    }
}

pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    http: reqwest::Client,
    api_key: String,
    text_model: ModelConfig,
    image_model: ModelConfig,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("text_model", &self.text_model.model)
            .field("image_model", &self.image_model.model)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    pub fn new(config: &AppConfig) -> Result<Self, GenerationError> {
        let api_key = config.api_key()?.to_string();
        let client = openrouter_api::OpenRouterClient::quick().map_err(|e| {
            GenerationError::Transport(format!("Failed to create OpenRouter client: {}", e))
        })?;

        Ok(Self {
            client,
            http: reqwest::Client::new(),
            api_key,
            text_model: ModelConfig::text(),
            image_model: ModelConfig::image(),
        })
    }
}

/// Strict structured-output setting for an object schema.
pub fn strict_response_format(
    schema: &serde_json::Value,
) -> Result<ResponseFormatConfig, GenerationError> {
    let schema: JsonSchemaDefinition = serde_json::from_value(schema.clone())
        .map_err(|e| GenerationError::Schema(format!("unusable output schema: {}", e)))?;

    Ok(ResponseFormatConfig {
        format_type: "json_schema".to_string(),
        json_schema: JsonSchemaConfig {
            name: QUIZ_SCHEMA_NAME.to_string(),
            strict: true,
            schema,
        },
    })
}

#[async_trait]
impl GenerativeService for OpenRouterClient {
    async fn generate_text(
        &self,
        system: &str,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GenerationError> {
        let messages = vec![Message::text("system", system), Message::text("user", prompt)];

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        let request = ChatCompletionRequest {
            model: self.text_model.model.clone(),
            messages,
            provider: Some(provider),
            stream: None,
            response_format: Some(strict_response_format(schema)?),
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: self.text_model.max_tokens,
            temperature: self.text_model.temperature,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        };

        let response = self
            .client
            .chat()
            .map_err(GenerationError::transport)?
            .chat_completion(request)
            .await
            .map_err(|e| GenerationError::Transport(format!("OpenRouter API error: {}", e)))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| GenerationError::transport("No response choices received"))?;

        let text = match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => text.clone(),
            openrouter_api::MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| {
                    if let openrouter_api::ContentPart::Text(tc) = p {
                        Some(tc.text.clone())
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        };

        if text.trim().is_empty() {
            return Err(GenerationError::schema("empty text response"));
        }
        Ok(text)
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageGeneration, GenerationError> {
        let body = serde_json::json!({
            "model": self.image_model.model,
            "messages": [{ "role": "user", "content": prompt }],
            "modalities": ["image", "text"],
        });

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(GenerationError::transport)?
            .error_for_status()
            .map_err(GenerationError::transport)?;

        response
            .json::<ImageGeneration>()
            .await
            .map_err(|e| GenerationError::Transport(format!("unreadable image response: {}", e)))
    }
}
