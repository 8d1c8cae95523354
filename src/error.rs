use thiserror::Error;

/// Failure of a single quiz-item fetch. Every variant is recoverable through
/// the retry action on the error screen.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Text stage returned malformed JSON, missed a field, or broke an item invariant
    #[error("quiz response did not match the schema: {0}")]
    Schema(String),

    /// Image stage returned no inline image payload
    #[error("image response contained no inline image data")]
    ImageMissing,

    /// The service call itself failed
    #[error("AI service request failed: {0}")]
    Transport(String),
}

impl GenerationError {
    pub fn schema(msg: impl Into<String>) -> Self {
        GenerationError::Schema(msg.into())
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        GenerationError::Transport(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingCredential(&'static str),
}

/// The quiz image could not be turned into a terminal preview.
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unsupported image data: {0}")]
    Image(#[from] image::ImageError),
}

impl From<ConfigError> for GenerationError {
    fn from(e: ConfigError) -> Self {
        GenerationError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_surfaces_as_transport() {
        let err: GenerationError = ConfigError::MissingCredential("OPENROUTER_API_KEY").into();
        assert_eq!(
            err,
            GenerationError::Transport("OPENROUTER_API_KEY is not set".to_string())
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GenerationError::schema("missing field `word`").to_string(),
            "quiz response did not match the schema: missing field `word`"
        );
        assert_eq!(
            GenerationError::ImageMissing.to_string(),
            "image response contained no inline image data"
        );
    }
}
