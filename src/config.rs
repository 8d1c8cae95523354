use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Settings derived from the environment. The service credential is the only one.
#[derive(Clone, Default)]
pub struct AppConfig {
    api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self { api_key }
    }

    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential(API_KEY_VAR))
    }
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key() {
        let config = AppConfig::default();
        assert!(!config.ai_enabled());
        assert_eq!(
            config.api_key(),
            Err(ConfigError::MissingCredential(API_KEY_VAR))
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AppConfig::with_api_key("sk-or-secret");
        assert!(config.ai_enabled());
        assert_eq!(config.api_key(), Ok("sk-or-secret"));
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-or-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
