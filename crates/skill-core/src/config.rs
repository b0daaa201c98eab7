//! Skill configuration.
//!
//! key=value format: `#` comments, blank lines and optional quotes.
//! Precedence: CLI flags > `SKILL_APPLICATION_ID` > config file > defaults.

use std::path::Path;
use thiserror::Error;

/// Environment variable overriding `application_id`.
pub const APPLICATION_ID_ENV: &str = "SKILL_APPLICATION_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid config line: {0}")]
    InvalidLine(String),
    #[error("invalid boolean value for {key}: {value}")]
    InvalidBool { key: String, value: String },
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Expected application identifier. `None` disables the check.
    pub application_id: Option<String>,
    /// Spoken when an intent has no registered handler.
    pub fallback_speech: String,
    /// Spoken when a handler fails and `recover_handler_errors` is set.
    pub error_speech: String,
    /// Convert handler failures into `error_speech` instead of failing the request.
    pub recover_handler_errors: bool,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            fallback_speech: "Sorry, I didn't understand that. You can say help to hear what I can do."
                .to_string(),
            error_speech: "Sorry, something went wrong. Please try again.".to_string(),
            recover_handler_errors: false,
        }
    }
}

impl SkillConfig {
    /// Load config from a file, merging with defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.load_file(path)?;
        Ok(config)
    }

    /// Load and merge values from a config file.
    pub fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_content(&content)
    }

    /// Apply `SKILL_APPLICATION_ID` if set.
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(APPLICATION_ID_ENV) {
            self.set_application_id(&value);
        }
    }

    pub fn set_application_id(&mut self, value: &str) {
        self.application_id = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }

    /// Parse config content (key=value format).
    fn parse_content(&mut self, content: &str) -> Result<(), ConfigError> {
        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine(line.to_string()));
            };

            let key = key.trim();
            let value = Self::unquote(value.trim());

            self.apply_value(key, &value)?;
        }
        Ok(())
    }

    /// Remove surrounding quotes from a value.
    fn unquote(value: &str) -> String {
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            return value[1..value.len() - 1].to_string();
        }
        value.to_string()
    }

    fn apply_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "application_id" => self.set_application_id(value),
            "fallback_speech" => self.fallback_speech = value.to_string(),
            "error_speech" => self.error_speech = value.to_string(),
            "recover_handler_errors" => {
                self.recover_handler_errors = Self::parse_bool(key, value)?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_disables_application_check() {
        let config = SkillConfig::default();
        assert!(config.application_id.is_none());
        assert!(!config.recover_handler_errors);
        assert!(!config.fallback_speech.is_empty());
    }

    #[test]
    fn parse_basic_config() {
        let mut config = SkillConfig::default();
        let content = r#"
# skill settings
application_id="amzn1.echo-sdk-ams.app.1234"
fallback_speech='Say that again?'
recover_handler_errors=yes
"#;
        config.parse_content(content).unwrap();
        assert_eq!(
            config.application_id.as_deref(),
            Some("amzn1.echo-sdk-ams.app.1234")
        );
        assert_eq!(config.fallback_speech, "Say that again?");
        assert!(config.recover_handler_errors);
    }

    #[test]
    fn empty_application_id_disables_check() {
        let mut config = SkillConfig::default();
        config.parse_content("application_id=app-1").unwrap();
        config.parse_content("application_id=").unwrap();
        assert!(config.application_id.is_none());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = SkillConfig::default();
        let err = config.parse_content("model=opus").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(key) if key == "model"));
    }

    #[test]
    fn line_without_equals_is_rejected() {
        let mut config = SkillConfig::default();
        assert!(matches!(
            config.parse_content("application_id"),
            Err(ConfigError::InvalidLine(_))
        ));
    }

    #[test]
    fn invalid_bool_is_rejected() {
        let mut config = SkillConfig::default();
        assert!(matches!(
            config.parse_content("recover_handler_errors=maybe"),
            Err(ConfigError::InvalidBool { .. })
        ));
    }

    #[test]
    fn unquote_removes_quotes() {
        assert_eq!(SkillConfig::unquote("\"hello\""), "hello");
        assert_eq!(SkillConfig::unquote("'world'"), "world");
        assert_eq!(SkillConfig::unquote("noquotes"), "noquotes");
    }

    #[test]
    fn from_file_merges_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "error_speech=Oops").unwrap();
        let config = SkillConfig::from_file(file.path()).unwrap();
        assert_eq!(config.error_speech, "Oops");
        assert_eq!(config.fallback_speech, SkillConfig::default().fallback_speech);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SkillConfig::from_file(&dir.path().join("absent"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
