use crate::adapters::calculator::{DEFAULT_CALCULATOR_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::ConfigProvider;
use crate::domain::model::{Environment, RatingKind};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub calculator: CalculatorSection,
    pub app: AppSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSection {
    pub url: String,
    pub timeout_seconds: u64,
    pub enabled: bool,
}

impl Default for CalculatorSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_CALCULATOR_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub environment: Environment,
    pub rating_mode: RatingKind,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn host(&self) -> &str {
        &self.server.host
    }

    fn port(&self) -> u16 {
        self.server.port
    }

    fn calculator_url(&self) -> &str {
        &self.calculator.url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.calculator.timeout_seconds)
    }

    fn calculator_enabled(&self) -> bool {
        self.calculator.enabled
    }

    fn rating_kind(&self) -> RatingKind {
        self.app.rating_mode
    }

    fn environment(&self) -> Environment {
        self.app.environment
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("calculator.url", &self.calculator.url)?;
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("calculator.timeout_seconds", self.calculator.timeout_seconds, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
host = "0.0.0.0"
port = 8080

[calculator]
url = "http://calculator:8000"
timeout_seconds = 10
enabled = false

[app]
environment = "production"
rating_mode = "cost"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.calculator_url(), "http://calculator:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(!config.calculator_enabled());
        assert_eq!(config.rating_kind(), RatingKind::Cost);
        assert_eq!(config.environment(), Environment::Production);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.calculator_url(), "http://localhost:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.port(), 5000);
        assert!(config.calculator_enabled());
        assert_eq!(config.rating_kind(), RatingKind::Dislike);
        assert_eq!(config.environment(), Environment::Development);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CHORE_ALLOC_TEST_CALC_URL", "http://calc.test:9000");

        let toml_content = r#"
[calculator]
url = "${CHORE_ALLOC_TEST_CALC_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.calculator.url, "http://calc.test:9000");

        std::env::remove_var("CHORE_ALLOC_TEST_CALC_URL");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[calculator]
url = "${CHORE_ALLOC_TEST_NEVER_SET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.calculator.url, "${CHORE_ALLOC_TEST_NEVER_SET}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rating_mode_is_parse_error() {
        let result = TomlConfig::from_toml_str("[app]\nrating_mode = \"vibes\"\n");
        assert!(matches!(result, Err(AppError::TomlParseError(_))));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 9100\n\n[calculator]\ntimeout_seconds = 0\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.port(), 9100);
        assert!(config.validate().is_err());
    }
}
