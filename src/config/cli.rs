use crate::adapters::calculator::{DEFAULT_CALCULATOR_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::ConfigProvider;
use crate::domain::model::{Environment, RatingKind};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "chore-alloc")]
#[command(about = "Web front end that collects agents, chores and ratings for the Allocation Calculator")]
pub struct CliConfig {
    #[arg(long, env = "CALCULATOR_URL", default_value = DEFAULT_CALCULATOR_URL)]
    pub calculator_url: String,

    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "RATING_MODE", default_value = "dislike", help = "none, cost or dislike")]
    pub rating_mode: RatingKind,

    #[arg(long = "environment", env = "APP_ENV", default_value = "development")]
    pub environment: Environment,

    #[arg(long, help = "Accept submissions without calling the Allocation Calculator")]
    pub offline: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, short, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,
}

impl ConfigProvider for CliConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn calculator_url(&self) -> &str {
        &self.calculator_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn calculator_enabled(&self) -> bool {
        !self.offline
    }

    fn rating_kind(&self) -> RatingKind {
        self.rating_mode
    }

    fn environment(&self) -> Environment {
        self.environment
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("calculator_url", &self.calculator_url)?;
        validate_non_empty_string("host", &self.host)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::try_parse_from(["chore-alloc"]).unwrap();

        // env 可能被外部設定，只檢查沒有 env 對應的部分
        assert!(!config.offline);
        assert!(!config.verbose);
        assert!(config.config.is_none());
        assert!(config.calculator_enabled());
    }

    #[test]
    fn test_explicit_flags() {
        let config = CliConfig::try_parse_from([
            "chore-alloc",
            "--calculator-url",
            "http://calc.internal:9000",
            "--port",
            "8080",
            "--request-timeout-secs",
            "5",
            "--rating-mode",
            "cost",
            "--environment",
            "production",
            "--offline",
        ])
        .unwrap();

        assert_eq!(config.calculator_url(), "http://calc.internal:9000");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.rating_kind(), RatingKind::Cost);
        assert_eq!(config.environment(), Environment::Production);
        assert!(!config.calculator_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_rating_mode() {
        assert!(CliConfig::try_parse_from(["chore-alloc", "--rating-mode", "vibes"]).is_err());
    }

    #[test]
    fn test_validation_catches_bad_url_and_timeout() {
        let mut config = CliConfig::try_parse_from([
            "chore-alloc",
            "--calculator-url",
            "http://localhost:8000",
        ])
        .unwrap();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        config.calculator_url = "localhost".to_string();
        assert!(config.validate().is_err());
    }
}
