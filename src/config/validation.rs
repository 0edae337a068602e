use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RenderConfig, ServerConfig, SummarizerConfig,
};
use crate::{ConfigError, ConfigResult};
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_render_config(&config.render)?;
    validate_output_config(&config.output)?;
    validate_summarizer_config(&config.summarizer)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_pages < 0 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 0, got {}",
            config.max_pages
        )));
    }

    if config.navigation_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "navigation_timeout_ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates render session configuration
fn validate_render_config(config: &RenderConfig) -> ConfigResult<()> {
    if config.network_idle_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "network_idle_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates summarizer configuration
fn validate_summarizer_config(config: &SummarizerConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid summarizer endpoint: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Summarizer endpoint must use HTTP or HTTPS, got '{}'",
            config.endpoint
        )));
    }

    if config.api_key_env.is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    if config.max_input_chars < 1 {
        return Err(ConfigError::Validation(
            "max_input_chars must be >= 1".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "summarizer timeout_secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> ConfigResult<()> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid server bind address '{}': {}", config.bind, e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_negative_max_pages_rejected() {
        let mut config = Config::default();
        config.crawler.max_pages = -1;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_max_pages_allowed() {
        let mut config = Config::default();
        config.crawler.max_pages = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = Config::default();
        config.crawler.navigation_timeout_ms = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.render.network_idle_timeout_ms = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.summarizer.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_settle_delay_allowed() {
        let mut config = Config::default();
        config.crawler.settle_delay_ms = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let mut config = Config::default();
        config.render.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_dir_rejected() {
        let mut config = Config::default();
        config.output.output_dir = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut config = Config::default();
        config.summarizer.endpoint = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.summarizer.endpoint = "ftp://models.example.com/bart".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_max_input_chars_rejected() {
        let mut config = Config::default();
        config.summarizer.max_input_chars = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_bind_rejected() {
        let mut config = Config::default();
        config.server.bind = "localhost".to_string();
        assert!(validate(&config).is_err());

        config.server.bind = "127.0.0.1:0".to_string();
        assert!(validate(&config).is_ok());
    }
}
