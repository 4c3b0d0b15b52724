use crate::config::types::{Config, OptimizerConfig, RenderConfig, SiteConfig, StateConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_state_config(&config.state)?;
    validate_render_config(&config.render)?;
    validate_optimizer_config(&config.optimizer)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "start-url must be http(s), got '{}'",
            config.start_url
        )));
    }

    Ok(())
}

/// Validates the progress store configuration
fn validate_state_config(config: &StateConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "state path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the rendering configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    if config.font_path.is_empty() {
        return Err(ConfigError::Validation(
            "font-path cannot be empty".to_string(),
        ));
    }

    if !config.font_size.is_finite() || config.font_size <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "font-size must be positive, got {}",
            config.font_size
        )));
    }

    if config.wrap_width == 0 {
        return Err(ConfigError::Validation(
            "wrap-width must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the optimizer configuration
///
/// The api-key is only required when the optimizer is actually enabled; a
/// disabled optimizer section may leave it empty.
fn validate_optimizer_config(config: &OptimizerConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    if config.api_key.is_empty() {
        return Err(ConfigError::Validation(
            "optimizer api-key is required when the optimizer is enabled".to_string(),
        ));
    }

    Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid optimizer endpoint: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            site: SiteConfig {
                start_url: "https://comic.example.com/chapter-1/".to_string(),
                require_entry: true,
            },
            state: StateConfig {
                path: "./state.txt".to_string(),
            },
            render: RenderConfig {
                output_dir: "./render".to_string(),
                font_path: "./Ubuntu-R.ttf".to_string(),
                font_size: 12.0,
                wrap_width: 120,
            },
            optimizer: OptimizerConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_start_url() {
        let mut config = valid_config();
        config.site.start_url = "ftp://comic.example.com/".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_rejects_unparseable_start_url() {
        let mut config = valid_config();
        config.site.start_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_wrap_width() {
        let mut config = valid_config();
        config.render.wrap_width = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_rejects_non_positive_font_size() {
        let mut config = valid_config();
        config.render.font_size = 0.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_state_path() {
        let mut config = valid_config();
        config.state.path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_enabled_optimizer_requires_key() {
        let mut config = valid_config();
        config.optimizer.enabled = true;
        assert!(validate(&config).is_err());

        config.optimizer.api_key = "key".to_string();
        assert!(validate(&config).is_ok());
    }
}
