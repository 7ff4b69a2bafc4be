use url::Url;

use super::{types::Config, ConfigError};

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base = Url::parse(&config.site.base_url).map_err(|e| {
        ConfigError::ValidationError(format!(
            "site.base_url '{}' is not a valid URL: {}",
            config.site.base_url, e
        ))
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "site.base_url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if config.search.max_pages == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_pages cannot be 0".to_string(),
        ));
    }

    if config.selection.archive_attempts == 0 || config.selection.direct_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "selection attempt limits cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_bad_url_fails() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_non_http_scheme_fails() {
        let mut config = Config::default();
        config.site.base_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_pages_fails() {
        let mut config = Config::default();
        config.search.max_pages = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_pages"));
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let mut config = Config::default();
        config.selection.direct_attempts = 0;
        assert!(validate_config(&config).is_err());
    }
}
