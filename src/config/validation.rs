use crate::config::types::{CardSettings, EndpointSettings, HttpSettings, Settings};
use crate::ConfigError;
use url::Url;

/// Validates the entire settings structure
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    validate_endpoints(&settings.endpoints)?;
    validate_http(&settings.http)?;
    validate_card(&settings.card)?;
    Ok(())
}

/// Parses an http(s) URL, naming the offending setting on failure
pub fn parse_http_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: '{}' ({})", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            name, value
        )));
    }

    Ok(url)
}

fn validate_endpoints(endpoints: &EndpointSettings) -> Result<(), ConfigError> {
    parse_http_url("trending-base-url", &endpoints.trending_base_url)?;
    parse_http_url("feishu-base-url", &endpoints.feishu_base_url)?;
    Ok(())
}

fn validate_http(http: &HttpSettings) -> Result<(), ConfigError> {
    if http.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if http.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if http.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_card(card: &CardSettings) -> Result<(), ConfigError> {
    if card.description_width < 10 {
        return Err(ConfigError::Validation(format!(
            "description-width must be >= 10, got {}",
            card.description_width
        )));
    }

    if card.template.trim().is_empty() {
        return Err(ConfigError::Validation(
            "card template cannot be empty".to_string(),
        ));
    }

    Ok(())
}
