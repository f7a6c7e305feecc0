use crate::config::types::Settings;
use crate::config::validation::validate_settings;
use crate::ConfigError;
use std::path::Path;

/// Loads and validates a settings file from the given path
///
/// Every key is optional; missing keys keep their defaults.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use trending_relay::config::load_settings;
///
/// let settings = load_settings(Path::new("trending.toml")).unwrap();
/// println!("Timeout: {}s", settings.http.timeout_secs);
/// ```
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Loads the settings file when one is given, otherwise returns the defaults
pub fn load_settings_or_default(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => {
            tracing::info!("Loading settings from: {}", path.display());
            load_settings(path)
        }
        None => {
            let settings = Settings::default();
            validate_settings(&settings)?;
            Ok(settings)
        }
    }
}
