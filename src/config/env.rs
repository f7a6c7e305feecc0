use crate::config::types::{BitableConfig, FeishuConfig};
use crate::config::validation::parse_http_url;
use crate::ConfigError;

pub const WEBHOOK_URL_VAR: &str = "FEISHU_WEBHOOK_URL";
pub const APP_ID_VAR: &str = "FEISHU_APP_ID";
pub const APP_SECRET_VAR: &str = "FEISHU_APP_SECRET";
pub const BITABLE_APP_TOKEN_VAR: &str = "FEISHU_BITABLE_APP_TOKEN";
pub const BITABLE_TABLE_ID_VAR: &str = "FEISHU_BITABLE_TABLE_ID";

/// Loads Feishu targets from the process environment
///
/// `webhook_override` takes precedence over `FEISHU_WEBHOOK_URL`.
pub fn load_feishu_config(webhook_override: Option<&str>) -> Result<FeishuConfig, ConfigError> {
    load_feishu_config_with(webhook_override, |name| std::env::var(name).ok())
}

/// Loads Feishu targets through an arbitrary variable lookup
///
/// The four Bitable variables are all-or-nothing: none set disables the table
/// sync, a partial set is an error naming the first missing variable. Empty
/// values count as missing.
pub fn load_feishu_config_with<F>(
    webhook_override: Option<&str>,
    lookup: F,
) -> Result<FeishuConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let webhook_url = webhook_override
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| read(WEBHOOK_URL_VAR))
        .ok_or(ConfigError::MissingEnv(WEBHOOK_URL_VAR))?;
    parse_http_url("webhook URL", &webhook_url)?;

    let names = [
        APP_ID_VAR,
        APP_SECRET_VAR,
        BITABLE_APP_TOKEN_VAR,
        BITABLE_TABLE_ID_VAR,
    ];
    let values = names.map(|name| read(name));

    let bitable = if values.iter().all(Option::is_none) {
        tracing::info!("Bitable variables not set; table sync disabled");
        None
    } else {
        let [app_id, app_secret, app_token, table_id] = values;
        Some(BitableConfig {
            app_id: app_id.ok_or(ConfigError::MissingEnv(APP_ID_VAR))?,
            app_secret: app_secret.ok_or(ConfigError::MissingEnv(APP_SECRET_VAR))?,
            app_token: app_token.ok_or(ConfigError::MissingEnv(BITABLE_APP_TOKEN_VAR))?,
            table_id: table_id.ok_or(ConfigError::MissingEnv(BITABLE_TABLE_ID_VAR))?,
        })
    };

    Ok(FeishuConfig {
        webhook_url,
        bitable,
    })
}
