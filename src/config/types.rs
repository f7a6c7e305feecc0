use crate::trending::FetchRequest;
use serde::Deserialize;
use std::fmt;

/// Immutable configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub request: FetchRequest,
    pub settings: Settings,
    pub feishu: FeishuConfig,
}

/// Tunables read from the optional TOML settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoints: EndpointSettings,
    pub http: HttpSettings,
    pub card: CardSettings,
}

/// Base URLs of the services the pipeline talks to
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EndpointSettings {
    /// Trending page; the language becomes a path segment below it
    pub trending_base_url: String,

    /// Feishu open platform root used for auth and Bitable calls
    pub feishu_base_url: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            trending_base_url: "https://github.com/trending".to_string(),
            feishu_base_url: "https://open.feishu.cn".to_string(),
        }
    }
}

/// HTTP client behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpSettings {
    pub user_agent: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    pub connect_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; GitHubTrendingBot/1.0)".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Card rendering options
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CardSettings {
    /// Maximum characters of a description before it is shortened
    pub description_width: usize,

    /// Header colour template
    pub template: String,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            description_width: 120,
            template: "blue".to_string(),
        }
    }
}

/// Feishu delivery targets loaded from the environment
#[derive(Debug, Clone)]
pub struct FeishuConfig {
    pub webhook_url: String,

    /// `None` when no Bitable variable is set; the table sync is then skipped
    pub bitable: Option<BitableConfig>,
}

/// Credentials and target table for the Bitable sync
#[derive(Clone)]
pub struct BitableConfig {
    pub app_id: String,
    pub app_secret: String,
    pub app_token: String,
    pub table_id: String,
}

impl fmt::Debug for BitableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitableConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("app_token", &self.app_token)
            .field("table_id", &self.table_id)
            .finish()
    }
}
