//! Configuration module for Trending-Relay
//!
//! Configuration comes from three places and is assembled once at start-up:
//! - CLI flags, which become the [`FetchRequest`](crate::trending::FetchRequest)
//! - An optional TOML settings file for endpoints, HTTP and card options
//! - Environment variables (and `.env`) for Feishu credentials
//!
//! # Example
//!
//! ```no_run
//! use trending_relay::config::{load_feishu_config, load_settings_or_default};
//!
//! let settings = load_settings_or_default(None).unwrap();
//! let feishu = load_feishu_config(None).unwrap();
//! println!("Table sync enabled: {}", feishu.bitable.is_some());
//! ```

mod env;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BitableConfig, CardSettings, Config, EndpointSettings, FeishuConfig, HttpSettings, Settings,
};

// Re-export loaders
pub use env::{
    load_feishu_config, load_feishu_config_with, APP_ID_VAR, APP_SECRET_VAR,
    BITABLE_APP_TOKEN_VAR, BITABLE_TABLE_ID_VAR, WEBHOOK_URL_VAR,
};
pub use parser::{load_settings, load_settings_or_default};
pub use validation::{parse_http_url, validate_settings};
