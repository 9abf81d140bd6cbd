//! Configuration management for the Eventbook client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary loads a `.env` file first, so the same keys can live there.

use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote GraphQL API configuration
    pub api: ApiConfig,
    /// Session persistence configuration
    pub storage: StorageConfig,
    /// Presentation configuration
    pub ui: UiConfig,
}

/// Remote GraphQL API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP endpoint for queries and mutations
    pub graphql_url: String,
    /// WebSocket endpoint for subscriptions
    pub subscriptions_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding `token`, `userId` and `username`
    pub session_path: PathBuf,
}

/// Presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Language of alerts and labels
    pub locale: Locale,
    /// Debounce window for list refreshes after a mutation, in milliseconds
    pub refresh_debounce_ms: u64,
    /// Log filter (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Invalid numeric values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let graphql_url = env::var("EVENTBOOK_GRAPHQL_URL")
            .unwrap_or_else(|_| "http://localhost:4000/graphql".to_string());
        let subscriptions_url = env::var("EVENTBOOK_SUBSCRIPTIONS_URL")
            .unwrap_or_else(|_| websocket_url(&graphql_url));

        Self {
            api: ApiConfig {
                graphql_url,
                subscriptions_url,
                request_timeout_secs: env::var("EVENTBOOK_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            storage: StorageConfig {
                session_path: env::var("EVENTBOOK_STORAGE_PATH")
                    .map_or_else(|_| PathBuf::from(".eventbook/session.json"), PathBuf::from),
            },
            ui: UiConfig {
                locale: env::var("EVENTBOOK_LOCALE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
                refresh_debounce_ms: env::var("EVENTBOOK_REFRESH_DEBOUNCE_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(500),
                log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info,eventbook=debug".to_string()),
            },
        }
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Refresh debounce window as a `Duration`
    #[must_use]
    pub const fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.ui.refresh_debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        let graphql_url = "http://localhost:4000/graphql".to_string();
        Self {
            api: ApiConfig {
                subscriptions_url: websocket_url(&graphql_url),
                graphql_url,
                request_timeout_secs: 30,
            },
            storage: StorageConfig {
                session_path: PathBuf::from(".eventbook/session.json"),
            },
            ui: UiConfig {
                locale: Locale::default(),
                refresh_debounce_ms: 500,
                log_level: "info,eventbook=debug".to_string(),
            },
        }
    }
}

/// Derive the subscription endpoint from the HTTP endpoint.
fn websocket_url(http_url: &str) -> String {
    if let Some(rest) = http_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = http_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        http_url.to_string()
    }
}
