//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use rocket_cart::Messages;
use rocket_data::{BackoffStrategy, FetchPolicy, RetryPolicy, TimeoutConfig};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "ROCKET_API_URL";

/// Environment variable overriding `api.token`.
pub const API_TOKEN_ENV: &str = "ROCKET_API_TOKEN";

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Stock API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Cart storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Notification texts.
    #[serde(default)]
    pub messages: Messages,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(API_TOKEN_ENV).ok(),
        )
    }

    fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api.token = Some(token);
        }
        self
    }

    /// Check the configuration, returning one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let url = self.api.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("api.base_url must be an http(s) URL, got '{}'", url));
        }
        if self.api.timeout_ms == 0 {
            errors.push("api.timeout_ms must be greater than 0".to_string());
        }
        if self.api.connect_timeout_ms > self.api.timeout_ms {
            errors.push("api.connect_timeout_ms must not exceed api.timeout_ms".to_string());
        }
        if self.storage.path.trim().is_empty() {
            errors.push("storage.path is required".to_string());
        }
        let scope = self.storage.scope.as_str();
        if scope.is_empty() || scope == "." || scope == ".." || scope.contains(['/', '\\']) {
            errors.push(format!("storage.scope '{}' is not a valid scope name", scope));
        }

        errors
    }
}

/// Stock API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the products/stock API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Retries after a failed request.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_retries: default_max_retries(),
            token: None,
        }
    }
}

impl ApiConfig {
    /// Build the fetch policy for the stock API client.
    pub fn fetch_policy(&self) -> FetchPolicy {
        let timeout = TimeoutConfig::new(
            Duration::from_millis(self.connect_timeout_ms),
            Duration::from_millis(self.timeout_ms),
        );
        let retry = RetryPolicy::for_reads(self.max_retries).with_backoff(BackoffStrategy::Exponential {
            initial: Duration::from_millis(100),
            cap: Duration::from_secs(2),
        });
        FetchPolicy::new(timeout, retry)
    }
}

/// Cart storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage root, relative to the working directory unless absolute.
    #[serde(default = "default_storage_path")]
    pub path: String,

    /// Scope inside the storage root.
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_storage_path() -> String {
    ".rocket".to_string()
}

fn default_scope() -> String {
    "default".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            scope: default_scope(),
        }
    }
}

/// Generate a default rocket.toml config file.
pub fn generate_default_config() -> String {
    r#"# RocketShoes cart configuration

[api]
base_url = "http://localhost:3333"
timeout_ms = 5000
connect_timeout_ms = 1000
max_retries = 1
# token = "..."

[storage]
path = ".rocket"
scope = "default"

[messages]
added = "Produto Adicionado"
out_of_stock = "Quantidade solicitada fora de estoque"
add_failed = "Erro na adição do produto"
remove_failed = "Erro na remoção do produto"
update_failed = "Erro na alteração de quantidade do produto"
"#
    .to_string()
}
