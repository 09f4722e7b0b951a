//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use rocket_cart::{CartStore, HttpStockService};
use rocket_data::FetchClient;
use rocket_storage::FileStore;
use tracing::debug;

use crate::config::CliConfig;
use crate::output::{ConsoleNotifier, Output};

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["rocket.toml", ".rocket.toml", "rocket.json"];

/// The cart store as wired by the CLI.
pub type CliCartStore = CartStore<FileStore, HttpStockService, ConsoleNotifier>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with environment overrides applied.
    pub config: CliConfig,
    /// Where the configuration was read from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        match &config_path {
            Some(path) => debug!(path = %path.display(), "loaded config"),
            None => output.debug("No config file found, using defaults"),
        }

        Ok(Self {
            config: config.with_env(),
            config_path,
            output,
            cwd,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Open the configured durable store.
    pub fn open_store(&self) -> Result<FileStore> {
        let root = self.resolve_path(&self.config.storage.path);
        FileStore::open(&root, &self.config.storage.scope).with_context(|| {
            format!(
                "Failed to open cart storage at {} (scope '{}')",
                root.display(),
                self.config.storage.scope
            )
        })
    }

    /// Build the HTTP stock service from the `[api]` section.
    pub fn stock_service(&self) -> Result<HttpStockService> {
        let api = &self.config.api;
        let client = FetchClient::new(api.fetch_policy())
            .context("Failed to create HTTP client")?
            .with_base_url(&api.base_url);

        let service = HttpStockService::new(client);
        Ok(match &api.token {
            Some(token) => service.with_token(token),
            None => service,
        })
    }

    /// Open the cart store.
    pub fn cart_store(&self) -> Result<CliCartStore> {
        let store = CartStore::open(
            self.open_store()?,
            self.stock_service()?,
            ConsoleNotifier::new(self.output.clone()),
        );
        Ok(store.with_messages(self.config.messages.clone()))
    }
}

/// Find a config file in `start` or its ancestors.
pub fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                    return Some((config_path, config));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
