//! `rocket config` subcommands.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Dispatch a `config` subcommand.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv("timeout_ms", &config.api.timeout_ms.to_string());
    ctx.output
        .kv("connect_timeout_ms", &config.api.connect_timeout_ms.to_string());
    ctx.output.kv("max_retries", &config.api.max_retries.to_string());
    if config.api.token.is_some() {
        ctx.output.kv("token", "********");
    }

    ctx.output.info("[storage]");
    ctx.output.kv("path", &config.storage.path);
    ctx.output.kv("scope", &config.storage.scope);

    ctx.output.info("[messages]");
    ctx.output.kv("added", &config.messages.added);
    ctx.output.kv("out_of_stock", &config.messages.out_of_stock);
    ctx.output.kv("add_failed", &config.messages.add_failed);
    ctx.output.kv("remove_failed", &config.messages.remove_failed);
    ctx.output.kv("update_failed", &config.messages.update_failed);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = find_config_file(ctx) else {
        bail!("No config file found. Run `rocket config init` to create one.");
    };
    let path = path.to_string_lossy().to_string();

    // Re-read the file so environment overrides are not written back
    let mut config = CliConfig::load(&path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&path)?;

    ctx.output.success(&format!("{} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() {
        if !force {
            bail!(
                "{} already exists; pass --force to replace it",
                config_path.display()
            );
        }
        ctx.output
            .warn(&format!("Overwriting {}", config_path.display()));
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Wrote {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    let errors = ctx.config.validate();

    if errors.is_empty() {
        ctx.output.success("Configuration OK");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(error);
    }

    bail!("{} invalid setting(s)", errors.len());
}

fn find_config_file(ctx: &Context) -> Option<PathBuf> {
    if let Some(path) = &ctx.config_path {
        return Some(path.clone());
    }
    CONFIG_NAMES
        .iter()
        .map(|name| ctx.cwd.join(name))
        .find(|path| path.exists())
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<serde_json::Value> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url.clone().into(),
        ["api", "timeout_ms"] => config.api.timeout_ms.into(),
        ["api", "connect_timeout_ms"] => config.api.connect_timeout_ms.into(),
        ["api", "max_retries"] => config.api.max_retries.into(),
        ["storage", "path"] => config.storage.path.clone().into(),
        ["storage", "scope"] => config.storage.scope.clone().into(),
        ["messages", "added"] => config.messages.added.clone().into(),
        ["messages", "out_of_stock"] => config.messages.out_of_stock.clone().into(),
        ["messages", "add_failed"] => config.messages.add_failed.clone().into(),
        ["messages", "remove_failed"] => config.messages.remove_failed.clone().into(),
        ["messages", "update_failed"] => config.messages.update_failed.clone().into(),
        _ => bail!("no such setting: {}", key),
    };

    Ok(value)
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url = value.to_string(),
        ["api", "timeout_ms"] => config.api.timeout_ms = value.parse()?,
        ["api", "connect_timeout_ms"] => config.api.connect_timeout_ms = value.parse()?,
        ["api", "max_retries"] => config.api.max_retries = value.parse()?,
        ["storage", "path"] => config.storage.path = value.to_string(),
        ["storage", "scope"] => config.storage.scope = value.to_string(),
        ["messages", "added"] => config.messages.added = value.to_string(),
        ["messages", "out_of_stock"] => config.messages.out_of_stock = value.to_string(),
        ["messages", "add_failed"] => config.messages.add_failed = value.to_string(),
        ["messages", "remove_failed"] => config.messages.remove_failed = value.to_string(),
        ["messages", "update_failed"] => config.messages.update_failed = value.to_string(),
        _ => bail!("no such writable setting: {}", key),
    }

    Ok(())
}
