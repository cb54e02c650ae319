use clap::{Subcommand, ValueEnum};
use serde_json::json;

use crate::app::Runtime;
use crate::config::{save_config, validate_url};
use crate::errors::CliError;
use crate::theme::Theme;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Read a config key
    Get { key: ConfigKey },
    /// Set a config key
    Set { key: ConfigKey, value: String },
    /// Print the resolved webhook endpoint and config file path
    Show,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigKey {
    #[value(name = "webhookUrl")]
    WebhookUrl,
    #[value(name = "theme")]
    Theme,
}

pub async fn handle(runtime: &mut Runtime, command: ConfigCommand) -> Result<(), CliError> {
    match command {
        ConfigCommand::Get { key } => get(runtime, key),
        ConfigCommand::Set { key, value } => set(runtime, key, value),
        ConfigCommand::Show => show(runtime),
    }
}

fn get(runtime: &Runtime, key: ConfigKey) -> Result<(), CliError> {
    match key {
        ConfigKey::WebhookUrl => {
            if runtime.output.json {
                runtime.output.print_json(&json!({
                    "key": "webhookUrl",
                    "value": runtime.config.webhook_url
                }))?;
            } else {
                runtime.output.print_human(&runtime.config.webhook_url);
            }
        }
        ConfigKey::Theme => {
            let value = runtime.config.theme.as_deref().unwrap_or("dark");
            if runtime.output.json {
                runtime
                    .output
                    .print_json(&json!({ "key": "theme", "value": value }))?;
            } else {
                runtime.output.print_human(value);
            }
        }
    }
    Ok(())
}

fn set(runtime: &mut Runtime, key: ConfigKey, value: String) -> Result<(), CliError> {
    match key {
        ConfigKey::WebhookUrl => {
            validate_url(&value)?;
            runtime.config.webhook_url = value;
        }
        ConfigKey::Theme => {
            let theme = Theme::parse(&value).ok_or_else(|| {
                CliError::Usage("Theme must be \"light\" or \"dark\".".to_string())
            })?;
            runtime.config.theme = Some(theme.as_str().to_string());
        }
    }

    let path = save_config(&runtime.config)?;
    if runtime.output.json {
        runtime
            .output
            .print_json(&json!({ "ok": true, "path": path }))?;
    } else {
        runtime
            .output
            .print_human(&format!("Saved: {}", path.display()));
    }
    Ok(())
}

fn show(runtime: &Runtime) -> Result<(), CliError> {
    let resolved = runtime.resolved_webhook_url()?;
    let path = crate::config::config_path()?;

    if runtime.output.json {
        runtime.output.print_json(&json!({
            "webhookUrl": resolved,
            "configPath": path,
        }))?;
        return Ok(());
    }

    runtime
        .output
        .print_human(&format!("webhook url: {resolved}"));
    runtime
        .output
        .print_human(&format!("config file: {}", path.display()));
    Ok(())
}
