use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::CliError;

/// Fallback webhook for the hosted n8n travel-planning workflow.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://cleanplateinnovations.app.n8n.cloud/webhook/62c3bf2e-d431-49ad-b52f-ce257193a764/chat";

pub const WEBHOOK_URL_ENV: &str = "TRIPCHAT_WEBHOOK_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub webhook_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            theme: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf, CliError> {
    let base = dirs::config_dir().ok_or_else(|| {
        CliError::Generic("Could not resolve config directory for this OS.".to_string())
    })?;
    Ok(base.join("tripchat").join("config.json"))
}

pub fn load_config() -> Result<AppConfig, CliError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let text = fs::read_to_string(&path)?;
    let config: AppConfig = serde_json::from_str(&text)?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<PathBuf, CliError> {
    let path = config_path()?;
    let parent = path
        .parent()
        .ok_or_else(|| CliError::Generic("Invalid config path.".to_string()))?;
    fs::create_dir_all(parent)?;
    fs::write(&path, serde_json::to_string_pretty(config)?)?;
    Ok(path)
}

/// Resolve the webhook endpoint once at startup.
/// Precedence: CLI flag, then the environment, then the config file.
pub fn resolve_webhook_url(
    config: &AppConfig,
    flag_override: Option<&str>,
) -> Result<String, CliError> {
    if let Some(url) = flag_override {
        validate_url(url)?;
        return Ok(url.to_string());
    }

    if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
        if !url.trim().is_empty() {
            validate_url(url.trim())?;
            return Ok(url.trim().to_string());
        }
    }

    validate_url(&config.webhook_url)?;
    Ok(config.webhook_url.clone())
}

pub fn validate_url(value: &str) -> Result<(), CliError> {
    let parsed = Url::parse(value)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CliError::Usage(
            "Webhook URL must use http:// or https://.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_override_wins() {
        let config = AppConfig {
            webhook_url: "https://example.com/hook".to_string(),
            theme: None,
        };
        let resolved = resolve_webhook_url(&config, Some("https://other.test/hook")).unwrap();
        assert_eq!(resolved, "https://other.test/hook");
    }

    #[test]
    fn falls_back_to_config_value() {
        let config = AppConfig {
            webhook_url: "https://example.com/hook".to_string(),
            theme: None,
        };
        let resolved = resolve_webhook_url(&config, None).unwrap();
        assert_eq!(resolved, "https://example.com/hook");
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("https://example.com/hook").is_ok());
    }

    #[test]
    fn default_points_at_hosted_workflow() {
        let config = AppConfig::default();
        assert_eq!(config.webhook_url, DEFAULT_WEBHOOK_URL);
    }
}
