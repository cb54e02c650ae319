use crate::config::{AppConfig, resolve_webhook_url};
use crate::errors::CliError;
use crate::output::OutputMode;
use crate::webhook::WebhookClient;

#[derive(Debug, Clone)]
pub struct Runtime {
    pub output: OutputMode,
    pub config: AppConfig,
    pub webhook_override: Option<String>,
}

impl Runtime {
    pub fn resolved_webhook_url(&self) -> Result<String, CliError> {
        resolve_webhook_url(&self.config, self.webhook_override.as_deref())
    }

    pub fn webhook_client(&self) -> Result<WebhookClient, CliError> {
        WebhookClient::new(self.resolved_webhook_url()?)
    }
}
