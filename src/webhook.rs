use std::time::Instant;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::errors::CliError;
use crate::session::SessionId;

/// Fixed action tag the workflow's chat trigger expects on every call.
pub const SEND_ACTION: &str = "sendMessage";

/// Thin client for the single outbound wire contract: POST one JSON body to
/// the workflow webhook and hand back the parsed reply. One call per send,
/// no retries, no explicit timeout; the transport's own behavior governs.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
}

#[derive(Debug, Clone)]
pub struct WebhookReply {
    pub elapsed_ms: u128,
    pub json: Value,
}

impl WebhookClient {
    pub fn new(url: String) -> Result<Self, CliError> {
        let client = Client::builder().build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send_message(
        &self,
        session: &SessionId,
        chat_input: &str,
    ) -> Result<WebhookReply, CliError> {
        let body = json!({
            "sessionId": session.as_str(),
            "action": SEND_ACTION,
            "chatInput": chat_input,
        });

        let started = Instant::now();
        debug!(url = %self.url, "dispatching chat message");

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "webhook returned failure status");
            return Err(status_error(status));
        }

        let parsed = serde_json::from_str::<Value>(&text).map_err(|err| {
            warn!("webhook reply was not valid JSON: {err}");
            CliError::Generic(format!("Could not parse the workflow reply: {err}"))
        })?;

        Ok(WebhookReply {
            elapsed_ms: started.elapsed().as_millis(),
            json: parsed,
        })
    }
}

fn status_error(status: StatusCode) -> CliError {
    let message = format!("Request failed with status {}", status.as_u16());
    match status.as_u16() {
        429 => CliError::RateLimited(message),
        500..=599 => CliError::Server(message),
        _ => CliError::Generic(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_follow_the_taxonomy() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS),
            CliError::RateLimited(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY),
            CliError::Server(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND),
            CliError::Generic(_)
        ));
    }
}
