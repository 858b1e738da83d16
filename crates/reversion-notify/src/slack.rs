//! Slack notification client.

use async_trait::async_trait;
use reqwest::Client;
use reversion_core::error::NotifyError;
use reversion_core::traits::Notifier;
use serde::{Deserialize, Serialize};
use tracing::info;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    mrkdwn: bool,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

/// Posts messages to a Slack channel with a bot token.
pub struct SlackNotifier {
    client: Client,
    token: String,
    channel: String,
}

impl SlackNotifier {
    /// Create a new notifier for the given channel.
    pub fn new(token: String, channel: String) -> Result<Self, NotifyError> {
        if token.is_empty() {
            return Err(NotifyError::Configuration("empty Slack token".into()));
        }
        if channel.is_empty() {
            return Err(NotifyError::Configuration("empty Slack channel".into()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| NotifyError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            token,
            channel,
        })
    }

    /// Read the bot token from the named environment variable.
    pub fn from_env_name(token_var: &str, channel: String) -> Result<Self, NotifyError> {
        let token = std::env::var(token_var)
            .map_err(|_| NotifyError::Configuration(format!("{} not set", token_var)))?;
        Self::new(token, channel)
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let request = PostMessageRequest {
            channel: &self.channel,
            text,
            mrkdwn: true,
        };

        let resp = self
            .client
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Api(format!("{}: {}", status, text)));
        }

        // Slack reports API-level failures in the body with a 200 status
        let body: PostMessageResponse = resp
            .json()
            .await
            .map_err(|e| NotifyError::Api(e.to_string()))?;

        if !body.ok {
            return Err(NotifyError::Api(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        info!(channel = %self.channel, "notification sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "Slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_configuration() {
        assert!(SlackNotifier::new(String::new(), "C123".to_string()).is_err());
        assert!(SlackNotifier::new("xoxb-token".to_string(), String::new()).is_err());
    }
}
