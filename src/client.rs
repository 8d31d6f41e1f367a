use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;

// Reply shape of `POST /chat`. The server also echoes the user message back
// (`userMessage`); only the bot turn is read here.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeReply {
    bot_response: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

/// HTTP client for the chat backend (`/chat` and `/clear`).
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send one user message and return the bot's reply content.
    pub async fn send_message(&self, message: &str) -> Result<String> {
        let url = format!("{}/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .form(&[("message", message)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "chat request failed with status: {}",
                response.status()
            ));
        }

        let reply: ExchangeReply = response.json().await?;
        Ok(reply.bot_response.content)
    }

    /// Reset the server-side conversation. The response body is ignored.
    pub async fn clear_history(&self) -> Result<()> {
        let url = format!("{}/clear", self.base_url);

        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "clear request failed with status: {}",
                response.status()
            ));
        }

        Ok(())
    }
}
