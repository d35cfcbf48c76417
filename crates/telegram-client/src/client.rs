use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TelegramError};
use crate::types::{ApiResponse, ParseMode, SendMessage, SentMessage};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Scheme and host of the Bot API, without a trailing slash.
    pub api_base: String,
    /// Upper bound for a single API call.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Handle to one bot. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl std::fmt::Debug for TelegramClient {
    // The base URL embeds the bot token.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

impl TelegramClient {
    pub fn with_options(token: &str, opts: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(opts.timeout).build()?;
        let api_base = opts.api_base.trim_end_matches('/');
        Ok(Self {
            http,
            base: format!("{api_base}/bot{token}"),
        })
    }

    /// Call `sendMessage`. Telegram answers errors with a JSON body and a
    /// non-2xx status, so the body is decoded regardless of status.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage> {
        let body = SendMessage {
            chat_id,
            text,
            parse_mode,
        };
        let resp = self
            .http
            .post(format!("{}/sendMessage", self.base))
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let api: ApiResponse<SentMessage> = resp.json().await?;
        debug!(chat_id, status = status.as_u16(), ok = api.ok, "sendMessage");
        into_result(api)
    }
}

fn into_result<T>(api: ApiResponse<T>) -> Result<T> {
    if !api.ok {
        return Err(TelegramError::Api {
            code: api.error_code.unwrap_or_default(),
            description: api
                .description
                .unwrap_or_else(|| "no description".to_string()),
            retry_after: api.parameters.and_then(|p| p.retry_after),
        });
    }
    api.result.ok_or(TelegramError::MissingResult)
}
