//! The outbound messaging seam used by broadcasts and reports.

use std::sync::Arc;

use async_trait::async_trait;
use garaj_core::config::TelegramConfig;
use garaj_core::types::Recipient;
use telegram_client::{ClientOptions, ParseMode, TelegramClient, TelegramError};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel refused this recipient (blocked bot, unknown chat, ...).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The channel could not be reached, answered garbage, or asked us to
    /// slow down.
    #[error("transport: {0}")]
    Transport(String),

    #[error("channel disabled: no bot token configured")]
    Disabled,
}

/// Deliver a text to one recipient. Implementations report failure through
/// the `Result`; they must not panic on channel-level errors.
#[async_trait]
pub trait ChannelClient: Send + Sync {
    async fn send(&self, recipient: Recipient, text: &str) -> Result<(), ChannelError>;
}

#[async_trait]
impl ChannelClient for TelegramClient {
    async fn send(&self, recipient: Recipient, text: &str) -> Result<(), ChannelError> {
        self.send_message(recipient.id(), text, Some(ParseMode::Html))
            .await
            .map(|_| ())
            .map_err(ChannelError::from)
    }
}

impl From<TelegramError> for ChannelError {
    fn from(err: TelegramError) -> Self {
        if err.is_permanent() {
            ChannelError::Rejected(err.to_string())
        } else {
            ChannelError::Transport(err.to_string())
        }
    }
}

/// Stand-in used when the server runs without a bot token. Every send fails,
/// so broadcasts still complete and account for each recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledChannel;

#[async_trait]
impl ChannelClient for DisabledChannel {
    async fn send(&self, _recipient: Recipient, _text: &str) -> Result<(), ChannelError> {
        Err(ChannelError::Disabled)
    }
}

/// The channel broadcasts go through in production: the Telegram bot when a
/// token is configured, [`DisabledChannel`] otherwise.
pub fn from_config(cfg: &TelegramConfig) -> Result<Arc<dyn ChannelClient>, TelegramError> {
    match cfg.bot_token.as_deref() {
        Some(token) => {
            let opts = ClientOptions {
                api_base: cfg.api_base.clone(),
                timeout: cfg.request_timeout(),
            };
            Ok(Arc::new(TelegramClient::with_options(token, opts)?))
        }
        None => {
            warn!("no bot token configured; every delivery will be recorded as failed");
            Ok(Arc::new(DisabledChannel))
        }
    }
}
